use crate::types::{Result, SESSION_SOCKET_PATH, SocketError};
use url::Url;

/// Builds the socket endpoint for a bootstrapped session.
///
/// `secure` selects `wss` over `ws`, normally following whether the page that
/// hosts the controls was served over HTTPS.
pub fn session_endpoint(host: &str, session_id: &str, secure: bool) -> Result<Url> {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return Err(SocketError::InvalidOptions("host is required".to_string()));
    }
    if session_id.is_empty() {
        return Err(SocketError::InvalidOptions(
            "session id is required".to_string(),
        ));
    }

    let scheme = if secure { "wss" } else { "ws" };
    let mut url = Url::parse(&format!("{}://{}", scheme, host))?;
    url.path_segments_mut()
        .map_err(|_| SocketError::InvalidOptions(format!("host '{}' cannot carry a path", host)))?
        .push(SESSION_SOCKET_PATH)
        .push(session_id);

    Ok(url)
}
