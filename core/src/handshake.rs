//! OAuth redirect handshake parsing.
//!
//! SYSTEM CONTEXT
//! ==============
//! After the Google flow the backend redirects back to the app with `token`
//! or `error` in the query string or the fragment; the legacy flow returns a
//! one-time `session_id` in the fragment. The session store reads the
//! handshake once at startup and then strips it so a reload never replays it.

#[cfg(test)]
#[path = "handshake_test.rs"]
mod handshake_test;

use url::Url;
use url::form_urlencoded;

pub const TOKEN_PARAM: &str = "token";
pub const SESSION_ID_PARAM: &str = "session_id";
pub const ERROR_PARAM: &str = "error";

const HANDSHAKE_PARAMS: [&str; 3] = [TOKEN_PARAM, SESSION_ID_PARAM, ERROR_PARAM];

/// What the current URL carries back from an auth redirect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Handshake {
    /// A session token issued by the OAuth callback.
    Token(String),
    /// A one-time identifier to exchange via `POST /auth/session`.
    SessionId(String),
    /// An error message from the OAuth callback (already percent-decoded).
    Error(String),
    None,
}

/// Read the handshake from `href`. Token beats session id beats error;
/// blank values are ignored.
#[must_use]
pub fn parse(href: &str) -> Handshake {
    let Ok(url) = Url::parse(href) else {
        return Handshake::None;
    };
    let params = handshake_params(&url);
    let find = |name: &str| {
        params
            .iter()
            .find(|(key, value)| key == name && !value.trim().is_empty())
            .map(|(_, value)| value.clone())
    };

    if let Some(token) = find(TOKEN_PARAM) {
        Handshake::Token(token)
    } else if let Some(session_id) = find(SESSION_ID_PARAM) {
        Handshake::SessionId(session_id)
    } else if let Some(error) = find(ERROR_PARAM) {
        Handshake::Error(error)
    } else {
        Handshake::None
    }
}

/// `href` with every handshake parameter removed, or `None` when there is
/// nothing to strip (or `href` is not an absolute URL).
#[must_use]
pub fn strip(href: &str) -> Option<String> {
    let mut url = Url::parse(href).ok()?;
    let mut changed = false;

    let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    if query.iter().any(|(key, _)| is_handshake_param(key)) {
        let kept: Vec<_> = query.into_iter().filter(|(key, _)| !is_handshake_param(key)).collect();
        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
        changed = true;
    }

    if let Some(fragment) = url.fragment().map(str::to_owned) {
        let pairs = fragment_pairs(&fragment);
        if pairs.iter().any(|(key, _)| is_handshake_param(key)) {
            let kept: Vec<_> = pairs.into_iter().filter(|(key, _)| !is_handshake_param(key)).collect();
            if kept.is_empty() {
                url.set_fragment(None);
            } else {
                let encoded = form_urlencoded::Serializer::new(String::new()).extend_pairs(kept).finish();
                url.set_fragment(Some(&encoded));
            }
            changed = true;
        }
    }

    changed.then(|| url.to_string())
}

fn is_handshake_param(key: &str) -> bool {
    HANDSHAKE_PARAMS.contains(&key)
}

/// Query pairs first, then fragment pairs.
fn handshake_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    if let Some(fragment) = url.fragment() {
        params.extend(fragment_pairs(fragment));
    }
    params
}

/// Fragments are only treated as parameters when they look like `k=v` pairs;
/// plain anchors (`#reviews`) yield nothing.
fn fragment_pairs(fragment: &str) -> Vec<(String, String)> {
    if !fragment.contains('=') {
        return Vec::new();
    }
    form_urlencoded::parse(fragment.as_bytes()).into_owned().collect()
}
