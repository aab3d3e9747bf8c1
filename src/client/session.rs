//! Authentication session attached to every GraphQL request.

use std::collections::BTreeMap;

const AUTHORIZATION: &str = "Authorization";

/// Access token plus any extra request headers.
///
/// The access token is sent verbatim in the `Authorization` header, the way
/// the platform's auth provider hands it out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    access_token: Option<String>,
    headers: BTreeMap<String, String>,
}

impl Session {
    /// Create an anonymous session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session authenticated with `token`.
    pub fn with_access_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            headers: BTreeMap::new(),
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    /// Drop the access token (sign-out). Extra headers are kept.
    pub fn clear_access_token(&mut self) {
        self.access_token = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Set an extra header.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Get an extra header by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|v| v.as_str())
    }

    /// All headers to send, `Authorization` first when authenticated.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.headers.len() + 1);
        if let Some(token) = &self.access_token {
            out.push((AUTHORIZATION.to_string(), token.clone()));
        }
        out.extend(
            self.headers
                .iter()
                .filter(|(name, _)| !name.eq_ignore_ascii_case(AUTHORIZATION))
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        out
    }
}
