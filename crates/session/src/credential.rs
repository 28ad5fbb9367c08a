use serde::{Deserialize, Serialize};

/// Opaque bearer token with a server-controlled expiry.
///
/// The client never inspects claims; the refresh endpoint is the sole
/// authority on expiry. Never persisted to durable storage, and `Debug`
/// redacts the token body so it cannot leak through logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_the_token() {
        let credential = Credential::new("top-secret-token");
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("top-secret-token"));
    }
}
