use thiserror::Error;

/// Top-level error type for the `litterlink-api` crate.
///
/// Covers every failure mode across both vendor surfaces:
/// authentication, transport, PetKit envelopes, and Whisker GraphQL.
/// `litterlink-core` maps these into caller-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, no session in the response, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The server rejected the token again after a fresh login.
    #[error("Session expired -- re-authentication did not help")]
    SessionExpired,

    /// The configured region matches no entry in the regional server list.
    #[error("Region '{region}' not found in the server list")]
    RegionNotFound { region: String },

    /// The identity token could not be decoded into a subject id.
    #[error("Failed to decode identity token: {message}")]
    TokenDecode { message: String },

    /// A request needing a session was issued before login.
    #[error("Not authenticated -- call login() first")]
    NotAuthenticated,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Non-success HTTP status other than 401.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Vendor payloads ─────────────────────────────────────────────
    /// PetKit `{"error": {"code": N, "msg": "..."}}` envelope.
    #[error("PetKit API error {code}: {message}")]
    Vendor { code: i64, message: String },

    /// Whisker GraphQL `errors` array.
    #[error("GraphQL error: {message}")]
    GraphQl { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error means the credentials or session were
    /// rejected and the caller cannot recover without new credentials.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. }
                | Self::SessionExpired
                | Self::RegionNotFound { .. }
                | Self::TokenDecode { .. }
                | Self::NotAuthenticated
        )
    }

    /// Build a `Deserialization` error with a bounded body preview.
    pub(crate) fn decode(err: &serde_json::Error, body: &str) -> Self {
        let preview = &body[..floor_char_boundary(body, 200)];
        Self::Deserialization {
            message: format!("{err} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    }
}

/// Largest char boundary `<= max` so previews never split a code point.
pub(crate) fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_family_is_auth_expired() {
        assert!(Error::SessionExpired.is_auth_expired());
        assert!(
            Error::RegionNotFound {
                region: "mars".into()
            }
            .is_auth_expired()
        );
        assert!(!Error::Timeout { timeout_secs: 5 }.is_auth_expired());
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let s = "é".repeat(150);
        let cut = floor_char_boundary(&s, 201);
        assert!(s.is_char_boundary(cut));
        assert!(cut <= 201);
    }
}
