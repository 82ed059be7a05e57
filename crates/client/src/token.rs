//! Bearer token handling.
//!
//! The backend issues JWTs. The client never validates them; it only reads the
//! `exp` claim so it can refresh a token shortly before the backend would
//! start rejecting it.

use core::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A bearer access token.
///
/// Wraps the raw JWT in a [`SecretString`] so it never shows up in `Debug`
/// output or logs. It serializes as the plain token string because the
/// session is persisted with it.
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for building an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Expiry read from the `exp` claim, without verifying the signature.
    ///
    /// Returns `None` when the token is not a JWT or carries no numeric `exp`.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let payload = self.expose().split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        let claims: Claims = serde_json::from_slice(&bytes).ok()?;
        #[allow(clippy::cast_possible_truncation)] // exp is whole seconds in practice
        let secs = claims.exp?.floor() as i64;
        DateTime::from_timestamp(secs, 0)
    }

    /// Whether the token expires within `window` of `now`, or already has.
    ///
    /// A token whose expiry cannot be read is never considered expiring; the
    /// backend's 401 is the signal for those.
    #[must_use]
    pub fn expires_within(&self, window: std::time::Duration, now: DateTime<Utc>) -> bool {
        let Some(expires_at) = self.expires_at() else {
            return false;
        };
        let window = chrono::Duration::from_std(window).unwrap_or(chrono::Duration::MAX);
        expires_at - now <= window
    }

    /// `Authorization` header value.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.expose())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for AccessToken {}

impl Serialize for AccessToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

impl<'de> Deserialize<'de> for AccessToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// The subset of JWT claims the client reads.
#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<f64>,
}

/// Token issuance response from `/login/access-token` and `/login/refresh-token`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: AccessToken,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[cfg(test)]
pub(crate) mod test_support {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    /// Build an unsigned JWT whose `exp` claim is `exp`.
    pub fn jwt_expiring_at(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"1","exp":{exp}}}"#));
        format!("{header}.{claims}.signature")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::test_support::jwt_expiring_at;
    use super::*;

    const FIVE_MINUTES: Duration = Duration::from_secs(300);

    #[test]
    fn test_expires_at_reads_exp_claim() {
        let token = AccessToken::new(jwt_expiring_at(1_700_000_000));
        assert_eq!(token.expires_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_token_far_from_expiry_is_not_expiring() {
        let now = Utc::now();
        let token = AccessToken::new(jwt_expiring_at(now.timestamp() + 3600));
        assert!(!token.expires_within(FIVE_MINUTES, now));
    }

    #[test]
    fn test_token_inside_window_is_expiring() {
        let now = Utc::now();
        let token = AccessToken::new(jwt_expiring_at(now.timestamp() + 120));
        assert!(token.expires_within(FIVE_MINUTES, now));
    }

    #[test]
    fn test_expired_token_is_expiring() {
        let now = Utc::now();
        let token = AccessToken::new(jwt_expiring_at(now.timestamp() - 60));
        assert!(token.expires_within(FIVE_MINUTES, now));
    }

    #[test]
    fn test_opaque_token_is_never_expiring() {
        let token = AccessToken::new("not-a-jwt");
        assert!(token.expires_at().is_none());
        assert!(!token.expires_within(FIVE_MINUTES, Utc::now()));
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let jwt = jwt_expiring_at(1_700_000_000);
        let mut parts: Vec<&str> = jwt.split('.').collect();
        let padded = format!("{}==", parts[1]);
        parts[1] = &padded;
        let token = AccessToken::new(parts.join("."));
        assert!(token.expires_at().is_some());
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = AccessToken::new("super-secret-jwt");
        assert!(!format!("{token:?}").contains("super-secret-jwt"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let token = AccessToken::new("abc.def.ghi");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"abc.def.ghi\"");
        let back: AccessToken = serde_json::from_str("\"abc.def.ghi\"").unwrap();
        assert_eq!(back, token);
    }
}
