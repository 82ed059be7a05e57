//! Who may open the admin console.

use catalogue_client::SessionStore;

/// Outcome of the admin console's entry check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAccess {
    Granted,
    /// Nobody is signed in; send them to [`LOGIN_PATH`].
    SignInRequired,
    /// Signed in without admin rights.
    Forbidden,
}

pub const LOGIN_PATH: &str = "/login";

/// Check the current session. The backend enforces the same rule on every
/// admin endpoint; this only decides what to show.
#[must_use]
pub fn check_access(session: &SessionStore) -> AdminAccess {
    let snapshot = session.snapshot();
    if !snapshot.is_authenticated {
        AdminAccess::SignInRequired
    } else if snapshot.is_admin() {
        AdminAccess::Granted
    } else {
        AdminAccess::Forbidden
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalogue_client::AccessToken;
    use catalogue_core::User;

    use super::*;

    fn user(is_superuser: bool) -> User {
        serde_json::from_value(serde_json::json!({
            "id": 1, "email": "ops@example.com", "is_active": true, "is_superuser": is_superuser
        }))
        .unwrap()
    }

    #[test]
    fn test_access_by_role() {
        let session = SessionStore::in_memory();
        assert_eq!(check_access(&session), AdminAccess::SignInRequired);

        session.login(user(false), AccessToken::new("t"));
        assert_eq!(check_access(&session), AdminAccess::Forbidden);

        session.login(user(true), AccessToken::new("t"));
        assert_eq!(check_access(&session), AdminAccess::Granted);
    }
}
