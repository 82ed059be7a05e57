//! Login and registration pages.

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use catalogue_client::{ApiClient, ApiError, REMEMBERED_EMAIL_KEY};
use catalogue_core::{Email, User};

use crate::error::FormError;
use crate::navigation::{Location, Navigator};

/// Shown on the login page after a successful registration.
pub const REGISTERED_NOTICE: &str = "Registration successful! Please log in.";

const LOGIN_FALLBACK: &str = "An error occurred during login";
const REGISTER_FALLBACK: &str = "Registration failed";

/// Where a signed-in user lands.
const HOME: &str = "/";

/// Banner text for a failed request: the backend's `detail` when it sent one,
/// else the error itself, else `fallback`.
fn banner_message(err: &ApiError, fallback: &str) -> String {
    if let Some(detail) = err.detail() {
        return detail.to_string();
    }
    let message = err.to_string();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

// =============================================================================
// Login
// =============================================================================

/// State and actions of the login page.
#[derive(Debug)]
pub struct LoginController {
    api: ApiClient,
    navigator: Navigator,
    error: Option<String>,
    notice: Option<String>,
}

impl LoginController {
    /// Open the login page at `href`. A signed-in user is sent home.
    #[must_use]
    pub fn mount(api: ApiClient, href: &str) -> Self {
        let location = Location::parse(href);
        let notice = (location.get("registered") == Some("true")).then(|| REGISTERED_NOTICE.to_string());

        let mut navigator = Navigator::starting_at(location);
        if api.session().is_authenticated() {
            navigator.push(Location::new(HOME));
        }

        Self {
            api,
            navigator,
            error: None,
            notice,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        self.navigator.current()
    }

    /// Sign in. On success the session holds the user and token and the page
    /// redirects home; on failure the page stays put with an error banner.
    #[instrument(skip(self, password))]
    pub async fn submit(&mut self, email: &str, password: &SecretString) -> bool {
        self.error = None;
        self.notice = None;

        let email = match Email::parse(email) {
            Ok(email) => email,
            Err(e) => {
                self.error = Some(FormError::from(e).to_string());
                return false;
            }
        };

        match self.sign_in(&email, password).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Signed in");
                self.navigator.push(Location::new(HOME));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                self.error = Some(banner_message(&e, LOGIN_FALLBACK));
                false
            }
        }
    }

    async fn sign_in(&self, email: &Email, password: &SecretString) -> Result<User, ApiError> {
        let session = self.api.session();
        let token = self.api.login_access_token(email, password).await?;

        // `/users/me` needs the token, but the user is not signed in until it answers.
        session.set_token(token.clone());
        let user = match self.api.get_profile().await {
            Ok(user) => user,
            Err(e) => {
                session.logout();
                return Err(e);
            }
        };

        session.login(user.clone(), token);
        session.remember(REMEMBERED_EMAIL_KEY, email.as_str());
        Ok(user)
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Hint shown under the password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    /// Strength of `password` by length; `None` for an empty password.
    #[must_use]
    pub fn assess(password: &str) -> Option<Self> {
        match password.chars().count() {
            0 => None,
            1..6 => Some(Self::Weak),
            6..10 => Some(Self::Medium),
            _ => Some(Self::Strong),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weak => "Weak password",
            Self::Medium => "Medium strength",
            Self::Strong => "Strong password",
        }
    }
}

/// Fields of the registration form.
#[derive(Debug)]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl RegistrationForm {
    /// Check the form before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<Email, FormError> {
        if self.full_name.trim().is_empty() {
            return Err(FormError::Required("Full name"));
        }
        let email = Email::parse(&self.email)?;
        if self.password.expose_secret().is_empty() {
            return Err(FormError::Required("Password"));
        }
        if self.password.expose_secret() != self.confirm_password.expose_secret() {
            return Err(FormError::PasswordMismatch);
        }
        Ok(email)
    }
}

/// State and actions of the registration page.
#[derive(Debug)]
pub struct RegisterController {
    api: ApiClient,
    navigator: Navigator,
    error: Option<String>,
}

impl RegisterController {
    /// Open the registration page at `href`. A signed-in user is sent home.
    #[must_use]
    pub fn mount(api: ApiClient, href: &str) -> Self {
        let mut navigator = Navigator::starting_at(Location::parse(href));
        if api.session().is_authenticated() {
            navigator.push(Location::new(HOME));
        }
        Self {
            api,
            navigator,
            error: None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        self.navigator.current()
    }

    /// Create the account and go to the login page with a success notice.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn submit(&mut self, form: &RegistrationForm) -> bool {
        self.error = None;

        let email = match form.validate() {
            Ok(email) => email,
            Err(e) => {
                self.error = Some(e.to_string());
                return false;
            }
        };

        match self
            .api
            .register(&email, &form.password, form.full_name.trim())
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Account created");
                self.navigator
                    .push(Location::new("/login").with("registered", "true"));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Registration failed");
                self.error = Some(banner_message(&e, REGISTER_FALLBACK));
                false
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalogue_client::{AccessToken, ClientConfig, SessionStore};
    use url::Url;

    use super::*;

    fn api(session: SessionStore) -> ApiClient {
        let config = ClientConfig::new(Url::parse("http://127.0.0.1:9/api/v1").unwrap());
        ApiClient::new(&config, session).unwrap()
    }

    fn form(password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            full_name: "Ana Silva".to_string(),
            email: "ana@example.com".to_string(),
            password: SecretString::from(password.to_string()),
            confirm_password: SecretString::from(confirm.to_string()),
        }
    }

    #[test]
    fn test_password_strength() {
        assert_eq!(PasswordStrength::assess(""), None);
        assert_eq!(PasswordStrength::assess("abc"), Some(PasswordStrength::Weak));
        assert_eq!(PasswordStrength::assess("abcdef"), Some(PasswordStrength::Medium));
        assert_eq!(PasswordStrength::assess("abcdefghi"), Some(PasswordStrength::Medium));
        assert_eq!(PasswordStrength::assess("abcdefghij"), Some(PasswordStrength::Strong));
    }

    #[test]
    fn test_registration_validation() {
        assert!(form("secret123", "secret123").validate().is_ok());
        assert_eq!(
            form("secret123", "secret124").validate().unwrap_err(),
            FormError::PasswordMismatch
        );
        assert_eq!(form("", "").validate().unwrap_err(), FormError::Required("Password"));

        let mut bad_email = form("a", "a");
        bad_email.email = "not-an-email".to_string();
        assert!(matches!(bad_email.validate(), Err(FormError::InvalidEmail(_))));
    }

    #[test]
    fn test_login_page_shows_registration_notice() {
        let login = LoginController::mount(api(SessionStore::in_memory()), "/login?registered=true");
        assert_eq!(login.notice(), Some(REGISTERED_NOTICE));
        assert_eq!(login.location().path(), "/login");
    }

    #[test]
    fn test_signed_in_user_is_sent_home() {
        let session = SessionStore::in_memory();
        let user = serde_json::from_value(serde_json::json!({
            "id": 1, "email": "ana@example.com", "is_active": true, "is_superuser": false
        }))
        .unwrap();
        session.login(user, AccessToken::new("t"));

        let login = LoginController::mount(api(session.clone()), "/login");
        assert_eq!(login.location().path(), "/");

        let register = RegisterController::mount(api(session), "/register");
        assert_eq!(register.location().path(), "/");
    }

    #[tokio::test]
    async fn test_invalid_email_never_reaches_backend() {
        let mut login = LoginController::mount(api(SessionStore::in_memory()), "/login");
        let ok = login
            .submit("nobody", &SecretString::from("pw".to_string()))
            .await;
        assert!(!ok);
        assert!(login.error().unwrap().starts_with("Please enter a valid email address"));
        assert_eq!(login.location().path(), "/login");
    }
}
