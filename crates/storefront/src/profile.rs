//! Account profile page.

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use catalogue_client::ApiClient;
use catalogue_core::{Email, User, UserUpdate};

use crate::error::FormError;

/// Alert after a successful save.
pub const SAVED_ALERT: &str = "Profile updated successfully!";

/// Alert after a failed save.
pub const SAVE_FAILED_ALERT: &str = "Failed to update profile. Please try again.";

/// Editable profile fields.
#[derive(Debug)]
pub struct ProfileForm {
    pub full_name: String,
    pub email: String,
    /// Empty keeps the current password.
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl Default for ProfileForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            password: empty_secret(),
            confirm_password: empty_secret(),
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

impl ProfileForm {
    fn fill_from(&mut self, user: &User) {
        self.full_name = user.full_name.clone().unwrap_or_default();
        self.email = user.email.to_string();
    }

    fn clear_passwords(&mut self) {
        self.password = empty_secret();
        self.confirm_password = empty_secret();
    }

    /// The update to send: name and email always, password only when typed.
    ///
    /// # Errors
    ///
    /// Returns `FormError` if the passwords differ or the email is malformed.
    pub fn to_update(&self) -> Result<UserUpdate, FormError> {
        let password = self.password.expose_secret();
        if !password.is_empty() && password != self.confirm_password.expose_secret() {
            return Err(FormError::PasswordMismatch);
        }
        Ok(UserUpdate {
            full_name: Some(self.full_name.clone()),
            email: Some(Email::parse(&self.email)?),
            password: (!password.is_empty()).then(|| password.to_string()),
        })
    }
}

/// State and actions of the profile page.
#[derive(Debug)]
pub struct ProfileController {
    api: ApiClient,
    pub form: ProfileForm,
    alert: Option<String>,
}

impl ProfileController {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            form: ProfileForm::default(),
            alert: None,
        }
    }

    /// Last blocking alert raised by [`save`](Self::save).
    #[must_use]
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Fetch the profile, refresh the session's copy and fill the form.
    ///
    /// A failure is logged and leaves the form as it was.
    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        match self.api.get_profile().await {
            Ok(user) => {
                self.api.session().set_user(Some(user.clone()));
                self.form.fill_from(&user);
            }
            Err(e) => tracing::error!(error = %e, "Failed to load profile"),
        }
    }

    /// Save the form. Returns whether the profile was updated.
    #[instrument(skip(self))]
    pub async fn save(&mut self) -> bool {
        let update = match self.form.to_update() {
            Ok(update) => update,
            Err(e) => {
                self.alert = Some(e.to_string());
                return false;
            }
        };

        match self.api.update_profile(&update).await {
            Ok(user) => {
                self.api.session().set_user(Some(user.clone()));
                self.form.fill_from(&user);
                self.form.clear_passwords();
                self.alert = Some(SAVED_ALERT.to_string());
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to update profile");
                self.alert = Some(SAVE_FAILED_ALERT.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(password: &str, confirm: &str) -> ProfileForm {
        ProfileForm {
            full_name: "Ana Silva".to_string(),
            email: "ana@example.com".to_string(),
            password: SecretString::from(password.to_string()),
            confirm_password: SecretString::from(confirm.to_string()),
        }
    }

    #[test]
    fn test_blank_password_is_not_sent() {
        let update = form("", "").to_update().unwrap();
        assert_eq!(update.full_name.as_deref(), Some("Ana Silva"));
        assert_eq!(update.email.unwrap().as_str(), "ana@example.com");
        assert!(update.password.is_none());
    }

    #[test]
    fn test_password_must_match_confirmation() {
        assert_eq!(
            form("new-secret", "new-secre").to_update().unwrap_err(),
            FormError::PasswordMismatch
        );
        let update = form("new-secret", "new-secret").to_update().unwrap();
        assert_eq!(update.password.as_deref(), Some("new-secret"));
    }

    #[test]
    fn test_mismatch_message() {
        assert_eq!(
            FormError::PasswordMismatch.to_string(),
            "Passwords do not match"
        );
    }
}
