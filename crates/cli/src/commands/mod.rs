//! Command implementations and what they share.

pub mod account;
pub mod admin;
pub mod shop;

use std::io::{BufRead, Write};
use std::sync::Arc;

use secrecy::SecretString;
use thiserror::Error;

use catalogue_client::{ApiClient, ClientConfig, FileStorage, SessionStore};
use catalogue_storefront::Storefront;

/// Errors raised by the commands themselves.
#[derive(Debug, Error)]
pub enum CliError {
    /// The action was refused; the message is what a page would have shown.
    #[error("{0}")]
    Refused(String),

    /// The command needs a signed-in user.
    #[error("Not signed in. Run `catalogue login` first.")]
    SignInRequired,

    /// Nothing usable was typed at a prompt.
    #[error("No input for {0}")]
    NoInput(&'static str),
}

/// Everything a command needs: the storefront context over a persisted session.
pub struct Context {
    pub storefront: Storefront,
}

impl Context {
    /// Build the context from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the HTTP client cannot
    /// be built.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = ClientConfig::from_env()?;
        tracing::debug!(api_url = %config.api_url, data_dir = %config.data_dir.display(), "Loaded configuration");

        let session = SessionStore::open(Arc::new(FileStorage::new(&config.data_dir)));
        let api = ApiClient::new(&config, session)?;
        Ok(Self {
            storefront: Storefront::new(api),
        })
    }

    pub fn api(&self) -> &ApiClient {
        self.storefront.api()
    }

    pub fn session(&self) -> &SessionStore {
        self.storefront.session()
    }

    /// Fail unless someone is signed in.
    pub fn require_session(&self) -> Result<(), CliError> {
        if self.session().is_authenticated() {
            Ok(())
        } else {
            Err(CliError::SignInRequired)
        }
    }
}

/// Standard output, locked for a command's lifetime.
pub fn stdout() -> std::io::StdoutLock<'static> {
    std::io::stdout().lock()
}

/// Print `prompt` on stderr and read one line from stdin.
pub fn prompt_line(prompt: &str) -> std::io::Result<String> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{prompt}")?;
    stderr.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// The secret given on the command line, or one read from stdin.
pub fn secret_or_prompt(
    given: Option<String>,
    prompt: &str,
    what: &'static str,
) -> Result<SecretString, Box<dyn std::error::Error>> {
    let value = match given {
        Some(value) => value,
        None => prompt_line(prompt)?,
    };
    if value.is_empty() {
        return Err(CliError::NoInput(what).into());
    }
    Ok(SecretString::from(value))
}

/// Yes/no confirmation read from stdin; anything but `y`/`yes` declines.
pub fn confirm_on_stdin(message: &str) -> bool {
    prompt_line(&format!("{message} [y/N] "))
        .map(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
        .unwrap_or(false)
}
