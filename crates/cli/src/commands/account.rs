//! Account commands: login, register, logout, whoami, profile.

use std::io::Write;

use secrecy::{ExposeSecret, SecretString};

use catalogue_client::REMEMBERED_EMAIL_KEY;
use catalogue_storefront::auth::{
    LoginController, PasswordStrength, REGISTERED_NOTICE, RegisterController, RegistrationForm,
};

use super::{CliError, Context, secret_or_prompt, stdout};

pub async fn login(
    ctx: &Context,
    email: &str,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = LoginController::mount(ctx.api().clone(), "/login");
    if page.location().path() != "/login" {
        writeln!(stdout(), "Already signed in.")?;
        return Ok(());
    }

    let password = secret_or_prompt(password, "Password: ", "password")?;
    if !page.submit(email, &password).await {
        let message = page.error().unwrap_or("Login failed").to_string();
        return Err(CliError::Refused(message).into());
    }

    let user = ctx.session().user().ok_or(CliError::SignInRequired)?;
    tracing::debug!(remembered = ?ctx.session().recall(REMEMBERED_EMAIL_KEY), "Remembered login email");
    writeln!(stdout(), "Signed in as {}", user.display_name())?;
    Ok(())
}

pub async fn register(
    ctx: &Context,
    email: &str,
    name: &str,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let prompted = password.is_none();
    let password = secret_or_prompt(password, "Password: ", "password")?;
    let confirm_password = if prompted {
        secret_or_prompt(None, "Confirm password: ", "password confirmation")?
    } else {
        SecretString::from(password.expose_secret().to_string())
    };

    if let Some(strength) = PasswordStrength::assess(password.expose_secret()) {
        writeln!(stdout(), "{}", strength.label())?;
    }

    let mut page = RegisterController::mount(ctx.api().clone(), "/register");
    let form = RegistrationForm {
        full_name: name.to_string(),
        email: email.to_string(),
        password,
        confirm_password,
    };
    if !page.submit(&form).await {
        let message = page.error().unwrap_or("Registration failed").to_string();
        return Err(CliError::Refused(message).into());
    }

    writeln!(stdout(), "{REGISTERED_NOTICE}")?;
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.session().logout();
    writeln!(stdout(), "Signed out.")?;
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let session = ctx.session().snapshot();
    let mut out = stdout();
    match session.user.filter(|_| session.is_authenticated) {
        Some(user) => {
            let role = if user.is_admin() { "admin" } else { "customer" };
            writeln!(out, "{} <{}> ({role})", user.display_name(), user.email)?;
        }
        None => writeln!(out, "Not signed in.")?,
    }
    Ok(())
}

pub async fn show_profile(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_session()?;
    let mut page = ctx.storefront.profile();
    page.load().await;

    let mut out = stdout();
    writeln!(out, "Name:  {}", page.form.full_name)?;
    writeln!(out, "Email: {}", page.form.email)?;
    Ok(())
}

pub async fn update_profile(
    ctx: &Context,
    name: Option<String>,
    email: Option<String>,
    change_password: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_session()?;
    let mut page = ctx.storefront.profile();
    page.load().await;

    if let Some(name) = name {
        page.form.full_name = name;
    }
    if let Some(email) = email {
        page.form.email = email;
    }
    if change_password {
        page.form.password = secret_or_prompt(None, "New password: ", "password")?;
        page.form.confirm_password =
            secret_or_prompt(None, "Confirm new password: ", "password confirmation")?;
    }

    let saved = page.save().await;
    let alert = page.alert().unwrap_or_default().to_string();
    if !saved {
        return Err(CliError::Refused(alert).into());
    }
    writeln!(stdout(), "{alert}")?;
    Ok(())
}
