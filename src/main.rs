#![warn(clippy::pedantic)]

use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::Parser;
use tvshows_client::{
    api::ApiClient,
    assets,
    content::Intent,
    login::{LoginFormState, LoginOutcome, LoginViewModel},
    provider::{DataProvider, TokenAdapter},
    store::{self, FileStore},
};

use crate::config::{Args, Command};

/// Configuration and argument parsing
mod config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .init();

    match &args.command {
        Command::Assets => {
            for asset in assets::all() {
                println!("{asset}\t{}", asset.resource());
            }
            Ok(())
        }
        Command::Logout => {
            let store = FileStore::open(args.store_path()).context("Failed to open store")?;
            store::logout(&store).context("Failed to clear stored session")
        }
        Command::Get { path } => {
            let (api, _) = connect(&args)?;
            let value: serde_json::Value = api
                .provider()
                .load::<_, ()>(&api.endpoint(path), None)
                .await
                .with_context(|| format!("Failed to get {path}"))?;
            println!("{value:#}");
            Ok(())
        }
        Command::Login {
            email,
            password,
            remember,
            forget,
        } => {
            let (api, store) = connect(&args)?;
            let mut view_model = LoginViewModel::new(api, store);
            view_model.on_show_alert(|alert| eprintln!("{}: {}", alert.title, alert.message));
            let prompt = needs_password_prompt(
                email.as_deref(),
                password.is_some(),
                view_model.state(),
            );

            if let Some(email) = email {
                view_model.handle(Intent::EmailChanged(email.clone()));
            }

            if password.is_some() {
                tracing::warn!(
                    "The password has been provided on the command line. Note that this is less secure than providing it when requested."
                );
            }
            let password = match password {
                Some(password) => Some(password.clone()),
                None if !prompt => None,
                None => {
                    tracing::debug!("Prompting for password...");
                    Some(
                        rpassword::prompt_password("Enter Password: ")
                            .context("Failed to get password")?,
                    )
                }
            };
            if let Some(password) = password {
                view_model.handle(Intent::PasswordChanged(password));
            }

            let remembered = view_model.state().remember_credentials;
            if (*remember && !remembered) || (*forget && remembered) {
                view_model.handle(Intent::ToggleRememberCredentials);
            }

            match view_model.login().await {
                LoginOutcome::LoggedIn(_) => {
                    println!("Logged in.");
                    Ok(())
                }
                LoginOutcome::Rejected => Err(anyhow!("Both an email and a password are required")),
                LoginOutcome::Failed => Err(anyhow!("Login failed")),
            }
        }
    }
}

/// Open the store and build an API client that authenticates from it.
fn connect(args: &Args) -> anyhow::Result<(ApiClient, Arc<FileStore>)> {
    let base_url = args.base_url()?;
    tracing::debug!("Base API URL: {base_url}");
    let store = Arc::new(FileStore::open(args.store_path()).context("Failed to open store")?);
    let provider = DataProvider::new(Arc::new(TokenAdapter::new(Arc::clone(&store))));
    Ok((ApiClient::new(base_url, provider), store))
}

/// Remembered passwords are only reused for the remembered email.
fn needs_password_prompt(
    email: Option<&str>,
    password_given: bool,
    remembered: &LoginFormState,
) -> bool {
    if password_given {
        return false;
    }
    match (&remembered.password, email) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(_), Some(email)) => remembered.email.as_deref() != Some(email),
    }
}
