//! Subcommand execution against a [`SecretKeeper`].

use crate::cli::{AddCommand, Command};
use anyhow::{Context, Result};
use std::io::Write;
use strongbox_client::SecretKeeper;
use strongbox_types::{
    BinarySecret, CardSecret, LoginPassword, SecretRecord, SecretRef, TextSecret,
};
use tracing::info;

/// Runs one subcommand, writing user-facing output to `out`.
pub async fn execute(command: Command, keeper: &SecretKeeper, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Register(creds) => {
            let token = keeper
                .register(&creds.login, &creds.password)
                .await
                .context("registration failed")?;
            info!("registered {}", creds.login);
            writeln!(out, "{token}")?;
        }
        Command::Login(creds) => {
            let token = keeper
                .login(&creds.login, &creds.password)
                .await
                .context("login failed")?;
            writeln!(out, "{token}")?;
        }
        Command::List => {
            let bundle = keeper
                .get_all_secrets()
                .await
                .context("failed to load secrets")?;
            writeln!(out, "{}", serde_json::to_string_pretty(bundle.as_ref())?)?;
        }
        Command::Add(add) => {
            let record = build_record(add).await?;
            let secret = record.to_ref();
            keeper
                .add_secret(record)
                .await
                .with_context(|| format!("failed to store {secret}"))?;
            writeln!(out, "stored {secret}")?;
        }
        Command::Delete { kind, key } => {
            let secret = SecretRef::new(kind.into(), key);
            keeper
                .delete_secret(secret.clone())
                .await
                .with_context(|| format!("failed to delete {secret}"))?;
            writeln!(out, "deleted {secret}")?;
        }
        Command::ResetCache => {
            keeper.reset_cache().context("failed to reset cache")?;
            writeln!(out, "cache cleared")?;
        }
    }
    Ok(())
}

async fn build_record(add: AddCommand) -> Result<SecretRecord> {
    let record = match add {
        AddCommand::Login {
            login,
            password,
            label,
        } => LoginPassword {
            login,
            password,
            label,
        }
        .into(),
        AddCommand::Text { title, body } => TextSecret { title, body }.into(),
        AddCommand::Binary {
            file,
            name,
            mime_type,
        } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let filename = match name {
                Some(name) => name,
                None => file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .with_context(|| format!("{} has no file name", file.display()))?,
            };
            BinarySecret::from_bytes(filename, mime_type, &bytes).into()
        }
        AddCommand::Card {
            cardholder,
            pan,
            exp_month,
            exp_year,
            brand,
        } => CardSecret {
            cardholder,
            pan,
            exp_month,
            exp_year,
            brand,
            last4: String::new(),
        }
        .with_derived_last4()
        .into(),
    };
    Ok(record)
}
