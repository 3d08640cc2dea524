//! Command-line arguments and the configuration resolved from them.
//!
//! Every global setting can come from a flag or an environment variable,
//! and `main` loads `.env` first, so the precedence is flag, then process
//! environment, then `.env`, then the built-in default.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use strongbox_client::{ClientConfig, ReadPolicy};
use strongbox_types::SecretKind;

#[derive(Parser, Debug)]
#[command(name = "strongbox")]
#[command(about = "Client for a Strongbox secret server, with an encrypted local cache")]
#[command(version)]
#[command(after_help = "\
EXAMPLES:
    export STRONGBOX_TOKEN=$(strongbox register --login alice --password hunter2)
    export STRONGBOX_TOKEN=$(strongbox login --login alice --password hunter2)
    strongbox list
    strongbox add text --title wifi --body 'correct horse'
    strongbox add binary ./id_ed25519 --mime-type application/x-pem-file
    strongbox delete text wifi
    strongbox reset-cache")]
pub struct Cli {
    #[command(flatten)]
    pub config: CliConfig,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct CliConfig {
    /// Server host
    #[arg(long, env = "HTTP_HOST", default_value = "127.0.0.1", global = true)]
    pub host: String,

    /// Server port
    #[arg(long, env = "HTTP_PORT", default_value_t = 8080, global = true)]
    pub port: u16,

    /// Passphrase the wire and cache keys are derived from
    #[arg(
        long,
        env = "CRYPTO_KEY",
        default_value = "change-me",
        hide_env_values = true,
        global = true
    )]
    pub crypto_key: String,

    /// Path of the local encrypted cache
    #[arg(long, env = "STRONGBOX_CACHE", default_value = ".strongbox_cache.db", global = true)]
    pub cache: PathBuf,

    /// Session token from a previous `login`
    #[arg(long, env = "STRONGBOX_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Where reads go first: cache-first or server-first
    #[arg(long, env = "STRONGBOX_READ_POLICY", default_value = "cache-first", global = true)]
    pub read_policy: ReadPolicy,

    /// Request timeout in seconds, 0 for none
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,
}

impl CliConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout_secs: self.timeout,
            read_policy: self.read_policy,
            ..ClientConfig::for_host(&self.host, self.port)
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account, log in and print the session token
    Register(CredentialArgs),

    /// Log in and print the session token
    Login(CredentialArgs),

    /// Print every secret as JSON
    List,

    /// Store a new secret
    #[command(subcommand)]
    Add(AddCommand),

    /// Delete a secret by kind and key
    Delete {
        kind: KindArg,

        /// Login, title, filename or cardholder, depending on kind
        key: String,
    },

    /// Drop the local cache so the next read goes to the server
    ResetCache,
}

#[derive(Args, Debug)]
pub struct CredentialArgs {
    #[arg(long)]
    pub login: String,

    #[arg(long, env = "STRONGBOX_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum AddCommand {
    /// A login/password pair
    Login {
        #[arg(long)]
        login: String,

        #[arg(long)]
        password: String,

        #[arg(long, default_value = "")]
        label: String,
    },

    /// A text note
    Text {
        #[arg(long)]
        title: String,

        #[arg(long)]
        body: String,
    },

    /// The contents of a file
    Binary {
        file: PathBuf,

        /// Name to store it under (defaults to the file name)
        #[arg(long)]
        name: Option<String>,

        #[arg(long, default_value = "application/octet-stream")]
        mime_type: String,
    },

    /// A payment card
    Card {
        #[arg(long)]
        cardholder: String,

        #[arg(long)]
        pan: String,

        #[arg(long, default_value = "")]
        exp_month: String,

        #[arg(long, default_value = "")]
        exp_year: String,

        #[arg(long, default_value = "")]
        brand: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
    Login,
    Text,
    Binary,
    Card,
}

impl From<KindArg> for SecretKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Login => SecretKind::LoginPassword,
            KindArg::Text => SecretKind::Text,
            KindArg::Binary => SecretKind::Binary,
            KindArg::Card => SecretKind::Card,
        }
    }
}
