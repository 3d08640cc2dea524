//! Secret records and the references used to address them.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login/password pair used for `register` and `login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

/// A stored credential pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginPassword {
    pub login: String,
    pub password: String,
    #[serde(default)]
    pub label: String,
}

/// A stored text note.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSecret {
    pub title: String,
    pub body: String,
}

/// A stored binary blob. `data` holds standard base64 text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySecret {
    pub filename: String,
    #[serde(default)]
    pub mime_type: String,
    pub data: String,
}

impl BinarySecret {
    /// Builds a blob record from raw bytes.
    pub fn from_bytes(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: &[u8],
    ) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Decodes `data` back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.data)
    }
}

/// A stored payment card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSecret {
    pub cardholder: String,
    pub pan: String,
    #[serde(default)]
    pub exp_month: String,
    #[serde(default)]
    pub exp_year: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub last4: String,
}

impl CardSecret {
    /// Fills `last4` from the PAN when it was left empty.
    pub fn with_derived_last4(mut self) -> Self {
        if self.last4.is_empty() {
            let digits: Vec<char> = self.pan.chars().filter(char::is_ascii_digit).collect();
            let start = digits.len().saturating_sub(4);
            self.last4 = digits[start..].iter().collect();
        }
        self
    }
}

/// The four kinds of secret the service stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretKind {
    LoginPassword,
    Text,
    Binary,
    Card,
}

impl SecretKind {
    pub const ALL: [SecretKind; 4] = [
        SecretKind::LoginPassword,
        SecretKind::Text,
        SecretKind::Binary,
        SecretKind::Card,
    ];

    /// Path segment shared by the post/delete endpoints for this kind.
    pub fn slug(self) -> &'static str {
        match self {
            SecretKind::LoginPassword => "login-password",
            SecretKind::Text => "text-secret",
            SecretKind::Binary => "binary-secret",
            SecretKind::Card => "card-secret",
        }
    }

    /// JSON field carrying the natural key in delete requests.
    pub fn key_field(self) -> &'static str {
        match self {
            SecretKind::LoginPassword => "login",
            SecretKind::Text => "title",
            SecretKind::Binary => "filename",
            SecretKind::Card => "cardholder",
        }
    }
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A record of any kind, as sent to the create endpoints.
///
/// Serializes as the bare inner record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SecretRecord {
    LoginPassword(LoginPassword),
    Text(TextSecret),
    Binary(BinarySecret),
    Card(CardSecret),
}

impl SecretRecord {
    pub fn kind(&self) -> SecretKind {
        match self {
            SecretRecord::LoginPassword(_) => SecretKind::LoginPassword,
            SecretRecord::Text(_) => SecretKind::Text,
            SecretRecord::Binary(_) => SecretKind::Binary,
            SecretRecord::Card(_) => SecretKind::Card,
        }
    }

    /// The natural key identifying this record within its kind.
    pub fn key(&self) -> &str {
        match self {
            SecretRecord::LoginPassword(r) => &r.login,
            SecretRecord::Text(r) => &r.title,
            SecretRecord::Binary(r) => &r.filename,
            SecretRecord::Card(r) => &r.cardholder,
        }
    }

    pub fn to_ref(&self) -> SecretRef {
        SecretRef::new(self.kind(), self.key())
    }
}

impl From<LoginPassword> for SecretRecord {
    fn from(value: LoginPassword) -> Self {
        SecretRecord::LoginPassword(value)
    }
}

impl From<TextSecret> for SecretRecord {
    fn from(value: TextSecret) -> Self {
        SecretRecord::Text(value)
    }
}

impl From<BinarySecret> for SecretRecord {
    fn from(value: BinarySecret) -> Self {
        SecretRecord::Binary(value)
    }
}

impl From<CardSecret> for SecretRecord {
    fn from(value: CardSecret) -> Self {
        SecretRecord::Card(value)
    }
}

/// Addresses one record by kind and natural key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SecretRef {
    pub kind: SecretKind,
    pub key: String,
}

impl SecretRef {
    pub fn new(kind: SecretKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
        }
    }
}

impl fmt::Display for SecretRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.key)
    }
}
