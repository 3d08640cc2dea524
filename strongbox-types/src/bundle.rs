use crate::record::{BinarySecret, CardSecret, LoginPassword, SecretKind, SecretRef, TextSecret};
use serde::{Deserialize, Deserializer, Serialize};

/// All secrets of the current user, grouped by kind.
///
/// Order within each list is the order the server returned. A `null` list on
/// the wire decodes as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretBundle {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub login_password: Vec<LoginPassword>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text_secret: Vec<TextSecret>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub binary_secret: Vec<BinarySecret>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub card_secret: Vec<CardSecret>,
}

impl SecretBundle {
    /// Total number of records across all kinds.
    pub fn len(&self) -> usize {
        self.login_password.len()
            + self.text_secret.len()
            + self.binary_secret.len()
            + self.card_secret.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of records of one kind.
    pub fn count(&self, kind: SecretKind) -> usize {
        match kind {
            SecretKind::LoginPassword => self.login_password.len(),
            SecretKind::Text => self.text_secret.len(),
            SecretKind::Binary => self.binary_secret.len(),
            SecretKind::Card => self.card_secret.len(),
        }
    }

    /// Whether a record with the given natural key is present.
    pub fn contains(&self, secret: &SecretRef) -> bool {
        let key = secret.key.as_str();
        match secret.kind {
            SecretKind::LoginPassword => self.login_password.iter().any(|r| r.login == key),
            SecretKind::Text => self.text_secret.iter().any(|r| r.title == key),
            SecretKind::Binary => self.binary_secret.iter().any(|r| r.filename == key),
            SecretKind::Card => self.card_secret.iter().any(|r| r.cardholder == key),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
