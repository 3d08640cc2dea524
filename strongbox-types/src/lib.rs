//! Core types for Strongbox.
//!
//! Every secret a user owns belongs to one of four kinds. Records of a kind
//! are identified by a natural key (login, title, filename, cardholder) that
//! the server keeps unique per user.
//!
//! A [`SecretBundle`] is the complete set of a user's secrets. It is the unit
//! the server returns from `get-all-secrets` and the unit the local cache
//! stores.

mod bundle;
mod record;

pub use bundle::SecretBundle;
pub use record::{
    BinarySecret, CardSecret, Credentials, LoginPassword, SecretKind, SecretRecord, SecretRef,
    TextSecret,
};
