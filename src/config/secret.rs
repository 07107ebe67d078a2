//! Credential handling using the secrecy crate
//!
//! Warehouse tokens and database passwords are held as [`SecretString`]s:
//! zeroed on drop, redacted in `Debug`, and only readable through
//! `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use titlesync::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let password = secret_string("my-password".to_string());
//! assert_eq!(password.expose_secret().as_ref(), "my-password");
//! println!("{:?}", password); // Secret([REDACTED ...])
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String newtype implementing the traits `Secret` requires
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// A secret string, zeroized on drop and redacted in debug output
pub type SecretString = Secret<SecretValue>;

/// Wraps a String as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
