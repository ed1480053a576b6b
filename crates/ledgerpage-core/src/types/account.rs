//! Account identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated ledger account identifier (principal).
///
/// The identifier is opaque to the client; it is only checked to be
/// non-empty, free of whitespace and of reasonable length.
///
/// # Example
///
/// ```
/// use ledgerpage_core::AccountId;
///
/// let account = AccountId::new("rrkah-fqaaa-aaaaa-aaaaq-cai").unwrap();
/// assert_eq!(account.as_str(), "rrkah-fqaaa-aaaaa-aaaaq-cai");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

/// Longest identifier accepted.
const MAX_LEN: usize = 128;

impl AccountId {
    /// Create a new account identifier, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty, too long or contains whitespace.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::Account {
                value: s.to_string(),
                reason: "must be non-empty".to_string(),
            }
            .into());
        }

        if s.len() > MAX_LEN {
            return Err(InvalidInputError::Account {
                value: s.to_string(),
                reason: format!("must be at most {} characters", MAX_LEN),
            }
            .into());
        }

        if s.chars().any(char::is_whitespace) {
            return Err(InvalidInputError::Account {
                value: s.to_string(),
                reason: "must not contain whitespace".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AccountId> for String {
    fn from(account: AccountId) -> Self {
        account.0
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
