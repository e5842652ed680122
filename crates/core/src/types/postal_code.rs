//! Brazilian postal code (CEP) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeError {
    /// The input contains something other than ASCII digits.
    #[error("postal code must contain only digits")]
    NonDigit,
    /// The input is longer than a complete postal code.
    #[error("postal code must be at most {max} digits")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A postal code as typed so far.
///
/// Unlike most newtypes this one admits partial values: the checkout form
/// holds whatever the customer has typed, and only a [complete](Self::is_complete)
/// code is ever sent to the lookup service.
///
/// ## Constraints
///
/// - ASCII digits only (`00000-000` style separators are rejected)
/// - Length: 0-8 characters
///
/// ## Examples
///
/// ```
/// use cardapio_core::PostalCode;
///
/// assert!(PostalCode::parse("").is_ok());
/// assert!(PostalCode::parse("6500").is_ok());
/// assert!(PostalCode::parse("65000000").unwrap().is_complete());
///
/// assert!(PostalCode::parse("65000-000").is_err());
/// assert!(PostalCode::parse("650000001").is_err());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Number of digits in a complete postal code.
    pub const LENGTH: usize = 8;

    /// Parse a `PostalCode` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input contains a non-digit character or is
    /// longer than [`Self::LENGTH`].
    pub fn parse(s: &str) -> Result<Self, PostalCodeError> {
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PostalCodeError::NonDigit);
        }

        if s.len() > Self::LENGTH {
            return Err(PostalCodeError::TooLong { max: Self::LENGTH });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns true once all eight digits have been entered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.len() == Self::LENGTH
    }

    /// Returns true if nothing has been entered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of digits entered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the postal code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PostalCode {
    type Err = PostalCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = PostalCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        code.0
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
