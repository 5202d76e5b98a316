//! Domestic mobile number type.
//!
//! Checkout and addresses carry Indian mobile numbers: exactly ten digits,
//! no country code, no separators. Formatting for display stays in the
//! presentation layer.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input is not exactly ten digits.
    #[error("phone number must be exactly 10 digits")]
    NotTenDigits,
}

/// A ten-digit domestic mobile number.
///
/// ## Examples
///
/// ```
/// use aurum_core::Phone;
///
/// assert!(Phone::parse("9876543210").is_ok());
///
/// assert!(Phone::parse("").is_err());             // empty
/// assert!(Phone::parse("98765").is_err());        // too short
/// assert!(Phone::parse("+919876543210").is_err()); // country code
/// assert!(Phone::parse("98765 43210").is_err());  // separator
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Number of digits in a domestic mobile number.
    pub const DIGITS: usize = 10;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or is not exactly ten ASCII
    /// digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if s.len() != Self::DIGITS || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::NotTenDigits);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Phone::parse("9876543210").is_ok());
        assert!(Phone::parse("0123456789").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            Phone::parse("98765"),
            Err(PhoneError::NotTenDigits)
        ));
        assert!(matches!(
            Phone::parse("98765432100"),
            Err(PhoneError::NotTenDigits)
        ));
    }

    #[test]
    fn test_parse_non_digits() {
        assert!(matches!(
            Phone::parse("+919876543"),
            Err(PhoneError::NotTenDigits)
        ));
        assert!(matches!(
            Phone::parse("98765 4321"),
            Err(PhoneError::NotTenDigits)
        ));
    }

    #[test]
    fn test_display() {
        let phone = Phone::parse("9876543210").unwrap();
        assert_eq!(phone.to_string(), "9876543210");
    }
}
