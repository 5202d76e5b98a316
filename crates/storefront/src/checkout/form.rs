//! Checkout identity form.
//!
//! Raw field state as the user typed it, persisted in the session so a
//! reload mid-checkout keeps the entered data, plus the local validation
//! that gates order creation. Validation never touches the network; failures
//! are surfaced per field.

use core::fmt;

use serde::{Deserialize, Serialize};

use aurum_core::{Email, Phone};

/// Raw checkout form fields, exactly as entered.
///
/// Logically scoped to a single checkout attempt; reset on successful order
/// completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub email: String,
    pub mobile: String,
    pub first_name: String,
    pub last_name: String,
}

impl CheckoutForm {
    /// Whether anything has been entered yet.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.email.is_empty()
            && self.mobile.is_empty()
            && self.first_name.is_empty()
            && self.last_name.is_empty()
    }

    /// Validate the form into a customer identity.
    ///
    /// # Errors
    ///
    /// Returns per-field errors when any field is missing or malformed.
    pub fn validate(&self) -> Result<CustomerIdentity, FormErrors> {
        let mut errors = FormErrors::default();

        if self.first_name.trim().is_empty() {
            errors.first_name = Some("first name is required".to_string());
        }
        if self.last_name.trim().is_empty() {
            errors.last_name = Some("last name is required".to_string());
        }

        let email = match Email::parse(self.email.trim()) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.email = Some(e.to_string());
                None
            }
        };

        let phone = match Phone::parse(self.mobile.trim()) {
            Ok(phone) => Some(phone),
            Err(e) => {
                errors.mobile = Some(e.to_string());
                None
            }
        };

        if errors.any() {
            return Err(errors);
        }

        let (Some(email), Some(phone)) = (email, phone) else {
            return Err(errors);
        };

        Ok(CustomerIdentity {
            name: format!("{} {}", self.first_name.trim(), self.last_name.trim()),
            email,
            phone,
        })
    }
}

/// Validated customer identity used to build the order and prefill the
/// payment widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerIdentity {
    /// Full display name.
    pub name: String,
    /// Validated email.
    pub email: Email,
    /// Validated ten-digit mobile number.
    pub phone: Phone,
}

/// Per-field validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl FormErrors {
    /// Whether any field failed.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.email.is_some()
            || self.mobile.is_some()
            || self.first_name.is_some()
            || self.last_name.is_some()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("email", &self.email),
            ("mobile", &self.mobile),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
        ];
        let mut first = true;
        for (name, error) in fields {
            if let Some(error) = error {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{name}: {error}")?;
                first = false;
            }
        }
        if first {
            write!(f, "no field errors")?;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}
