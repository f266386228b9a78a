//! Edit-form validation
//!
//! Rules the edit flow checks before handing a patch to
//! [`DirectoryController::edit_record`](crate::client::DirectoryController::edit_record).

use std::sync::LazyLock;

use regex::Regex;

use crate::shared::error::ValidationError;
use crate::shared::user::{User, UserPatch};

const MIN_NAME_CHARS: usize = 2;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-']+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// Values of the edit dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditUserForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl EditUserForm {
    /// Prefill the form from the record being edited
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }

    /// Check every field and collect all failures, in field order.
    pub fn validate(&self) -> Result<UserPatch, Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.first_name.chars().count() < MIN_NAME_CHARS {
            errors.push(ValidationError::new(
                "first_name",
                "First name must be at least 2 characters",
            ));
        }
        if self.last_name.chars().count() < MIN_NAME_CHARS {
            errors.push(ValidationError::new(
                "last_name",
                "Last name must be at least 2 characters",
            ));
        }
        if !is_valid_email(&self.email) {
            errors.push(ValidationError::new(
                "email",
                "Please enter a valid email address",
            ));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(UserPatch {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        })
    }
}

/// Whether `email` has the usual `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    !email.contains("..") && EMAIL_RE.is_match(email)
}
