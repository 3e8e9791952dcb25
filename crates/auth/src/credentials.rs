//! Register/login input shapes and their validation.
//!
//! Fields are optional at the serde level so a missing key becomes a field
//! error in the response instead of an opaque deserialization failure.

use serde::Deserialize;
use utoipa::ToSchema;

use shelf_core::ValidationErrors;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

const MAX_EMAIL_LEN: usize = 254;

/// Validated email/password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegisterInput {
    #[schema(value_type = String, required = true, example = "ada@example.com")]
    pub email: Option<String>,
    /// At least 6 characters.
    #[schema(value_type = String, required = true, min_length = 6, example = "secret1")]
    pub password: Option<String>,
}

impl RegisterInput {
    pub fn validate(self) -> Result<Credentials, ValidationErrors> {
        let mut errs = ValidationErrors::new();

        match self.email.as_deref() {
            None => errs.push("email", "is required"),
            Some(e) if !is_valid_email(e) => errs.push("email", "must be a valid email address"),
            Some(_) => {}
        }

        match self.password.as_deref() {
            None => errs.push("password", "is required"),
            Some(p) if p.chars().count() < MIN_PASSWORD_LEN => errs.push(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters long"),
            ),
            Some(_) => {}
        }

        errs.into_result(())?;
        Ok(Credentials {
            email: self.email.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginInput {
    #[schema(value_type = String, required = true, example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(value_type = String, required = true, example = "secret1")]
    pub password: Option<String>,
}

impl LoginInput {
    /// Presence checks only; anything else would hint at which accounts exist.
    pub fn validate(self) -> Result<Credentials, ValidationErrors> {
        let mut errs = ValidationErrors::new();
        if self.email.as_deref().is_none_or(str::is_empty) {
            errs.push("email", "is required");
        }
        if self.password.as_deref().is_none_or(str::is_empty) {
            errs.push("password", "is required");
        }

        errs.into_result(())?;
        Ok(Credentials {
            email: self.email.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
        })
    }
}

/// Pragmatic email shape check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}
