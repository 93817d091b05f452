//! User field validation
//!
//! Both columns are `VARCHAR(100) NOT NULL`; values are trimmed before
//! the length check. Control characters are refused since PostgreSQL
//! won't store NUL in text.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length (in characters) for `nome` and `email`
const MAX_FIELD_LEN: usize = 100;

/// One `@`, no whitespace, something on both sides
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+$").expect("invalid email regex"));

/// Validated user display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = bounded("nome", s)?;
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated email address (shape only, no normalization)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Create an email, checking the `local@domain` shape.
    ///
    /// # Example
    /// ```
    /// use calcapi_server::models::Email;
    ///
    /// assert!(Email::new("ana@x.com").is_ok());
    /// assert!(Email::new("ana").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = bounded("email", s)?;

        if !EMAIL_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must look like local@domain",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A user about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub nome: UserName,
    pub email: Email,
}

impl NewUser {
    pub fn new(nome: Option<&str>, email: Option<&str>) -> Result<Self, ValidationError> {
        let nome = nome.ok_or(ValidationError::Missing { field: "nome" })?;
        let email = email.ok_or(ValidationError::Missing { field: "email" })?;

        Ok(Self {
            nome: UserName::new(nome)?,
            email: Email::new(email)?,
        })
    }
}

fn bounded<'a>(field: &'static str, s: &'a str) -> Result<&'a str, ValidationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if s.chars().count() > MAX_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_FIELD_LEN,
        });
    }
    if s.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must not contain control characters",
        });
    }
    Ok(s)
}
