//! Login and registration input types.

use std::fmt;

use crate::error::{Error, InvalidInputError};

/// Minimum password length accepted by the registration form.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Username and password submitted to `/auth/login`.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use shortlink::LoginCredentials;
///
/// let creds = LoginCredentials::new("alice@example.com", "hunter22");
/// assert_eq!(creds.username(), "alice@example.com");
/// ```
#[derive(Clone)]
pub struct LoginCredentials {
    username: String,
    password: String,
}

impl LoginCredentials {
    /// Create new credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username (the login form accepts an email here).
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    ///
    /// Use this only when constructing the login request.
    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

// Intentionally hide password in Debug output
impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A new-account form submitted to `/auth/register`.
#[derive(Clone)]
pub struct Registration {
    username: String,
    email: String,
    password: String,
    confirm_password: String,
}

impl Registration {
    /// Create a registration form.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Check the form the same way before it is ever sent.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::Registration`] describing the first problem found.
    pub fn validate(&self) -> Result<(), Error> {
        let reject = |msg: &str| -> Result<(), Error> {
            Err(InvalidInputError::Registration(msg.to_string()).into())
        };

        if self.username.is_empty()
            || self.email.is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return reject("All fields are required");
        }

        if self.password != self.confirm_password {
            return reject("Passwords do not match");
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return reject("Password should be at least 8 characters");
        }

        if !looks_like_email(&self.email) {
            return reject("Please enter a valid email address");
        }

        Ok(())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// `local@domain.tld` with no whitespace anywhere.
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
