use std::{collections::BTreeMap, sync::LazyLock};

use pennypost_proto::{MIN_PASSWORD_LEN, NewAccount};
use regex::Regex;

use super::TextField;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").ok());

/// Fields of the signup form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SignupField {
    /// Login name.
    Username,
    /// Email address.
    Email,
    /// Password.
    Password,
    /// Password confirmation.
    Confirm,
}

impl SignupField {
    /// All fields in focus order.
    pub const ALL: [Self; 4] = [Self::Username, Self::Email, Self::Password, Self::Confirm];

    /// Next field, wrapping.
    pub fn next(self) -> Self {
        match self {
            Self::Username => Self::Email,
            Self::Email => Self::Password,
            Self::Password => Self::Confirm,
            Self::Confirm => Self::Username,
        }
    }

    /// Previous field, wrapping.
    pub fn prev(self) -> Self {
        match self {
            Self::Username => Self::Confirm,
            Self::Email => Self::Username,
            Self::Password => Self::Email,
            Self::Confirm => Self::Password,
        }
    }
}

/// Signup form state with per-field validation errors.
#[derive(Debug, Clone)]
pub struct SignupForm {
    /// Login name.
    pub username: TextField,
    /// Email address.
    pub email: TextField,
    /// Password.
    pub password: TextField,
    /// Password confirmation.
    pub confirm: TextField,
    /// Focused field.
    pub focus: SignupField,
    /// A signup request is in flight.
    pub pending: bool,
    errors: BTreeMap<SignupField, &'static str>,
}

impl Default for SignupForm {
    fn default() -> Self {
        Self {
            username: TextField::new(),
            email: TextField::new(),
            password: TextField::new(),
            confirm: TextField::new(),
            focus: SignupField::Username,
            pending: false,
            errors: BTreeMap::new(),
        }
    }
}

impl SignupForm {
    /// Field by name.
    pub fn field(&self, field: SignupField) -> &TextField {
        match field {
            SignupField::Username => &self.username,
            SignupField::Email => &self.email,
            SignupField::Password => &self.password,
            SignupField::Confirm => &self.confirm,
        }
    }

    /// Field by name, mutable.
    pub fn field_mut(&mut self, field: SignupField) -> &mut TextField {
        match field {
            SignupField::Username => &mut self.username,
            SignupField::Email => &mut self.email,
            SignupField::Password => &mut self.password,
            SignupField::Confirm => &mut self.confirm,
        }
    }

    /// Validation error for a field, if any.
    pub fn error(&self, field: SignupField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    /// True if any field has a validation error.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Editing a field clears its error.
    pub fn clear_error(&mut self, field: SignupField) {
        self.errors.remove(&field);
    }

    /// Validate every field, replacing previous errors. Returns true if valid.
    pub fn validate(&mut self) -> bool {
        self.errors = check(
            self.username.value(),
            self.email.value(),
            self.password.value(),
            self.confirm.value(),
        );
        self.errors.is_empty()
    }

    /// Registration request. The confirmation field is not sent.
    pub fn account(&self) -> NewAccount {
        NewAccount {
            username: self.username.value().to_string(),
            email: self.email.value().to_string(),
            password: self.password.value().to_string(),
        }
    }

    /// Clear all input and errors.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn check(
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> BTreeMap<SignupField, &'static str> {
    let mut errors = BTreeMap::new();

    if username.trim().is_empty() {
        errors.insert(SignupField::Username, "Username is required");
    }

    if email.trim().is_empty() {
        errors.insert(SignupField::Email, "Email is required");
    } else if !is_email(email) {
        errors.insert(SignupField::Email, "Email is invalid");
    }

    if password.is_empty() {
        errors.insert(SignupField::Password, "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(SignupField::Password, "Password must be at least 6 characters");
    }

    if password != confirm {
        errors.insert(SignupField::Confirm, "Passwords do not match");
    }

    errors
}

fn is_email(candidate: &str) -> bool {
    EMAIL_PATTERN.as_ref().is_some_and(|pattern| pattern.is_match(candidate))
}
