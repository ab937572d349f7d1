use super::TextField;

/// Fields of the login form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    /// Login name.
    Username,
    /// Password (rendered masked).
    Password,
}

impl LoginField {
    /// Next field, wrapping.
    pub fn next(self) -> Self {
        match self {
            Self::Username => Self::Password,
            Self::Password => Self::Username,
        }
    }
}

/// Login form state.
#[derive(Debug, Clone)]
pub struct LoginForm {
    /// Login name.
    pub username: TextField,
    /// Password.
    pub password: TextField,
    /// Focused field.
    pub focus: LoginField,
    /// A login request is in flight.
    pub pending: bool,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            username: TextField::new(),
            password: TextField::new(),
            focus: LoginField::Username,
            pending: false,
        }
    }
}

impl LoginForm {
    /// Field by name.
    pub fn field_mut(&mut self, field: LoginField) -> &mut TextField {
        match field {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    /// Submission is allowed only with both fields filled and nothing pending.
    pub fn can_submit(&self) -> bool {
        !self.pending && !self.username.is_empty() && !self.password.is_empty()
    }

    /// Clear all input.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
