use bcrypt::BcryptError;
use diesel::result::Error as DieselError;
use tower_sessions::session::Error as SessionError;
use validator::ValidationErrors;
use crate::data::models::{ApiError, LoginError, RegisterError};

impl From<DieselError> for LoginError {
    fn from(err: DieselError) -> Self {
        LoginError::DatabaseError(err)
    }
}

impl From<BcryptError> for LoginError {
    fn from(err: BcryptError) -> Self {
        LoginError::HashingError(err)
    }
}

impl From<SessionError> for LoginError {
    fn from(err: SessionError) -> Self {
        LoginError::SessionError(err.to_string())
    }
}

impl From<BcryptError> for RegisterError {
    fn from(err: BcryptError) -> Self {
        RegisterError::HashingError(err)
    }
}

impl From<LoginError> for RegisterError {
    fn from(err: LoginError) -> Self {
        RegisterError::SessionError(err.to_string())
    }
}

impl From<ValidationErrors> for RegisterError {
    fn from(err: ValidationErrors) -> Self {
        RegisterError::ValidationError(validation_message(&err))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        ApiError::ValidationError(validation_message(&err))
    }
}

/// Joins the human messages of every failed rule, falling back to the
/// rule code when a rule has no message.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .errors()
        .values()
        .filter_map(|kind| match kind {
            validator::ValidationErrorsKind::Field(errs) => Some(errs.clone()),
            _ => None,
        })
        .flatten()
        .map(|err| {
            err.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string())
        })
        .collect();
    messages.sort();
    messages.dedup();

    if messages.is_empty() {
        "Invalid input".to_string()
    } else {
        messages.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::{LogStudyRequest, RegisterForm};
    use validator::Validate;

    #[test]
    fn collects_field_messages() {
        let form = RegisterForm {
            email: "not-an-email".into(),
            password: "short".into(),
        };
        let message = validation_message(&form.validate().unwrap_err());
        assert!(message.contains("Invalid email address"));
        assert!(message.contains("Password must be at least 8 characters"));
    }

    #[test]
    fn includes_struct_level_message() {
        let request = LogStudyRequest {
            subject: "Química".into(),
            topic: "Estequiometria".into(),
            correct_count: 12,
            total_count: 10,
            study_date: None,
        };
        let message = validation_message(&request.validate().unwrap_err());
        assert_eq!(message, "Correct count cannot exceed total count");
    }
}
