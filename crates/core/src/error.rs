use crate::validation::{CODE_IP_ADDRESS, CODE_REQUIRED};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] with any displayable id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Flatten derive-based validation failures into a single message.
///
/// Messages are sorted so the same input always yields the same text.
impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| {
                    if let Some(msg) = &e.message {
                        return msg.to_string();
                    }
                    match e.code.as_ref() {
                        CODE_REQUIRED => format!("{field} is required"),
                        CODE_IP_ADDRESS => {
                            format!("{field} must be a valid IPv4 or IPv6 address")
                        }
                        code => format!("{field} is invalid ({code})"),
                    }
                })
            })
            .collect();
        messages.sort();
        messages.dedup();
        CoreError::Validation(messages.join("; "))
    }
}
