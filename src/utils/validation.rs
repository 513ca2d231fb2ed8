// src/utils/validation.rs

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Rejects empty and whitespace-only strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// First human-readable message out of a validation report, falling back to
/// the report's own formatting when no field carries a message.
pub fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by_key(|(field, _)| field.to_string());

    fields
        .into_iter()
        .find_map(|(_, kind)| match kind {
            ValidationErrorsKind::Field(errs) => {
                errs.iter().find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            }
            _ => None,
        })
        .unwrap_or_else(|| errors.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected() {
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" \t\n").is_err());
        assert!(validate_not_blank(" x ").is_ok());
    }
}
