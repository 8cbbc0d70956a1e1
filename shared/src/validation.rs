//! Input validation functions
//!
//! Registration only requires fields to be present; emails are stored exactly
//! as submitted, without case folding or format checks.

use validator::Validate;

/// Validate that a single field is present (non-empty)
pub fn validate_required(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("Missing required fields: {}", field));
    }
    Ok(())
}

/// Run the derived validators of a request and report every missing field
///
/// Field names are sorted so the message is stable.
pub fn validate_request<T: Validate>(request: &T) -> Result<(), String> {
    match request.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect();
            fields.sort();
            Err(format!("Missing required fields: {}", fields.join(", ")))
        }
    }
}
