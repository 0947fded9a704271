use std::borrow::Cow;

use validator::ValidationError;

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("Value cannot be blank"));
        return Err(error);
    }
    Ok(())
}
