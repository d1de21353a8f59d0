use std::borrow::Cow;
use uuid::{Uuid, Variant};
use validator::ValidationError;

/// Accepts only the hyphenated, RFC 4122 version 4 form
/// (`xxxxxxxx-xxxx-4xxx-[89ab]xxx-xxxxxxxxxxxx`).
pub fn validate_uuid4(id: &str) -> Result<(), ValidationError> {
    let valid = id.len() == 36
        && Uuid::parse_str(id)
            .map(|u| u.get_version_num() == 4 && u.get_variant() == Variant::RFC4122)
            .unwrap_or(false);

    if !valid {
        let mut err = ValidationError::new("uuid4");
        err.message = Some(Cow::Borrowed("must be a valid UUID v4"));
        return Err(err);
    }

    Ok(())
}
