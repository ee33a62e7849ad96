//! Secret name validation, enforced before any backend call.

use crate::errors::{Error, Result};

const MAX_NAME_CHARS: usize = 253;
const FORBIDDEN_CHARS: [char; 4] = ['=', '/', ',', '\0'];

/// Validate a secret name and return its trimmed form.
///
/// Names must be 1 to 253 characters after trimming and must not contain
/// `=`, `/`, `,` or NUL. These mirror the runtime's own rules so invalid
/// names are rejected here instead of surfacing as opaque backend errors.
pub fn validate_secret_name(name: &str) -> Result<String> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(Error::validation_field("Secret name cannot be empty", "name"));
    }

    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(Error::validation_field(
            format!("Secret name cannot exceed {} characters", MAX_NAME_CHARS),
            "name",
        ));
    }

    if let Some(bad) = trimmed.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(Error::validation_field(
            format!("Secret name cannot contain '{}'", bad.escape_default()),
            "name",
        ));
    }

    Ok(trimmed.to_string())
}
