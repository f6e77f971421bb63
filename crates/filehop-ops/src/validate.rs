//! Validation of user-supplied file names.

use filehop_core::NavError;

const MAX_NAME_LEN: usize = 255;

fn invalid(name: &str, reason: impl Into<String>) -> NavError {
    NavError::InvalidName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Validate a single path component typed by the user.
pub fn validate_filename(name: &str) -> Result<(), NavError> {
    if name.is_empty() {
        return Err(invalid(name, "Name cannot be empty"));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(invalid(name, "Name is too long (max 255 characters)"));
    }

    for c in ['/', '\0'] {
        if name.contains(c) {
            return Err(invalid(name, format!("Name cannot contain '{}'", c.escape_default())));
        }
    }

    #[cfg(target_os = "windows")]
    {
        for c in ['\\', ':', '*', '?', '"', '<', '>', '|'] {
            if name.contains(c) {
                return Err(invalid(name, format!("Name cannot contain '{c}'")));
            }
        }

        let reserved = [
            "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
            "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
        ];
        let upper = name.to_uppercase();
        let base = upper.split('.').next().unwrap_or("");
        if reserved.contains(&base) {
            return Err(invalid(name, "Reserved filename"));
        }
    }

    if name == "." || name == ".." {
        return Err(invalid(name, "Name cannot be '.' or '..'"));
    }

    if name.starts_with(' ') || name.ends_with(' ') {
        return Err(invalid(name, "Name cannot start or end with spaces"));
    }

    if name.ends_with('.') {
        return Err(invalid(name, "Name cannot end with a dot"));
    }

    Ok(())
}

/// Validate a relative name that may span nested folders, such as the
/// value of a rename prompt (`docs/notes.md`).
pub fn validate_relative_name(name: &str) -> Result<(), NavError> {
    let trimmed = name.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(invalid(name, "Name cannot be empty"));
    }
    if trimmed.starts_with('/') {
        return Err(invalid(name, "Name must be relative"));
    }
    for part in trimmed.split('/') {
        if part.is_empty() {
            return Err(invalid(name, "Name cannot contain empty segments"));
        }
        if part == ".." {
            continue;
        }
        validate_filename(part)?;
    }
    Ok(())
}
