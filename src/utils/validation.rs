use crate::utils::error::{CcpError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CcpError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// A single path component: non-empty, no separators, no NUL, not `.`/`..`.
pub fn validate_path_component(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;

    let reason = if value.contains('\0') {
        Some("Value contains null bytes")
    } else if value.contains('/') || value.contains('\\') {
        Some("Value must not contain path separators")
    } else if value == "." || value == ".." {
        Some("Value must not be a relative directory reference")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(CcpError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("app_name", "ccp").is_ok());
        assert!(validate_non_empty_string("app_name", "").is_err());
        assert!(validate_non_empty_string("app_name", "   ").is_err());
    }

    #[test]
    fn test_validate_path_component() {
        assert!(validate_path_component("file_name", "profiles").is_ok());
        assert!(validate_path_component("file_name", "my-profiles_2").is_ok());
        assert!(validate_path_component("file_name", "a/b").is_err());
        assert!(validate_path_component("file_name", "a\\b").is_err());
        assert!(validate_path_component("file_name", "..").is_err());
        assert!(validate_path_component("file_name", "bad\0name").is_err());
    }
}
