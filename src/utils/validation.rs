use crate::utils::{ImageFormat, ValidationError};

/// Validates the declared MIME type of a selected file.
///
/// Only `image/jpeg`, `image/png` and `image/webp` are accepted, compared
/// exactly as declared.
pub fn validate_mime(mime: &str) -> Result<ImageFormat, ValidationError> {
    ImageFormat::from_mime(mime).ok_or_else(|| ValidationError::UnsupportedType(mime.to_string()))
}

/// Validates a custom quality percentage.
pub fn validate_quality_percent(percent: u8) -> Result<u8, ValidationError> {
    if percent == 0 || percent > 100 {
        return Err(ValidationError::settings(format!(
            "Invalid quality value: {percent}. Must be between 1 and 100"
        )));
    }
    Ok(percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exactly_three_types() {
        for mime in ["image/jpeg", "image/png", "image/webp"] {
            assert!(validate_mime(mime).is_ok(), "{mime} should be accepted");
        }
        for mime in ["image/gif", "image/svg+xml", "image/avif", "text/plain", ""] {
            assert_eq!(
                validate_mime(mime),
                Err(ValidationError::UnsupportedType(mime.to_string()))
            );
        }
    }

    #[test]
    fn quality_bounds() {
        assert!(validate_quality_percent(0).is_err());
        assert_eq!(validate_quality_percent(1), Ok(1));
        assert_eq!(validate_quality_percent(100), Ok(100));
        assert!(validate_quality_percent(101).is_err());
    }
}
