use crate::utils::error::{ClipError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClipError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_pin_name(field_name: &str, pin: &str) -> Result<()> {
    validate_non_empty_string(field_name, pin)?;

    if !pin.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ClipError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: pin.to_string(),
            reason: "Pin names may only contain ASCII letters, digits and '_'".to_string(),
        });
    }
    Ok(())
}

pub fn validate_unique<'a, I>(field_name: &str, values: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(ClipError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.to_string(),
                reason: "Value is used more than once".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ClipError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pin_name() {
        assert!(validate_pin_name("start.pin", "D5").is_ok());
        assert!(validate_pin_name("start.pin", "MOSI").is_ok());
        assert!(validate_pin_name("start.pin", "").is_err());
        assert!(validate_pin_name("start.pin", "D 5").is_err());
    }

    #[test]
    fn test_validate_unique() {
        assert!(validate_unique("labels", ["SWO", "SWCK"]).is_ok());

        let err = validate_unique("labels", ["SWO", "SWCK", "SWO"]).unwrap_err();
        match err {
            ClipError::InvalidConfigValueError { value, .. } => assert_eq!(value, "SWO"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timing.step_delay_ms", 200u64, 0, 10_000).is_ok());
        assert!(validate_range("timing.step_delay_ms", 20_000u64, 0, 10_000).is_err());
    }
}
