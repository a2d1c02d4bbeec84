use crate::utils::error::{FlowLogError, Result};
use crate::utils::logger::LOG_LEVELS;
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(FlowLogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(FlowLogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(FlowLogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FlowLogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
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
        return Err(FlowLogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_log_level(field_name: &str, level: &str) -> Result<()> {
    if !LOG_LEVELS.contains(&level) {
        return Err(FlowLogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: level.to_string(),
            reason: format!("Expected one of {}", LOG_LEVELS.join(", ")),
        });
    }
    Ok(())
}

/// 每個 (欄位, 名稱) 都必須非空且名稱不可重複
pub fn validate_unique_names<'k, 'a, I>(field_name: &str, names: I) -> Result<()>
where
    I: IntoIterator<Item = (&'k str, &'a str)>,
{
    let mut seen = HashSet::new();

    for (key, name) in names {
        validate_non_empty_string(&format!("{}.{}", field_name, key), name)?;

        if !seen.insert(name) {
            return Err(FlowLogError::InvalidConfigValueError {
                field: format!("{}.{}", field_name, key),
                value: name.to_string(),
                reason: "Destination field name is already in use".to_string(),
            });
        }
    }

    Ok(())
}
