use crate::utils::error::{Result, StoreError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Value-type invariant: `value` must be strictly greater than zero.
pub fn validate_positive<T>(field_name: &str, value: T) -> Result<()>
where
    T: PartialOrd + Default + std::fmt::Display + Copy,
{
    // NaN compares false against everything and is rejected here too.
    if !(value > T::default()) {
        return Err(StoreError::invalid_value(
            field_name,
            value,
            "must be greater than 0",
        ));
    }
    Ok(())
}

/// Rejects NaN and infinities, which the JSON format cannot carry.
pub fn validate_finite(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(StoreError::invalid_value(field_name, value, "must be a finite number"));
    }
    Ok(())
}

/// Value-type invariant: `value` must be at least `min_value`.
pub fn validate_at_least<T>(field_name: &str, value: T, min_value: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min_value {
        return Err(StoreError::invalid_value(
            field_name,
            value,
            format!("must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(StoreError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(StoreError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(
    field_name: &str,
    file: &str,
    allowed_extension: &str,
) -> Result<()> {
    validate_path(field_name, file)?;

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if extension.eq_ignore_ascii_case(allowed_extension) => Ok(()),
        Some(extension) => Err(StoreError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Expected: {}",
                extension, allowed_extension
            ),
        }),
        None => Err(StoreError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}
