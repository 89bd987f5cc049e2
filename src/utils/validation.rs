use crate::utils::error::{GradeError, Result};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> GradeError {
    GradeError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

/// 檢查輸入檔副檔名，回傳小寫副檔名
pub fn validate_file_extension(
    field_name: &str,
    file: &str,
    allowed_extensions: &[&str],
) -> Result<String> {
    let extension = Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| invalid(field_name, file, "File has no extension or invalid filename"))?;

    if allowed_extensions.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(invalid(
            field_name,
            file,
            format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        ))
    }
}

pub fn validate_output_formats(field_name: &str, formats: &[String], allowed: &[&str]) -> Result<()> {
    if formats.is_empty() {
        return Err(invalid(field_name, "", "At least one output format is required"));
    }
    for format in formats {
        if !allowed.contains(&format.as_str()) {
            return Err(invalid(
                field_name,
                format,
                format!("Unsupported format. Valid formats: {}", allowed.join(", ")),
            ));
        }
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| GradeError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN 也會落在這裡
    if !(value >= min && value <= max) {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}
