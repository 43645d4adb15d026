use crate::utils::error::{ProvisionError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ProvisionError::InvalidConfig {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ProvisionError::InvalidConfig {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ProvisionError::InvalidConfig {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ProvisionError::InvalidArgs {
            message: format!("{} cannot be empty or whitespace-only", field_name),
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
        return Err(ProvisionError::InvalidConfig {
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
    fn test_validate_url() {
        assert!(validate_url("networking", "https://networking.uk-1.cloud.global.fujitsu.com").is_ok());
        assert!(validate_url("networking", "http://127.0.0.1:9696").is_ok());
        assert!(validate_url("networking", "").is_err());
        assert!(validate_url("networking", "invalid-url").is_err());
        assert!(validate_url("networking", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("name", "port-01").is_ok());
        assert!(validate_non_empty_string("name", "   ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timeout_seconds", 30u64, 1, 600).is_ok());
        assert!(validate_range("timeout_seconds", 0u64, 1, 600).is_err());
        assert!(validate_range("timeout_seconds", 601u64, 1, 600).is_err());
    }
}
