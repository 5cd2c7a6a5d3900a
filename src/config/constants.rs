//! Built-in defaults for locating the API.

/// Address of a backend started locally with its default settings.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable that overrides the API base address.
pub const API_BASE_URL_ENV: &str = "CLINIC_API_BASE_URL";

pub const APP_NAME: &str = "clinic-client";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url_is_http() {
        assert!(
            DEFAULT_API_BASE_URL.starts_with("http://")
                || DEFAULT_API_BASE_URL.starts_with("https://")
        );
        assert!(!DEFAULT_API_BASE_URL.ends_with('/'));
    }
}
