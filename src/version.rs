// Version information for the waste detection node

/// Full version string
pub const VERSION: &str = "v0.1.0-detect-serve-2025-08-31";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-08-31";

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("waste-detect-node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
