//! Configuration validation
//!
//! Validates configuration at startup to catch misconfigurations early.

use anyhow::Result;
use blobdrop_core::Config;

const DETAILED_ERRORS_IN_PRODUCTION: &str =
    "SHOW_DETAILED_ERRORS is enabled in production; internal error text will reach clients";

/// Validate configuration values, failing on anything that would break at runtime.
///
/// Settings that are legal but risky are logged as warnings, so call this
/// after telemetry is up.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    for warning in config_warnings(config) {
        tracing::warn!("{}", warning);
    }

    Ok(())
}

/// Warnings for settings that are accepted but risky.
pub fn config_warnings(config: &Config) -> Vec<&'static str> {
    let mut warnings = Vec::new();
    if config.is_production() && config.show_detailed_errors {
        warnings.push(DETAILED_ERRORS_IN_PRODUCTION);
    }
    warnings
}
