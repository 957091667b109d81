//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the config as a commented TOML file
    pub fn to_toml(&self) -> String {
        format!(
            r#"# matricula configuration

# Base URL of the enrollment backend (MATRICULA_API_URL overrides)
api_url = {api_url:?}

# Color scheme: dark, light (MATRICULA_THEME overrides)
theme = "{theme}"

# Status banners
[status]
success_timeout_ms = {success}
# 0 keeps errors visible until the next action
error_timeout_ms = {error}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# JSON file logging (in addition to TUI buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir:?}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            api_url = self.api_url,
            theme = self.theme.as_str(),
            success = self.status.success_timeout_ms,
            error = self.status.error_timeout_ms,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display().to_string(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
