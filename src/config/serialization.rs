//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the configuration as a commented config file
    pub fn to_toml(&self) -> String {
        // A disabled sink still writes its settings, ready to switch on
        let sink = self.logging.file.clone().unwrap_or_default();
        format!(
            r#"# events-web configuration

# Web server bind address (env: EVENTS_WEB_BIND)
bind_addr = "{bind}"

# Base URL of the events backend API (env: EVENTS_API_URL)
api_url = "{api_url}"

# Timeout for each backend call, in seconds (env: EVENTS_WEB_TIMEOUT_SECS)
request_timeout_secs = {timeout}

# Largest accepted image upload, in bytes
max_upload_bytes = {max_upload}

# Mark cookies Secure; turn on when served over HTTPS (env: EVENTS_WEB_SECURE_COOKIES)
secure_cookies = {secure_cookies}

# Logging configuration (RUST_LOG env var overrides level)
[logging]
level = "{log_level}"  # trace, debug, info, warn, error
# JSON file logging (in addition to stdout)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"

# Edit form
[forms]
# What to do when a submitted form has empty fields (env: EVENTS_WEB_EMPTY_FIELDS)
#   warn  - show a warning and send the update anyway
#   block - show a warning and don't send it
empty_fields = "{empty_fields}"
"#,
            bind = self.bind_addr,
            api_url = self.api_url,
            timeout = self.request_timeout_secs,
            max_upload = self.max_upload_bytes,
            secure_cookies = self.secure_cookies,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file.is_some(),
            log_file_dir = sink.dir.display().to_string().replace('\\', "/"),
            log_file_rotation = sink.rotation.name(),
            log_file_prefix = sink.prefix,
            empty_fields = self.forms.empty_fields.as_str(),
        )
    }
}
