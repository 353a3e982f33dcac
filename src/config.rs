use std::path::PathBuf;

/// File name of the real library, looked up in the system directory.
pub const REAL_LIBRARY_NAME: &str = "xinput1_3.dll";

/// Log file, relative to the host process working directory.
pub const LOG_FILE_NAME: &str = "OL.log";

/// Fixed settings for the proxy. There is no on-disk configuration; the
/// struct exists so the attach path can be driven against fake libraries
/// and scratch log files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// File name of the impersonated library inside the system directory.
    pub library_name: String,
    /// Append-only trace file.
    pub log_path: PathBuf,
    /// Filter used when `RUST_LOG` is not set.
    pub default_log_filter: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            library_name: REAL_LIBRARY_NAME.to_string(),
            log_path: PathBuf::from(LOG_FILE_NAME),
            default_log_filter: "info".to_string(),
        }
    }
}
