use std::path::PathBuf;
use thiserror::Error;

use crate::host::PluginError;

/// Core error type for refresh operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read build config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse build config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A lifecycle hook aborted the build.
    #[error(transparent)]
    Plugin(#[from] PluginError),
}

impl Error {
    /// Stable machine-readable code, used by the CLI's JSON output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigRead { .. } => "REFRESH_CONFIG_READ",
            Self::ConfigParse { .. } => "REFRESH_CONFIG_PARSE",
            Self::Plugin(_) => "REFRESH_PLUGIN_HOOK",
        }
    }
}
