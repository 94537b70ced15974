#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

//! React Fast Refresh for the bundler host.
//!
//! [`host`] models the bundler's extension points; [`refresh`] is the plugin
//! that wires the refresh runtime into them.

pub mod config;
pub mod error;
pub mod host;
pub mod refresh;
pub mod version;

pub use config::{load_build_config, BuildConfig, RefreshOptions};
pub use error::Error;
pub use host::{Compiler, CompilerOptions, CompilerPlugin, EntrySpec, Mode, PluginError};
pub use refresh::ReactRefreshPlugin;
pub use version::VERSION;
