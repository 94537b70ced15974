//! Plugin options and build config files.
//!
//! ## Build config format
//!
//! ```json
//! {
//!   "mode": "development",
//!   "context": "/path/to/project",
//!   "entry": { "main": "./src/index.js" },
//!   "plugins": ["HotModuleReplacementPlugin"],
//!   "refresh": { "forceEnable": false }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::host::{
    Compiler, CompilerOptions, CompilerPlugin, EntrySpec, HotModuleReplacementPlugin, Mode,
    NamedPlugin, HOT_MODULE_REPLACEMENT_PLUGIN,
};
use crate::refresh::ReactRefreshPlugin;
use crate::Error;

/// Options for [`ReactRefreshPlugin`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshOptions {
    /// Enable the plugin outside development mode.
    pub force_enable: bool,

    /// Directory holding the client runtime files. Defaults to the files
    /// shipped with this crate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_dir: Option<PathBuf>,
}

impl RefreshOptions {
    /// Set force-enable.
    #[must_use]
    pub fn with_force_enable(mut self, force_enable: bool) -> Self {
        self.force_enable = force_enable;
        self
    }

    /// Set the runtime directory.
    #[must_use]
    pub fn with_runtime_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.runtime_dir = Some(dir.into());
        self
    }
}

/// A build described by a config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build mode. Defaults to production, like most bundlers.
    pub mode: Mode,

    /// Project directory. Relative paths resolve against the config file's directory.
    pub context: Option<PathBuf>,

    /// Entry points.
    pub entry: EntrySpec,

    /// Names of the plugins registered ahead of refresh.
    pub plugins: Vec<String>,

    /// Options for the refresh plugin.
    pub refresh: RefreshOptions,
}

impl BuildConfig {
    /// Instantiate a registered plugin by name.
    fn plugin_for(name: &str) -> Arc<dyn CompilerPlugin> {
        if name == HOT_MODULE_REPLACEMENT_PLUGIN {
            Arc::new(HotModuleReplacementPlugin)
        } else {
            Arc::new(NamedPlugin::new(name))
        }
    }

    /// Build a compiler with every configured plugin plus [`ReactRefreshPlugin`]
    /// registered last, and apply them.
    pub fn into_compiler(self) -> Compiler {
        let mut options = CompilerOptions::new(self.mode, self.entry);
        if let Some(context) = self.context {
            options = options.with_context(context);
        }
        options.plugins = self.plugins.iter().map(|name| Self::plugin_for(name)).collect();
        options
            .plugins
            .push(Arc::new(ReactRefreshPlugin::with_options(self.refresh)));

        let mut compiler = Compiler::new(options);
        compiler.apply_plugins();
        compiler
    }

    /// Override force-enable (e.g. from a CLI flag).
    #[must_use]
    pub fn with_force_enable(mut self, force_enable: bool) -> Self {
        self.refresh.force_enable = force_enable;
        self
    }
}

/// Load a build config from a JSON file.
///
/// A relative `context` or `refresh.runtimeDir` resolves against the directory
/// holding the file; a missing `context` becomes that directory.
pub fn load_build_config(path: &Path) -> Result<BuildConfig, Error> {
    let source =
        refresh_util::fs::read_to_string_lossy(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

    let mut config: BuildConfig =
        serde_json::from_str(&source).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    config.context = Some(match config.context.take() {
        Some(context) => base.join(context),
        None => base.to_path_buf(),
    });
    if let Some(dir) = config.refresh.runtime_dir.take() {
        config.refresh.runtime_dir = Some(base.join(dir));
    }

    tracing::debug!(path = %path.display(), mode = %config.mode, "loaded build config");
    Ok(config)
}
