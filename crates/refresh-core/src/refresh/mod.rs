//! React Fast Refresh plugin.
//!
//! Wires the refresh runtime into a development build so that edits to React
//! components update in place without losing state.
//!
//! ## How It Works
//!
//! 1. Every entry loads `RefreshEntry.js` before user code
//! 2. `__react_refresh_utils__` is bound to the runtime utilities module
//! 3. `before_run` fails the build unless hot module replacement is enabled
//! 4. Application modules get `loader.js` at the front of their loader list
//! 5. The `__require__` runtime wraps each module's execution with refresh
//!    bookkeeping
//!
//! ## Usage
//!
//! ```ignore
//! use refresh_core::refresh::ReactRefreshPlugin;
//!
//! compiler.register_plugin(Arc::new(HotModuleReplacementPlugin));
//! compiler.register_plugin(Arc::new(ReactRefreshPlugin::new()));
//! ```

mod entry;
mod globals;
mod resolve;
mod template;

pub use entry::inject_refresh_entry;
pub use globals::{
    default_runtime_dir, RuntimePaths, BOOTSTRAP_FILE, LOADER_FILE, RUNTIME_UTILS, UTILS_FILE,
};
pub use resolve::{intercept, is_refresh_eligible, is_source_file};
pub use template::create_refresh_template;

use std::sync::Arc;

use crate::config::RefreshOptions;
use crate::host::{
    Compiler, CompilerPlugin, HookResult, Mode, PluginError, HOT_MODULE_REPLACEMENT_PLUGIN,
};

/// Name the plugin registers its taps under.
pub const PLUGIN_NAME: &str = "ReactRefreshPlugin";

/// Message of the error raised when hot module replacement is missing.
pub const HMR_NOT_ENABLED: &str =
    "Hot Module Replacement (HMR) is not enabled! React Refresh requires HMR to function properly.";

/// React Fast Refresh plugin.
#[derive(Debug, Clone)]
pub struct ReactRefreshPlugin {
    options: RefreshOptions,
    runtime: Arc<RuntimePaths>,
}

impl ReactRefreshPlugin {
    /// Create the plugin with default options.
    pub fn new() -> Self {
        Self::with_options(RefreshOptions::default())
    }

    /// Create the plugin with the given options.
    pub fn with_options(options: RefreshOptions) -> Self {
        let runtime = options
            .runtime_dir
            .as_deref()
            .map_or_else(RuntimePaths::default, RuntimePaths::new);
        Self {
            options,
            runtime: Arc::new(runtime),
        }
    }

    /// Plugin options.
    pub fn options(&self) -> &RefreshOptions {
        &self.options
    }

    /// Locations of the runtime files this plugin injects.
    pub fn runtime(&self) -> &RuntimePaths {
        &self.runtime
    }

    /// Whether `apply` does anything for a build in `mode`.
    pub fn is_enabled_for(&self, mode: Mode) -> bool {
        mode == Mode::Development || self.options.force_enable
    }
}

impl Default for ReactRefreshPlugin {
    fn default() -> Self {
        Self::new()
    }
}

/// `before_run` tap: hot module replacement must be registered.
///
/// Matches by plugin name, since the registered plugin may come from a
/// different build of the host than the one this crate links against.
pub fn check_hot_module_replacement(compiler: &Compiler) -> HookResult<()> {
    if compiler.has_plugin(HOT_MODULE_REPLACEMENT_PLUGIN) {
        return Ok(());
    }
    Err(PluginError::new(PLUGIN_NAME, "beforeRun", HMR_NOT_ENABLED))
}

impl CompilerPlugin for ReactRefreshPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn apply(&self, compiler: &mut Compiler) {
        let mode = compiler.options.mode;
        if !self.is_enabled_for(mode) {
            tracing::debug!(%mode, "react refresh disabled for this mode");
            return;
        }
        tracing::debug!(%mode, force = self.options.force_enable, "enabling react refresh");

        let entry = std::mem::take(&mut compiler.options.entry);
        compiler.options.entry = inject_refresh_entry(entry, &self.runtime.bootstrap_request());

        compiler.register_plugin(Arc::new(self.runtime.provide_plugin()));

        compiler
            .hooks
            .before_run
            .tap(PLUGIN_NAME, check_hot_module_replacement);

        let runtime = Arc::clone(&self.runtime);
        compiler
            .hooks
            .normal_module_factory
            .tap(PLUGIN_NAME, move |factory| {
                let runtime = Arc::clone(&runtime);
                factory
                    .hooks
                    .after_resolve
                    .tap(PLUGIN_NAME, move |data| intercept(data, &runtime));
            });

        compiler.hooks.compilation.tap(PLUGIN_NAME, |compilation| {
            compilation
                .main_template
                .hooks
                .require
                .tap(PLUGIN_NAME, create_refresh_template);
        });
    }
}
