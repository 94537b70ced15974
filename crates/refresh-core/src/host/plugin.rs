//! Plugin interface for the host and its built-in plugins.
//!
//! A plugin is applied once per compiler. It may mutate the compiler's options
//! and tap lifecycle hooks; everything else happens later, when the host fires
//! those hooks.
//!
//! ## Example
//!
//! ```ignore
//! use refresh_core::host::{Compiler, CompilerPlugin};
//!
//! struct Banner;
//!
//! impl CompilerPlugin for Banner {
//!     fn name(&self) -> &str { "Banner" }
//!
//!     fn apply(&self, compiler: &mut Compiler) {
//!         compiler.hooks.compilation.tap(self.name(), |compilation| {
//!             compilation.main_template.hooks.require.tap("Banner", |source, _chunk| {
//!                 format!("// banner\n{source}")
//!             });
//!         });
//!     }
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

use super::{Compiler, ProvideTable};

/// Result type for plugin hooks.
pub type HookResult<T> = Result<T, PluginError>;

/// Error from a plugin hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginError {
    /// Plugin name that caused the error.
    pub plugin: String,
    /// Hook that failed.
    pub hook: &'static str,
    /// Error message.
    pub message: String,
}

impl PluginError {
    /// Create an error for `plugin` failing in `hook`.
    pub fn new(plugin: impl Into<String>, hook: &'static str, message: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            hook,
            message: message.into(),
        }
    }
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.plugin, self.hook, self.message)
    }
}

impl std::error::Error for PluginError {}

/// The plugin trait.
///
/// `name` doubles as the plugin's declared kind: other plugins look each other
/// up by it, never by type, because several builds of the same plugin type may
/// be loaded side by side.
pub trait CompilerPlugin: Send + Sync {
    /// Plugin name for lookups, tap names and error messages.
    fn name(&self) -> &str;

    /// Mutate options and tap hooks. Called once per compiler.
    fn apply(&self, compiler: &mut Compiler);
}

// ============================================================================
// Built-in Plugins
// ============================================================================

/// Name under which the hot module replacement plugin registers.
pub const HOT_MODULE_REPLACEMENT_PLUGIN: &str = "HotModuleReplacementPlugin";

/// Binds free identifiers to modules.
///
/// A module referencing `identifier` without importing it gets the bound
/// module injected by the host's module system.
#[derive(Debug, Clone, Default)]
pub struct ProvidePlugin {
    definitions: ProvideTable,
}

impl ProvidePlugin {
    /// Create a provide plugin with no bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `identifier` to the module at `module`.
    pub fn provide(mut self, identifier: impl Into<String>, module: impl Into<PathBuf>) -> Self {
        self.definitions.insert(identifier.into(), module.into());
        self
    }

    /// The bindings this plugin contributes.
    pub fn definitions(&self) -> &ProvideTable {
        &self.definitions
    }
}

impl CompilerPlugin for ProvidePlugin {
    fn name(&self) -> &str {
        "ProvidePlugin"
    }

    fn apply(&self, compiler: &mut Compiler) {
        for (identifier, module) in &self.definitions {
            compiler.provide(identifier.clone(), module.clone());
        }
    }
}

/// Enables hot module replacement for every compilation.
#[derive(Debug, Clone, Copy, Default)]
pub struct HotModuleReplacementPlugin;

impl CompilerPlugin for HotModuleReplacementPlugin {
    fn name(&self) -> &str {
        HOT_MODULE_REPLACEMENT_PLUGIN
    }

    fn apply(&self, compiler: &mut Compiler) {
        compiler
            .hooks
            .compilation
            .tap(HOT_MODULE_REPLACEMENT_PLUGIN, |compilation| {
                compilation.hot = true;
            });
    }
}

/// A plugin known only by name.
///
/// Stands in for plugins listed in a build config file whose behavior lives
/// outside this process.
#[derive(Debug, Clone)]
pub struct NamedPlugin {
    name: String,
}

impl NamedPlugin {
    /// Create a named placeholder plugin.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl CompilerPlugin for NamedPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, _compiler: &mut Compiler) {}
}
