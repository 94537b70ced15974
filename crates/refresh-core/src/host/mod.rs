//! Bundler host contract.
//!
//! The extension surface a bundler exposes to its plugins, reduced to the
//! parts refresh binds against:
//!
//! 1. **Options** - mode, entry, registered plugins, provide bindings
//! 2. **Compiler hooks** - `before_run`, `normal_module_factory`, `compilation`
//! 3. **Module factory** - `after_resolve` waterfall per resolved module
//! 4. **Main template** - `require` waterfall over the module runtime
//!
//! The host does not resolve, transform or emit code. [`Compiler::run`] walks
//! the lifecycle in order and hands back the module factory and compilation so
//! the caller can drive per-module and per-chunk events.
//!
//! ## Usage
//!
//! ```ignore
//! use refresh_core::host::{Compiler, CompilerOptions, Mode};
//!
//! let mut compiler = Compiler::new(CompilerOptions::new(Mode::Development, entry));
//! compiler.register_plugin(Arc::new(HotModuleReplacementPlugin));
//! let build = compiler.run().await?;
//! let data = build.module_factory.after_resolve(ResolveData::new("./App", "/src/App.jsx"));
//! ```

mod entry;
mod hooks;
mod module_factory;
mod plugin;
mod template;

pub use entry::{EntryMap, EntryProducer, EntrySpec, EntryValue, DEFAULT_ENTRY_NAME};
pub use hooks::{
    AfterResolveFn, BeforeRunFn, CompilationFn, CompilerHooks, Hook, NormalModuleFactoryFn,
    RequireFn,
};
pub use module_factory::{NormalModuleFactory, NormalModuleFactoryHooks, ResolveData};
pub use plugin::{
    CompilerPlugin, HookResult, HotModuleReplacementPlugin, NamedPlugin, PluginError,
    ProvidePlugin, HOT_MODULE_REPLACEMENT_PLUGIN,
};
pub use template::{indent, Chunk, Compilation, MainTemplate, MainTemplateHooks, MODULE_EXECUTION};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::Error;

/// Free-variable bindings: identifier → module path.
pub type ProvideTable = BTreeMap<String, PathBuf>;

/// Build mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    #[default]
    Production,
    None,
}

impl Mode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build configuration owned by the compiler.
#[derive(Default)]
pub struct CompilerOptions {
    /// Build mode.
    pub mode: Mode,
    /// Entry points.
    pub entry: EntrySpec,
    /// Project directory; relative requests resolve against it.
    pub context: PathBuf,
    /// Registered plugins, in registration order.
    pub plugins: Vec<Arc<dyn CompilerPlugin>>,
    /// Free-variable bindings contributed by provide plugins.
    pub provide: ProvideTable,
}

impl CompilerOptions {
    /// Options with the given mode and entry, no plugins.
    pub fn new(mode: Mode, entry: EntrySpec) -> Self {
        Self {
            mode,
            entry,
            context: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            plugins: Vec::new(),
            provide: ProvideTable::new(),
        }
    }

    /// Set the project directory.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<PathBuf>) -> Self {
        self.context = context.into();
        self
    }

    /// Names of the registered plugins, in order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.name()).collect()
    }
}

impl fmt::Debug for CompilerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilerOptions")
            .field("mode", &self.mode)
            .field("entry", &self.entry)
            .field("context", &self.context)
            .field("plugins", &self.plugin_names())
            .field("provide", &self.provide)
            .finish()
    }
}

/// The compiler: options plus the hooks plugins tap.
#[derive(Debug)]
pub struct Compiler {
    pub options: CompilerOptions,
    pub hooks: CompilerHooks,
}

/// Everything a run produced, ready for per-module and per-chunk events.
#[derive(Debug)]
pub struct Build {
    /// Entries after producers were awaited.
    pub entries: EntryMap,
    /// Module factory with all `after_resolve` taps installed.
    pub module_factory: NormalModuleFactory,
    /// The compilation with all template taps installed.
    pub compilation: Compilation,
}

impl Compiler {
    /// Create a compiler. Plugins already in `options.plugins` are not applied
    /// until [`Compiler::apply_plugins`].
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            options,
            hooks: CompilerHooks::default(),
        }
    }

    /// Apply every plugin currently in `options.plugins`, in order.
    ///
    /// Plugins registered while this runs are applied by their registration and
    /// are not applied twice.
    pub fn apply_plugins(&mut self) {
        let plugins = self.options.plugins.clone();
        for plugin in plugins {
            tracing::debug!(plugin = plugin.name(), "applying plugin");
            plugin.apply(self);
        }
    }

    /// Add a plugin to the registration set and apply it.
    pub fn register_plugin(&mut self, plugin: Arc<dyn CompilerPlugin>) {
        self.options.plugins.push(Arc::clone(&plugin));
        plugin.apply(self);
    }

    /// Whether a plugin with this name is registered.
    pub fn has_plugin(&self, name: &str) -> bool {
        self.options.plugins.iter().any(|plugin| plugin.name() == name)
    }

    /// Bind a free identifier to a module for every later compilation.
    pub fn provide(&mut self, identifier: impl Into<String>, module: impl Into<PathBuf>) {
        self.options.provide.insert(identifier.into(), module.into());
    }

    /// Fire `before_run`. Stops at the first failing tap.
    pub fn call_before_run(&self) -> HookResult<()> {
        for callback in self.hooks.before_run.callbacks() {
            callback(self)?;
        }
        Ok(())
    }

    /// Create the module factory for a build and fire `normal_module_factory`.
    pub fn create_normal_module_factory(&self) -> NormalModuleFactory {
        let mut factory = NormalModuleFactory::new();
        for callback in self.hooks.normal_module_factory.callbacks() {
            callback(&mut factory);
        }
        factory
    }

    /// Create a compilation and fire `compilation`.
    pub fn create_compilation(&self) -> Compilation {
        let mut compilation = Compilation {
            provided: self.options.provide.clone(),
            ..Compilation::default()
        };
        for callback in self.hooks.compilation.callbacks() {
            callback(&mut compilation);
        }
        compilation
    }

    /// Walk the build lifecycle: `before_run`, entry resolution, module
    /// factory, compilation.
    ///
    /// A failing `before_run` tap aborts the run before any compilation is
    /// created.
    pub async fn run(&self) -> Result<Build, Error> {
        tracing::debug!(mode = %self.options.mode, "starting build");
        self.call_before_run()?;

        let entries = self.options.entry.resolve().await;
        tracing::debug!(entries = entries.len(), "entries resolved");

        let module_factory = self.create_normal_module_factory();
        let compilation = self.create_compilation();

        Ok(Build {
            entries,
            module_factory,
            compilation,
        })
    }
}
