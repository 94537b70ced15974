//! Module factory: the stage where a request becomes a resolved module.

use std::path::PathBuf;

use super::hooks::{AfterResolveFn, Hook};

/// A resolved module, before its loaders run.
///
/// Loaders follow the usual bundler convention: the list runs right to left,
/// so index 0 sees the output of every other loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveData {
    /// The request as written by the importer (e.g. `./App`).
    pub request: String,
    /// Absolute path of the resolved file.
    pub resource: PathBuf,
    /// Loader requests applied to the file's contents.
    pub loaders: Vec<String>,
}

impl ResolveData {
    /// Create a descriptor with no loaders.
    pub fn new(request: impl Into<String>, resource: impl Into<PathBuf>) -> Self {
        Self {
            request: request.into(),
            resource: resource.into(),
            loaders: Vec::new(),
        }
    }

    /// Set the loader list.
    pub fn with_loaders<I, S>(mut self, loaders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.loaders = loaders.into_iter().map(Into::into).collect();
        self
    }
}

/// Hooks exposed by [`NormalModuleFactory`].
#[derive(Debug, Default)]
pub struct NormalModuleFactoryHooks {
    /// Waterfall run once per resolved module.
    pub after_resolve: Hook<AfterResolveFn>,
}

/// Creates modules for one build.
#[derive(Debug, Default)]
pub struct NormalModuleFactory {
    pub hooks: NormalModuleFactoryHooks,
}

impl NormalModuleFactory {
    /// Create a factory with no taps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `after_resolve` for a module the resolver just produced.
    ///
    /// Takes `&self`, so the host may call it for many modules in any order.
    pub fn after_resolve(&self, data: ResolveData) -> ResolveData {
        self.hooks.after_resolve.call(data)
    }
}
