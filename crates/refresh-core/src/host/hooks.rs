//! Tap registry for the host lifecycle.
//!
//! A [`Hook`] is an ordered list of named callbacks. Plugins tap hooks during
//! `apply`, and the host calls the taps later in registration order. The
//! callback signature is fixed per hook through the aliases below, so each
//! hook gets a typed `tap` method that accepts a plain closure.

use std::fmt;
use std::sync::Arc;

use super::module_factory::{NormalModuleFactory, ResolveData};
use super::plugin::HookResult;
use super::template::{Chunk, Compilation};
use super::Compiler;

/// Runs once per build, before any compilation exists. An error aborts the build.
pub type BeforeRunFn = dyn Fn(&Compiler) -> HookResult<()> + Send + Sync;

/// Runs each time the host creates a module factory.
pub type NormalModuleFactoryFn = dyn Fn(&mut NormalModuleFactory) + Send + Sync;

/// Runs once per compilation, right after it is created.
pub type CompilationFn = dyn Fn(&mut Compilation) + Send + Sync;

/// Waterfall over each resolved module.
pub type AfterResolveFn = dyn Fn(ResolveData) -> ResolveData + Send + Sync;

/// Waterfall over the body of the generated `__require__` function.
pub type RequireFn = dyn Fn(String, &Chunk) -> String + Send + Sync;

/// A named callback.
pub struct Tap<F: ?Sized> {
    /// Name of the plugin that registered the callback.
    pub name: String,
    /// The callback itself.
    pub callback: Arc<F>,
}

/// An ordered set of taps for one lifecycle event.
pub struct Hook<F: ?Sized> {
    taps: Vec<Tap<F>>,
}

impl<F: ?Sized> Hook<F> {
    /// Create an empty hook.
    pub fn new() -> Self {
        Self { taps: Vec::new() }
    }

    fn push(&mut self, name: impl Into<String>, callback: Arc<F>) {
        self.taps.push(Tap {
            name: name.into(),
            callback,
        });
    }

    /// Number of registered taps.
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Whether nothing has tapped this hook.
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Callbacks in registration order.
    pub fn callbacks(&self) -> impl Iterator<Item = &Arc<F>> {
        self.taps.iter().map(|tap| &tap.callback)
    }

    /// Names of the tapping plugins, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.taps.iter().map(|tap| tap.name.as_str()).collect()
    }
}

impl<F: ?Sized> Default for Hook<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> fmt::Debug for Hook<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook").field("taps", &self.names()).finish()
    }
}

impl Hook<BeforeRunFn> {
    /// Tap the hook.
    pub fn tap(
        &mut self,
        name: impl Into<String>,
        callback: impl Fn(&Compiler) -> HookResult<()> + Send + Sync + 'static,
    ) {
        self.push(name, Arc::new(callback));
    }
}

impl Hook<NormalModuleFactoryFn> {
    /// Tap the hook.
    pub fn tap(
        &mut self,
        name: impl Into<String>,
        callback: impl Fn(&mut NormalModuleFactory) + Send + Sync + 'static,
    ) {
        self.push(name, Arc::new(callback));
    }
}

impl Hook<CompilationFn> {
    /// Tap the hook.
    pub fn tap(
        &mut self,
        name: impl Into<String>,
        callback: impl Fn(&mut Compilation) + Send + Sync + 'static,
    ) {
        self.push(name, Arc::new(callback));
    }
}

impl Hook<AfterResolveFn> {
    /// Tap the hook.
    pub fn tap(
        &mut self,
        name: impl Into<String>,
        callback: impl Fn(ResolveData) -> ResolveData + Send + Sync + 'static,
    ) {
        self.push(name, Arc::new(callback));
    }

    /// Pass `data` through every tap, each receiving the previous tap's output.
    pub fn call(&self, data: ResolveData) -> ResolveData {
        self.callbacks().fold(data, |data, callback| callback(data))
    }
}

impl Hook<RequireFn> {
    /// Tap the hook.
    pub fn tap(
        &mut self,
        name: impl Into<String>,
        callback: impl Fn(String, &Chunk) -> String + Send + Sync + 'static,
    ) {
        self.push(name, Arc::new(callback));
    }

    /// Pass `source` through every tap, each receiving the previous tap's output.
    pub fn call(&self, source: String, chunk: &Chunk) -> String {
        self.callbacks()
            .fold(source, |source, callback| callback(source, chunk))
    }
}

/// Hooks exposed by [`Compiler`].
#[derive(Debug, Default)]
pub struct CompilerHooks {
    /// Fires once before the build starts.
    pub before_run: Hook<BeforeRunFn>,
    /// Fires when the module factory for a build is created.
    pub normal_module_factory: Hook<NormalModuleFactoryFn>,
    /// Fires when a compilation is created.
    pub compilation: Hook<CompilationFn>,
}

impl CompilerHooks {
    /// Total taps across all compiler-level hooks.
    pub fn tap_count(&self) -> usize {
        self.before_run.len() + self.normal_module_factory.len() + self.compilation.len()
    }
}
