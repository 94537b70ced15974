//! Compilation and the main (runtime) template.
//!
//! The main template renders the bundle's `__require__` function. Its body is
//! exposed to plugins through the `require` waterfall hook before it is
//! wrapped, so plugins can surround the module execution line.

use std::path::Path;

use super::hooks::{Hook, RequireFn};
use super::ProvideTable;

/// Start of the line in the require body that executes a module factory.
pub const MODULE_EXECUTION: &str = "modules[moduleId].call(";

/// Default body of `__require__`, before any plugin touches it.
const REQUIRE_BODY: &str = "\
// Check if module is in cache
if (installedModules[moduleId]) {
\treturn installedModules[moduleId].exports;
}
// Create a new module (and put it into the cache)
var module = installedModules[moduleId] = {
\ti: moduleId,
\tl: false,
\texports: {}
};

// Execute the module function
modules[moduleId].call(module.exports, module, module.exports, __require__);

// Flag the module as loaded
module.l = true;

// Return the exports of the module
return module.exports;";

/// Indent every non-empty line by one tab.
pub fn indent(source: &str) -> String {
    source
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("\t{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Chunk being rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Chunk name.
    pub name: String,
    /// Whether the chunk carries the module runtime (and thus `__require__`).
    pub has_runtime: bool,
}

impl Chunk {
    /// An entry chunk that carries the runtime.
    pub fn runtime(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_runtime: true,
        }
    }

    /// A chunk loaded on demand, without a runtime of its own.
    pub fn lazy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_runtime: false,
        }
    }
}

/// Hooks exposed by [`MainTemplate`].
#[derive(Debug, Default)]
pub struct MainTemplateHooks {
    /// Waterfall over the `__require__` body.
    pub require: Hook<RequireFn>,
}

/// Renders the bundle runtime.
#[derive(Debug, Default)]
pub struct MainTemplate {
    pub hooks: MainTemplateHooks,
}

impl MainTemplate {
    /// The body of `__require__` before plugins run.
    pub fn require_body() -> &'static str {
        REQUIRE_BODY
    }

    /// Render the complete `__require__` function for `chunk`.
    pub fn render_require(&self, chunk: &Chunk) -> String {
        let body = self.hooks.require.call(REQUIRE_BODY.to_string(), chunk);
        format!("function __require__(moduleId) {{\n{}\n}}", indent(&body))
    }
}

/// One compilation of the module graph.
#[derive(Debug, Default)]
pub struct Compilation {
    pub main_template: MainTemplate,
    /// Free-variable bindings in effect for this compilation.
    pub provided: ProvideTable,
    /// Whether hot module replacement is enabled for this compilation.
    pub hot: bool,
}

impl Compilation {
    /// Module bound to a free identifier, if any.
    pub fn provided_module(&self, identifier: &str) -> Option<&Path> {
        self.provided.get(identifier).map(|path| path.as_path())
    }
}
