//! Require template customization.
//!
//! Wraps the module execution line of `__require__` so every module runs
//! between `prepareRefresh` (which scopes component registration to that
//! module) and `registerExportsForReactRefresh` (which records the module's
//! exported components once it has run). The execution line itself is kept
//! verbatim, so a module's return value and exports are untouched.

use super::globals::RUNTIME_UTILS;
use crate::host::{indent, Chunk, MODULE_EXECUTION};

fn before_module() -> String {
    format!(
        "var cleanup = function NoOp() {{}};\n\
         \n\
         try {{\n\
         \tcleanup = {RUNTIME_UTILS}.prepareRefresh(module.i);"
    )
}

fn after_module() -> String {
    format!(
        "\t{RUNTIME_UTILS}.registerExportsForReactRefresh(module);\n\
         }} finally {{\n\
         \tcleanup();\n\
         }}"
    )
}

/// `require` tap: surround the module execution line with refresh bookkeeping.
///
/// Returns `source` unchanged for chunks without a runtime, or when the
/// execution line can't be found.
pub fn create_refresh_template(source: String, chunk: &Chunk) -> String {
    if !chunk.has_runtime {
        return source;
    }

    let lines: Vec<&str> = source.lines().collect();
    let Some(index) = lines
        .iter()
        .position(|line| line.trim_start().starts_with(MODULE_EXECUTION))
    else {
        tracing::debug!(chunk = %chunk.name, "module execution line not found, template left as is");
        return source;
    };

    let mut out: Vec<String> = Vec::with_capacity(lines.len() + 3);
    out.extend(lines[..index].iter().map(ToString::to_string));
    out.push(before_module());
    out.push(indent(lines[index]));
    out.push(after_module());
    out.extend(lines[index + 1..].iter().map(ToString::to_string));

    let mut rendered = out.join("\n");
    if source.ends_with('\n') {
        rendered.push('\n');
    }
    rendered
}
