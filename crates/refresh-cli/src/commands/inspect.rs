//! `refresh inspect` command implementation.
//!
//! Applies React Fast Refresh to a build config and reports what it changed:
//! resolved entries, provided globals, loader lists for sample modules and,
//! optionally, the customized `__require__` runtime.

use miette::{IntoDiagnostic, Result};
use refresh_core::host::{Chunk, EntryMap, ResolveData};
use refresh_core::refresh::PLUGIN_NAME;
use refresh_core::{load_build_config, Error};
use refresh_util::fs::normalize_path;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Inspect command action.
#[derive(Debug, Clone)]
pub struct InspectAction {
    /// Build config file.
    pub config: PathBuf,
    /// Working directory.
    pub cwd: PathBuf,
    /// Enable refresh regardless of the config's mode.
    pub force: bool,
    /// Module paths to run through resolution interception.
    pub modules: Vec<PathBuf>,
    /// Render the `__require__` runtime for an entry chunk.
    pub template: bool,
}

/// JSON output for inspect command.
#[derive(Serialize)]
struct InspectResultJson {
    ok: bool,
    config: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<String>,
    enabled: bool,
    plugins: Vec<String>,
    entries: EntryMap,
    provide: BTreeMap<String, String>,
    modules: Vec<ModuleJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<InspectErrorJson>,
}

#[derive(Serialize)]
struct ModuleJson {
    request: String,
    resource: String,
    loaders: Vec<String>,
    intercepted: bool,
}

#[derive(Serialize)]
struct InspectErrorJson {
    code: String,
    message: String,
}

/// Run the inspect command.
pub fn run(action: InspectAction, json: bool) -> Result<()> {
    let config_path = normalize_path(&action.cwd, &action.config);

    let config = match load_build_config(&config_path) {
        Ok(config) => config,
        Err(e) => return fail(&action, None, &e, json),
    };
    let config = if action.force {
        config.with_force_enable(true)
    } else {
        config
    };
    let mode = config.mode;

    let compiler = config.into_compiler();
    let enabled = compiler.hooks.before_run.names().contains(&PLUGIN_NAME);
    tracing::debug!(%mode, enabled, "compiler ready");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;
    let build = match runtime.block_on(compiler.run()) {
        Ok(build) => build,
        Err(e) => return fail(&action, Some(mode.as_str()), &e, json),
    };

    let context = compiler.options.context.clone();
    let modules: Vec<ModuleJson> = action
        .modules
        .iter()
        .map(|module| {
            let resource = normalize_path(&context, module);
            let before = ResolveData::new(module.display().to_string(), resource);
            let after = build.module_factory.after_resolve(before.clone());
            ModuleJson {
                request: after.request.clone(),
                resource: after.resource.display().to_string(),
                intercepted: after.loaders.len() > before.loaders.len(),
                loaders: after.loaders,
            }
        })
        .collect();

    let template = action.template.then(|| {
        build
            .compilation
            .main_template
            .render_require(&Chunk::runtime("main"))
    });

    let result = InspectResultJson {
        ok: true,
        config: config_path.display().to_string(),
        mode: Some(mode.as_str().to_string()),
        enabled,
        plugins: compiler
            .options
            .plugin_names()
            .into_iter()
            .map(ToString::to_string)
            .collect(),
        entries: build.entries,
        provide: build
            .compilation
            .provided
            .iter()
            .map(|(ident, path)| (ident.clone(), path.display().to_string()))
            .collect(),
        modules,
        template,
        error: None,
    };

    if json {
        println!("{}", serde_json::to_string(&result).into_diagnostic()?);
    } else {
        print_human(&result);
    }

    Ok(())
}

fn print_human(result: &InspectResultJson) {
    let mode = result.mode.as_deref().unwrap_or("?");
    if result.enabled {
        println!("React Refresh: enabled ({mode})");
    } else {
        println!("React Refresh: disabled ({mode}, use --force to enable)");
    }

    println!("Plugins: {}", result.plugins.join(", "));

    println!("Entries:");
    for (name, requests) in &result.entries {
        println!("  {name}:");
        for request in requests {
            println!("    - {request}");
        }
    }

    if !result.provide.is_empty() {
        println!("Provided globals:");
        for (ident, path) in &result.provide {
            println!("  {ident} -> {path}");
        }
    }

    if !result.modules.is_empty() {
        println!("Modules:");
        for module in &result.modules {
            let mark = if module.intercepted { "+" } else { " " };
            println!("  {mark} {}", module.resource);
            for loader in &module.loaders {
                println!("      {loader}");
            }
        }
    }

    if let Some(template) = &result.template {
        println!();
        println!("{template}");
    }
}

fn fail(action: &InspectAction, mode: Option<&str>, e: &Error, json: bool) -> Result<()> {
    if json {
        let result = InspectResultJson {
            ok: false,
            config: action.config.display().to_string(),
            mode: mode.map(ToString::to_string),
            enabled: false,
            plugins: Vec::new(),
            entries: EntryMap::new(),
            provide: BTreeMap::new(),
            modules: Vec::new(),
            template: None,
            error: Some(InspectErrorJson {
                code: e.code().to_string(),
                message: e.to_string(),
            }),
        };
        println!("{}", serde_json::to_string(&result).into_diagnostic()?);
    } else {
        eprintln!("error: {e}");
    }
    std::process::exit(1);
}
