//! Resolution interception: attach the refresh loader to application modules.

use refresh_util::fs::{canonical_or_clean, clean_path, has_component};
use regex_lite::Regex;
use std::path::Path;
use std::sync::OnceLock;

use super::globals::RuntimePaths;
use crate::host::ResolveData;

/// Directory holding third-party packages.
const VENDOR_DIR: &str = "node_modules";

/// JavaScript-like sources: `.js`, `.jsx`, `.ts`, `.tsx`, `.flow`.
fn source_file_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\.([jt]sx?|flow)$").ok())
        .as_ref()
}

/// Whether `resource` has a JavaScript-like extension.
///
/// Declaration files (`.d.ts`) match too.
pub fn is_source_file(resource: &Path) -> bool {
    source_file_pattern().is_some_and(|re| re.is_match(&resource.to_string_lossy()))
}

/// Whether the refresh loader applies to `resource`.
///
/// Application sources only: not vendored packages, and never the runtime
/// utilities module itself, which would otherwise be transformed into a
/// module that imports itself.
pub fn is_refresh_eligible(resource: &Path, runtime: &RuntimePaths) -> bool {
    is_source_file(resource)
        && !has_component(resource, VENDOR_DIR)
        && !is_runtime_utils(resource, runtime)
}

/// Whether `resource` is the runtime utilities module, however it was reached.
///
/// The host may hand over a path through a symlink or with `..` segments, while
/// [`RuntimePaths`] holds the canonical location.
fn is_runtime_utils(resource: &Path, runtime: &RuntimePaths) -> bool {
    if resource.file_name() != runtime.utils.file_name() {
        return false;
    }
    clean_path(resource) == runtime.utils || canonical_or_clean(resource) == runtime.utils
}

/// `after_resolve` tap: put the refresh loader at the front of eligible modules'
/// loader lists. Other modules pass through untouched.
pub fn intercept(mut data: ResolveData, runtime: &RuntimePaths) -> ResolveData {
    if is_refresh_eligible(&data.resource, runtime) {
        tracing::trace!(resource = %data.resource.display(), "adding refresh loader");
        data.loaders.insert(0, runtime.loader_request());
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> RuntimePaths {
        RuntimePaths::new(Path::new("/pkg/runtime"))
    }

    #[test]
    fn test_source_extensions() {
        for file in [
            "/p/a.js", "/p/a.jsx", "/p/a.ts", "/p/a.tsx", "/p/a.flow", "/p/a.d.ts",
        ] {
            assert!(is_source_file(Path::new(file)), "{file}");
        }
        for file in ["/p/a.css", "/p/a.json", "/p/a.mjs", "/p/a.jsx.map", "/p/tsx"] {
            assert!(!is_source_file(Path::new(file)), "{file}");
        }
    }

    #[test]
    fn test_eligible_application_module() {
        let data = ResolveData::new("./App", "/project/src/App.jsx").with_loaders(["babel-loader"]);
        let out = intercept(data, &runtime());
        assert_eq!(out.loaders, vec!["/pkg/runtime/loader.js", "babel-loader"]);
    }

    #[test]
    fn test_vendored_module_never_intercepted() {
        let data = ResolveData::new("foo/bar", "/project/node_modules/foo/bar.jsx");
        let out = intercept(data.clone(), &runtime());
        assert_eq!(out, data);
    }

    #[test]
    fn test_non_source_passes_through() {
        let data =
            ResolveData::new("./styles.css", "/project/src/styles.css").with_loaders(["css-loader"]);
        assert_eq!(intercept(data.clone(), &runtime()), data);
    }

    #[test]
    fn test_runtime_utils_not_intercepted() {
        let runtime = runtime();
        let data = ResolveData::new("__react_refresh_utils__", runtime.utils.clone());
        assert_eq!(intercept(data.clone(), &runtime), data);

        // Same file reached through a non-normalized path
        let data = ResolveData::new("../runtime/utils", "/pkg/runtime/../runtime/./utils.js");
        assert_eq!(intercept(data.clone(), &runtime), data);

        // Sibling runtime files are ordinary modules
        let data = ResolveData::new("./RefreshEntry", runtime.bootstrap.clone());
        assert_eq!(intercept(data, &runtime).loaders.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_runtime_utils_through_symlink_not_intercepted() {
        use super::super::globals::{BOOTSTRAP_FILE, LOADER_FILE, UTILS_FILE};

        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real-runtime");
        std::fs::create_dir(&real).unwrap();
        for file in [BOOTSTRAP_FILE, UTILS_FILE, LOADER_FILE] {
            std::fs::write(real.join(file), "").unwrap();
        }
        let link = dir.path().join("runtime");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let runtime = RuntimePaths::new(&link);
        let data = ResolveData::new("__react_refresh_utils__", link.join(UTILS_FILE));
        assert_eq!(intercept(data.clone(), &runtime), data);

        // Application modules beside the link are still intercepted
        std::fs::write(dir.path().join("App.jsx"), "").unwrap();
        let data = ResolveData::new("./App", dir.path().join("App.jsx"));
        assert_eq!(intercept(data, &runtime).loaders, vec![runtime.loader_request()]);
    }

    #[test]
    fn test_loader_inserted_once_per_descriptor() {
        let data = ResolveData::new("./index", "/project/src/index.ts");
        let out = intercept(data, &runtime());
        assert_eq!(out.loaders, vec!["/pkg/runtime/loader.js"]);
    }
}
