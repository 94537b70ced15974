//! Well-known identifiers and the locations of the client runtime files.

use refresh_util::fs::normalize_path;
use std::path::{Path, PathBuf};

use crate::host::ProvidePlugin;

/// Free identifier bound to the runtime utilities module in every module scope.
pub const RUNTIME_UTILS: &str = "__react_refresh_utils__";

/// Bootstrap module loaded ahead of every entry.
pub const BOOTSTRAP_FILE: &str = "RefreshEntry.js";
/// Runtime utilities bound to [`RUNTIME_UTILS`].
pub const UTILS_FILE: &str = "utils.js";
/// Transform step inserted into eligible modules' loader lists.
pub const LOADER_FILE: &str = "loader.js";

/// Directory holding the runtime files shipped with this crate.
pub fn default_runtime_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("runtime")
}

/// Absolute, normalized locations of the client runtime files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    /// Directory the files live in.
    pub root: PathBuf,
    /// Entry bootstrap ([`BOOTSTRAP_FILE`]).
    pub bootstrap: PathBuf,
    /// Runtime utilities ([`UTILS_FILE`]).
    pub utils: PathBuf,
    /// Transform step ([`LOADER_FILE`]).
    pub loader: PathBuf,
}

impl RuntimePaths {
    /// Locate the runtime files under `dir`. Relative directories resolve
    /// against the current working directory.
    pub fn new(dir: &Path) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let root = normalize_path(&cwd, dir);

        Self {
            bootstrap: normalize_path(&root, Path::new(BOOTSTRAP_FILE)),
            utils: normalize_path(&root, Path::new(UTILS_FILE)),
            loader: normalize_path(&root, Path::new(LOADER_FILE)),
            root,
        }
    }

    /// Bootstrap module request, as it appears in entry lists.
    pub fn bootstrap_request(&self) -> String {
        self.bootstrap.to_string_lossy().into_owned()
    }

    /// Loader request, as it appears in a module's loader list.
    pub fn loader_request(&self) -> String {
        self.loader.to_string_lossy().into_owned()
    }

    /// Provide plugin binding [`RUNTIME_UTILS`] to the utilities module.
    pub fn provide_plugin(&self) -> ProvidePlugin {
        ProvidePlugin::new().provide(RUNTIME_UTILS, self.utils.clone())
    }
}

impl Default for RuntimePaths {
    fn default() -> Self {
        Self::new(&default_runtime_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_runtime_files_exist() {
        let paths = RuntimePaths::default();
        assert!(paths.bootstrap.is_file(), "{}", paths.bootstrap.display());
        assert!(paths.utils.is_file(), "{}", paths.utils.display());
        assert!(paths.loader.is_file(), "{}", paths.loader.display());
    }

    #[test]
    fn test_paths_are_normalized() {
        let paths = RuntimePaths::new(Path::new("/pkg/dist/../runtime"));
        assert_eq!(paths.root, PathBuf::from("/pkg/runtime"));
        assert_eq!(paths.utils, PathBuf::from("/pkg/runtime/utils.js"));
        assert_eq!(paths.bootstrap_request(), "/pkg/runtime/RefreshEntry.js");
        assert_eq!(paths.loader_request(), "/pkg/runtime/loader.js");
    }

    #[test]
    fn test_provide_plugin_binding() {
        let paths = RuntimePaths::new(Path::new("/pkg/runtime"));
        let provide = paths.provide_plugin();
        assert_eq!(
            provide.definitions().get(RUNTIME_UTILS),
            Some(&PathBuf::from("/pkg/runtime/utils.js"))
        );
    }
}
