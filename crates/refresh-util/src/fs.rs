use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Read a file to string, replacing invalid UTF-8 sequences with the replacement character.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_to_string_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Lexically normalize a path: drop `.` segments and fold `..` into their parent.
///
/// Does not touch the filesystem, so it also works for paths that don't exist yet.
/// A leading `..` on a relative path is preserved.
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Resolve `path` against `base` when it is relative, then normalize it.
///
/// Existing paths are canonicalized (symlinks resolved, `\\?\` prefixes stripped on
/// Windows). Missing paths fall back to lexical cleaning.
#[must_use]
pub fn normalize_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        canonical_or_clean(path)
    } else {
        canonical_or_clean(&base.join(path))
    }
}

/// Canonicalize `path` if it exists, otherwise clean it lexically.
#[must_use]
pub fn canonical_or_clean(path: &Path) -> PathBuf {
    match dunce::canonicalize(path) {
        Ok(canonical) => canonical,
        Err(_) => dunce::simplified(&clean_path(path)).to_path_buf(),
    }
}

/// Whether any component of `path` equals `name` exactly.
///
/// `has_component("/a/node_modules/b.js", "node_modules")` is true, while a
/// directory merely named `my_node_modules` does not count.
#[must_use]
pub fn has_component(path: &Path, name: &str) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(part) if part == name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_read_to_string_lossy_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x7b, 0x7d, 0x80]).unwrap();
        file.flush().unwrap();

        let content = read_to_string_lossy(file.path()).unwrap();
        assert!(content.starts_with("{}"));
        assert!(content.contains('\u{FFFD}'));
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(
            clean_path(Path::new("/pkg/./runtime/../runtime/utils.js")),
            PathBuf::from("/pkg/runtime/utils.js")
        );
        assert_eq!(clean_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(clean_path(Path::new("../a/b/..")), PathBuf::from("../a"));
        assert_eq!(clean_path(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn test_normalize_path_missing_file() {
        let normalized = normalize_path(Path::new("/project"), Path::new("src/../lib/a.js"));
        assert_eq!(normalized, PathBuf::from("/project/lib/a.js"));
    }

    #[test]
    fn test_normalize_path_existing_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("utils.js");
        fs::write(&file, "").unwrap();

        let via_dot = dir.path().join(".").join("utils.js");
        assert_eq!(
            normalize_path(Path::new("/unused"), &via_dot),
            normalize_path(Path::new("/unused"), &file)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_canonical_or_clean_follows_symlinks() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real");
        fs::create_dir(&real).unwrap();
        fs::write(real.join("utils.js"), "").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        assert_eq!(
            canonical_or_clean(&link.join("utils.js")),
            canonical_or_clean(&real.join("utils.js"))
        );
        assert_eq!(
            canonical_or_clean(Path::new("/missing/./a/../b.js")),
            PathBuf::from("/missing/b.js")
        );
    }

    #[test]
    fn test_has_component() {
        assert!(has_component(
            Path::new("/project/node_modules/foo/bar.jsx"),
            "node_modules"
        ));
        assert!(!has_component(
            Path::new("/project/my_node_modules/bar.jsx"),
            "node_modules"
        ));
        assert!(!has_component(Path::new("/project/src/App.tsx"), "node_modules"));
    }
}
