//! Path manipulation utilities for odoons

use std::path::{Component, Path, PathBuf};

/// Resolve `path` against `root` and normalize the result lexically.
///
/// Absolute paths are only normalized. Symlinks are not followed, the
/// filesystem is never touched.
pub fn absolutize(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&root.join(path))
    }
}

/// Remove `.` components and fold `..` into their parent.
///
/// A `..` that would climb above the root (or above the first component of
/// a relative path) is kept as is.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
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

/// Last path component as an owned string, ignoring trailing separators.
pub fn basename(path: &str) -> String {
    normalize(Path::new(path))
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parent of `path` (empty when it has none).
pub fn dirname(path: &str) -> PathBuf {
    normalize(Path::new(path))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}
