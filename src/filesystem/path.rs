use std::path::{Component, Path};

/// Normalizes `path` into the key format used by the virtual tree:
/// relative to the tree root, `/`-separated, without leading or trailing
/// separators. `.` components are dropped and `..` pops the previous
/// segment without ever escaping the root.
pub fn normalize(path: impl AsRef<Path>) -> String {
    let mut segments: Vec<String> = Vec::new();

    for component in path.as_ref().components() {
        match component {
            Component::Normal(segment) => {
                segments.push(segment.to_string_lossy().into_owned());
            }
            Component::ParentDir => {
                segments.pop();
            }
            // Prefixes and the root separator are stripped, `.` is a no-op
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    segments.join("/")
}

/// Joins a normalized directory and a child name. The empty string is the root.
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Prefix every normalized path strictly inside `dir` starts with.
pub fn subtree_prefix(dir: &str) -> String {
    if dir.is_empty() {
        String::new()
    } else {
        format!("{dir}/")
    }
}

/// Whether `path` lies strictly inside `dir`. Every non-root path lies inside the root.
pub fn is_descendant(path: &str, dir: &str) -> bool {
    if dir.is_empty() {
        !path.is_empty()
    } else {
        path.starts_with(&subtree_prefix(dir))
    }
}
