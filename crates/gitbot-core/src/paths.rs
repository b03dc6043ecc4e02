//! Command path resolution relative to the config file.

use std::path::{Component, Path, PathBuf};

/// Resolve a command path declared in a config file.
///
/// Paths starting with `.` are anchored at the directory holding the config
/// file. Anything else (absolute paths, bare names looked up on `PATH`) is
/// returned unchanged.
pub fn resolve_command_path(config_path: &Path, command_path: &str) -> PathBuf {
    if !command_path.starts_with('.') {
        return PathBuf::from(command_path);
    }

    let config_dir = match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    clean(&config_dir.join(command_path))
}

/// Lexically normalise a path: drop `.` segments and fold `..` into its parent.
fn clean(path: &Path) -> PathBuf {
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
