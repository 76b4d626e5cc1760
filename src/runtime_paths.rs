use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{ExecutionMode, LauncherError, RESOURCE_SUBDIR};

/// Directory holding this tool's own sources.
pub(crate) fn default_tool_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// The tool sits one level below the web project it packages.
pub(crate) fn project_root_from_tool_dir(tool_dir: &Path) -> PathBuf {
    let candidate = tool_dir.join("..");
    candidate
        .canonicalize()
        .unwrap_or_else(|_| tool_dir.parent().map(Path::to_path_buf).unwrap_or(candidate))
}

pub(crate) fn default_install_dir() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

pub(crate) fn resolve_resource_dir(
    mode: &ExecutionMode,
    tool_dir: &Path,
    install_dir: Option<&Path>,
) -> PathBuf {
    match mode {
        ExecutionMode::Run {
            bundle_root: Some(bundle_root),
        } => bundle_root.join(RESOURCE_SUBDIR),
        ExecutionMode::Run { bundle_root: None } => install_dir
            .map(|dir| dir.join(RESOURCE_SUBDIR))
            .unwrap_or_else(|| PathBuf::from(RESOURCE_SUBDIR)),
        ExecutionMode::Build => project_root_from_tool_dir(tool_dir).join(RESOURCE_SUBDIR),
    }
}

/// Run mode needs something to serve: the directory must exist and hold at least one entry.
pub(crate) fn require_resource_dir(path: PathBuf) -> Result<PathBuf, LauncherError> {
    let has_entries = fs::read_dir(&path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false);
    if !path.is_dir() || !has_entries {
        return Err(LauncherError::MissingResource { path });
    }
    Ok(path)
}

pub(crate) fn resolve_icon_path(project_root: &Path, icon: Option<&str>) -> Option<PathBuf> {
    let icon = icon?.trim();
    if icon.is_empty() {
        return None;
    }
    let candidate = Path::new(icon);
    let icon_path = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        project_root.join(candidate)
    };
    icon_path.is_file().then_some(icon_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_mode_prefers_bundle_root() {
        let mode = ExecutionMode::Run {
            bundle_root: Some(PathBuf::from("/tmp/bundle")),
        };
        let resolved = resolve_resource_dir(&mode, Path::new("/src/tools"), Some(Path::new("/opt")));
        assert_eq!(resolved, PathBuf::from("/tmp/bundle").join("bin"));
    }

    #[test]
    fn run_mode_without_bundle_root_falls_back_to_install_dir() {
        let mode = ExecutionMode::Run { bundle_root: None };
        let resolved = resolve_resource_dir(&mode, Path::new("/src/tools"), Some(Path::new("/opt/app")));
        assert_eq!(resolved, PathBuf::from("/opt/app").join("bin"));
    }

    #[test]
    fn build_mode_walks_up_one_level_from_tool_dir() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let tool_dir = temp.path().join("tools");
        fs::create_dir_all(&tool_dir).expect("create tool dir");

        let resolved = resolve_resource_dir(&ExecutionMode::Build, &tool_dir, None);
        let expected = temp
            .path()
            .canonicalize()
            .expect("canonicalize temp dir")
            .join("bin");
        assert_eq!(resolved, expected);
    }

    #[test]
    fn require_resource_dir_rejects_missing_and_empty_directories() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let missing = temp.path().join("bin");
        assert!(matches!(
            require_resource_dir(missing.clone()),
            Err(LauncherError::MissingResource { path }) if path == missing
        ));

        fs::create_dir_all(&missing).expect("create empty bin");
        assert!(require_resource_dir(missing.clone()).is_err());

        fs::write(missing.join("index.html"), "<h1>ok</h1>").expect("write index");
        assert_eq!(
            require_resource_dir(missing.clone()).expect("bin with content"),
            missing
        );
    }

    #[test]
    fn resolve_icon_path_requires_an_existing_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        assert_eq!(resolve_icon_path(temp.path(), Some("bin/favicon.ico")), None);
        assert_eq!(resolve_icon_path(temp.path(), Some("  ")), None);
        assert_eq!(resolve_icon_path(temp.path(), None), None);

        let icon = temp.path().join("bin").join("favicon.ico");
        fs::create_dir_all(icon.parent().expect("icon parent")).expect("create bin");
        fs::write(&icon, [0_u8; 4]).expect("write icon");
        assert_eq!(resolve_icon_path(temp.path(), Some("bin/favicon.ico")), Some(icon.clone()));

        let absolute = icon.to_string_lossy().to_string();
        assert_eq!(resolve_icon_path(Path::new("/elsewhere"), Some(absolute.as_str())), Some(icon));
    }
}
