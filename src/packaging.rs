use std::{
    fs, io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::{
    append_build_log, command_line::CommandLine, runtime_paths, AppConfig, BuildResult,
    LauncherError, BUILD_DESCRIPTOR_EXTENSION, BUILD_DIR_NAME, BYTECODE_CACHE_DIR_NAME,
    RESOURCE_SUBDIR,
};

/// Everything the packaging tool is asked to do, before it is turned into argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PackagingInvocation {
    pub(crate) packager: CommandLine,
    pub(crate) resource_dir: PathBuf,
    pub(crate) icon: Option<PathBuf>,
    pub(crate) app_name: String,
    pub(crate) entry_point: PathBuf,
    pub(crate) working_dir: PathBuf,
    // Carried for the packager's benefit only.
    pub(crate) window_title: String,
    pub(crate) window_size: (u32, u32),
}

impl PackagingInvocation {
    pub(crate) fn new(
        packager: &CommandLine,
        config: &AppConfig,
        resource_dir: PathBuf,
        icon: Option<PathBuf>,
        entry_point: PathBuf,
        working_dir: PathBuf,
    ) -> Self {
        Self {
            packager: packager.clone(),
            resource_dir,
            icon,
            app_name: config.app_name.to_string(),
            entry_point,
            working_dir,
            window_title: config.window_title.to_string(),
            window_size: (config.window_width, config.window_height),
        }
    }

    pub(crate) fn add_data_arg(&self) -> String {
        let separator = if cfg!(target_os = "windows") { ";" } else { ":" };
        format!(
            "--add-data={}{}{}",
            self.resource_dir.display(),
            separator,
            RESOURCE_SUBDIR
        )
    }

    pub(crate) fn to_command_line(&self) -> CommandLine {
        let mut args = vec![
            "--onefile".to_string(),
            self.add_data_arg(),
            "--noconsole".to_string(),
        ];
        if let Some(icon) = &self.icon {
            args.push("--icon".to_string());
            args.push(icon.to_string_lossy().to_string());
        }
        args.push("--name".to_string());
        args.push(self.app_name.clone());
        args.push(self.entry_point.to_string_lossy().to_string());
        self.packager.with_args(args)
    }
}

pub(crate) trait PackagingTool {
    /// Runs the tool to completion and returns its exit code.
    fn run(&self, invocation: &PackagingInvocation) -> Result<i32, String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ExternalPackagingTool;

impl PackagingTool for ExternalPackagingTool {
    fn run(&self, invocation: &PackagingInvocation) -> Result<i32, String> {
        let command_line = invocation.to_command_line();
        let status = command_line
            .to_command()
            .current_dir(&invocation.working_dir)
            .status()
            .map_err(|error| {
                format!(
                    "Failed to spawn packaging tool with command {:?}: {}",
                    command_line.debug_parts(),
                    error
                )
            })?;
        // Killed by a signal: no code, report a generic failure.
        Ok(status.code().unwrap_or(1))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PackagingRequest<'a> {
    pub(crate) config: &'a AppConfig,
    pub(crate) packager: CommandLine,
    pub(crate) tool_dir: PathBuf,
    pub(crate) entry_point: PathBuf,
}

pub(crate) fn build_artifact(request: &PackagingRequest<'_>, tool: &dyn PackagingTool) -> BuildResult {
    let project_root = runtime_paths::project_root_from_tool_dir(&request.tool_dir);
    let resource_dir = project_root.join(RESOURCE_SUBDIR);
    if !resource_dir.is_dir() {
        append_build_log(&format!(
            "static resource directory not found, cannot package: {}",
            resource_dir.display()
        ));
        return BuildResult::failed(1);
    }

    let icon = runtime_paths::resolve_icon_path(&project_root, request.config.icon_relative_path);
    if icon.is_none() {
        if let Some(configured) = request.config.icon_relative_path {
            append_build_log(&format!(
                "icon file {} not found, packaging without an icon",
                project_root.join(configured).display()
            ));
        }
    }

    let invocation = PackagingInvocation::new(
        &request.packager,
        request.config,
        resource_dir,
        icon,
        request.entry_point.clone(),
        project_root.clone(),
    );
    append_build_log(&format!(
        "packaging \"{}\" ({}x{}), this may take a few minutes:",
        invocation.window_title, invocation.window_size.0, invocation.window_size.1
    ));
    append_build_log(&invocation.to_command_line().render());

    let exit_code = match tool.run(&invocation) {
        Ok(code) => code,
        Err(error) => {
            append_build_log(&error);
            1
        }
    };

    if exit_code != 0 {
        let error = LauncherError::PackagingTool { code: exit_code };
        append_build_log(&format!("packaging failed: {error}"));
        return BuildResult::failed(error.exit_code());
    }

    append_build_log("packaging finished, look for the executable under dist/");
    for error in cleanup_build_artifacts(&project_root) {
        append_build_log(&format!("cleanup skipped: {error}"));
    }
    BuildResult::success()
}

fn remove_dir(path: &Path) -> Result<(), LauncherError> {
    fs::remove_dir_all(path).map_err(|source| LauncherError::Cleanup {
        path: path.to_path_buf(),
        source,
    })
}

fn remove_file(path: &Path) -> Result<(), LauncherError> {
    fs::remove_file(path).map_err(|source| LauncherError::Cleanup {
        path: path.to_path_buf(),
        source,
    })
}

/// Removes transient build output. Failures are returned for logging only.
pub(crate) fn cleanup_build_artifacts(project_root: &Path) -> Vec<LauncherError> {
    let mut errors = Vec::new();

    let build_dir = project_root.join(BUILD_DIR_NAME);
    if build_dir.is_dir() {
        if let Err(error) = remove_dir(&build_dir) {
            errors.push(error);
        }
    }

    match fs::read_dir(project_root) {
        Ok(entries) => {
            for entry in entries.filter_map(Result::ok) {
                let path = entry.path();
                let is_descriptor = path.is_file()
                    && path.extension().and_then(|ext| ext.to_str()) == Some(BUILD_DESCRIPTOR_EXTENSION);
                if is_descriptor {
                    if let Err(error) = remove_file(&path) {
                        errors.push(error);
                    }
                }
            }
        }
        Err(source) => errors.push(LauncherError::Cleanup {
            path: project_root.to_path_buf(),
            source,
        }),
    }

    let mut walker = WalkDir::new(project_root).into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                let path = error.path().map(Path::to_path_buf).unwrap_or_default();
                errors.push(LauncherError::Cleanup {
                    path,
                    source: io::Error::other(error.to_string()),
                });
                continue;
            }
        };
        if entry.file_type().is_dir() && entry.file_name() == BYTECODE_CACHE_DIR_NAME {
            walker.skip_current_dir();
            if let Err(error) = remove_dir(entry.path()) {
                errors.push(error);
            }
        }
    }

    errors
}
