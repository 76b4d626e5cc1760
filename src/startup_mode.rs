use std::{env, ffi::OsString, path::PathBuf};

use crate::{
    app_runtime, append_build_log,
    command_line::CommandLine,
    dependency_provider::{CommandDependencyProvider, DependencyProvider},
    packaging::{self, ExternalPackagingTool, PackagingRequest},
    runtime_paths, shell_locale, AppConfig, ExecutionMode, BUNDLE_ROOT_ENV, DEFAULT_PACKAGER_CMD,
    DEFAULT_PACKAGER_INSTALL_CMD, DEFAULT_SHELL_LOCALE, PACKAGER_CMD_ENV, PACKAGER_INSTALL_CMD_ENV,
};

/// Environment inputs, captured once in `main` and never re-read.
#[derive(Debug, Clone)]
pub(crate) struct LaunchEnvironment {
    pub(crate) mode: ExecutionMode,
    pub(crate) packager_cmd: Option<String>,
    pub(crate) packager_install_cmd: Option<String>,
    pub(crate) locale: &'static str,
}

impl LaunchEnvironment {
    pub(crate) fn from_process_env() -> Self {
        Self {
            mode: execution_mode_from_marker(env::var_os(BUNDLE_ROOT_ENV)),
            packager_cmd: env::var(PACKAGER_CMD_ENV).ok(),
            packager_install_cmd: env::var(PACKAGER_INSTALL_CMD_ENV).ok(),
            locale: shell_locale::resolve_shell_locale(DEFAULT_SHELL_LOCALE, |key| {
                env::var(key).ok()
            }),
        }
    }
}

/// The marker's presence alone selects run mode; its value, when non-empty,
/// is where the packaging runtime unpacked the bundle.
pub(crate) fn execution_mode_from_marker(marker: Option<OsString>) -> ExecutionMode {
    match marker {
        None => ExecutionMode::Build,
        Some(value) if value.is_empty() => ExecutionMode::Run { bundle_root: None },
        Some(value) => ExecutionMode::Run {
            bundle_root: Some(PathBuf::from(value)),
        },
    }
}

pub(crate) fn dispatch(launch: &LaunchEnvironment, config: &AppConfig) -> i32 {
    if launch.mode.is_run() {
        return app_runtime::run_app_mode(config, &launch.mode, launch.locale);
    }
    run_build_mode(launch, config)
}

fn run_build_mode(launch: &LaunchEnvironment, config: &AppConfig) -> i32 {
    let packager = match CommandLine::resolve(launch.packager_cmd.as_deref(), DEFAULT_PACKAGER_CMD) {
        Ok(packager) => packager,
        Err(error) => {
            append_build_log(&format!("invalid {PACKAGER_CMD_ENV}: {error}"));
            return 1;
        }
    };
    let installer = match CommandLine::resolve(
        launch.packager_install_cmd.as_deref(),
        DEFAULT_PACKAGER_INSTALL_CMD,
    ) {
        Ok(installer) => Some(installer),
        Err(error) => {
            append_build_log(&format!("invalid {PACKAGER_INSTALL_CMD_ENV}: {error}"));
            None
        }
    };

    let provider = CommandDependencyProvider::new(&packager, installer);
    if !provider.try_ensure(&packager.display_name()) {
        append_build_log(&format!(
            "{} is unavailable, attempting to package anyway",
            packager.display_name()
        ));
    }

    let entry_point = env::current_exe().unwrap_or_else(|error| {
        append_build_log(&format!("failed to locate own executable: {error}"));
        PathBuf::from(config.app_name)
    });
    let request = PackagingRequest {
        config,
        packager,
        tool_dir: runtime_paths::default_tool_dir(),
        entry_point,
    };

    let result = packaging::build_artifact(&request, &ExternalPackagingTool);
    if result.is_success() {
        append_build_log("packaging succeeded, the executable is under dist/");
    } else {
        append_build_log(&format!("packaging failed with exit code {}", result.exit_code));
    }
    result.exit_code
}
