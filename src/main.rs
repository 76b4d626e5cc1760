mod app_constants;
mod app_runtime;
mod app_types;
mod browser;
mod command_line;
mod control_actions;
mod control_surface;
mod dependency_provider;
mod errors;
mod interrupt;
mod logging;
mod mime_types;
mod packaging;
mod port_allocator;
mod request_path;
mod runtime_paths;
mod shell_locale;
mod startup_mode;
mod static_server;

use std::env;

pub(crate) use app_constants::*;
pub(crate) use app_types::{AppConfig, BuildResult, ExecutionMode, ExitReason, LifecycleState};
pub(crate) use errors::LauncherError;
pub(crate) use logging::{append_build_log, append_runtime_log, append_shutdown_log};

fn main() {
    logging::init_log_file(logging::resolve_log_file_path(
        env::var(LOG_FILE_ENV).ok().as_deref(),
    ));
    let launch = startup_mode::LaunchEnvironment::from_process_env();
    let exit_code = startup_mode::dispatch(&launch, &APP_CONFIG);
    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_keeps_the_console_subsystem() {
        // Build mode reports to the terminal; only the packaged artifact hides its console.
        let source = include_str!("main.rs");
        assert!(!source.contains(concat!("windows_", "subsystem")));
    }
}
