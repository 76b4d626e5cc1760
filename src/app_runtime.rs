use std::{
    io::{self, IsTerminal},
    path::PathBuf,
    sync::Arc,
};

use crate::{
    append_runtime_log, append_shutdown_log,
    browser::{self, BrowserLauncher, SystemBrowser},
    control_surface::{self, ControlSurface},
    interrupt::InterruptFlag,
    runtime_paths, shell_locale, static_server, AppConfig, ExecutionMode, ExitReason,
    LauncherError, LifecycleState, LOOPBACK_HOST,
};

struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    fn new() -> Self {
        Self {
            state: LifecycleState::Idle,
        }
    }

    fn advance(&mut self, next: LifecycleState) {
        if !self.state.can_advance_to(next) {
            append_runtime_log(&format!(
                "ignored lifecycle transition {} -> {}",
                self.state.as_str(),
                next.as_str()
            ));
            return;
        }
        append_runtime_log(&format!(
            "lifecycle {} -> {}",
            self.state.as_str(),
            next.as_str()
        ));
        self.state = next;
    }
}

fn open_browser(browser: &dyn BrowserLauncher, url: &url::Url) {
    if let Err(error) = browser.open(url) {
        append_runtime_log(&format!("failed to open browser at {url}: {error}"));
    }
}

/// Serves `resource_dir` until the control surface reports an exit.
///
/// `resource_dir` is expected to have passed `require_resource_dir` already.
/// The server is always stopped before this returns.
pub(crate) fn run_lifecycle(
    resource_dir: PathBuf,
    browser: &dyn BrowserLauncher,
    surface: &mut dyn ControlSurface,
) -> Result<ExitReason, LauncherError> {
    let mut lifecycle = Lifecycle::new();
    let mut server = static_server::start_asset_server(&resource_dir, LOOPBACK_HOST)?;
    lifecycle.advance(LifecycleState::Serving);
    append_runtime_log(&format!(
        "serving {} on {}",
        resource_dir.display(),
        server.addr()
    ));

    let url = match browser::served_url(server.addr()) {
        Ok(url) => url,
        Err(reason) => {
            server.stop();
            lifecycle.advance(LifecycleState::Terminated);
            return Err(LauncherError::ServedUrl {
                addr: server.addr().to_string(),
                reason,
            });
        }
    };
    open_browser(browser, &url);
    surface.notify_serving(&url);
    lifecycle.advance(LifecycleState::AwaitingExit);

    let reason = surface.await_exit();
    append_shutdown_log(&format!("{}, stopping asset server", reason.as_str()));
    server.stop();
    lifecycle.advance(LifecycleState::Terminated);
    Ok(reason)
}

pub(crate) fn run_app_mode(config: &AppConfig, mode: &ExecutionMode, locale: &'static str) -> i32 {
    append_runtime_log("packaged application starting");
    let resource_dir = runtime_paths::resolve_resource_dir(
        mode,
        &runtime_paths::default_tool_dir(),
        runtime_paths::default_install_dir().as_deref(),
    );
    let resource_dir = match runtime_paths::require_resource_dir(resource_dir) {
        Ok(resource_dir) => resource_dir,
        Err(error) => {
            append_runtime_log(&error.to_string());
            return error.exit_code();
        }
    };

    let interrupt = InterruptFlag::register_process_signals().unwrap_or_else(|error| {
        append_runtime_log(&format!("{error}; interrupts will end the process abruptly"));
        InterruptFlag::default()
    });
    let browser: Arc<dyn BrowserLauncher> = Arc::new(SystemBrowser);
    let mut surface = control_surface::select_control_surface(
        io::stdin().is_terminal(),
        config,
        shell_locale::shell_texts_for_locale(locale),
        Arc::clone(&browser),
        interrupt,
    );

    match run_lifecycle(resource_dir, browser.as_ref(), surface.as_mut()) {
        Ok(_) => 0,
        Err(error) => {
            append_runtime_log(&error.to_string());
            error.exit_code()
        }
    }
}
