use std::path::PathBuf;

/// Compiled-in description of the packaged application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AppConfig {
    pub(crate) app_name: &'static str,
    pub(crate) window_title: &'static str,
    pub(crate) icon_relative_path: Option<&'static str>,
    pub(crate) window_width: u32,
    pub(crate) window_height: u32,
}

/// Decided once in `main`, then passed down by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExecutionMode {
    Build,
    /// `bundle_root` is the directory the packaging runtime unpacked the
    /// artifact into, when it told us.
    Run { bundle_root: Option<PathBuf> },
}

impl ExecutionMode {
    pub(crate) fn is_run(&self) -> bool {
        matches!(self, Self::Run { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BuildResult {
    pub(crate) exit_code: i32,
}

impl BuildResult {
    pub(crate) fn success() -> Self {
        Self { exit_code: 0 }
    }

    pub(crate) fn failed(exit_code: i32) -> Self {
        Self { exit_code }
    }

    pub(crate) fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleState {
    Idle,
    Serving,
    AwaitingExit,
    Terminated,
}

impl LifecycleState {
    pub(crate) fn can_advance_to(self, next: LifecycleState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Serving)
                | (Self::Serving, Self::AwaitingExit)
                | (Self::Serving, Self::Terminated)
                | (Self::AwaitingExit, Self::Terminated)
        )
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Serving => "serving",
            Self::AwaitingExit => "awaiting-exit",
            Self::Terminated => "terminated",
        }
    }
}

/// Why the control surface stopped blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitReason {
    QuitRequested,
    Interrupted,
    InputClosed,
}

impl ExitReason {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::QuitRequested => "quit requested",
            Self::Interrupted => "interrupt received",
            Self::InputClosed => "control input closed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BuildResult, ExecutionMode, LifecycleState};

    #[test]
    fn lifecycle_state_allows_only_forward_transitions() {
        assert!(LifecycleState::Idle.can_advance_to(LifecycleState::Serving));
        assert!(LifecycleState::Serving.can_advance_to(LifecycleState::AwaitingExit));
        assert!(LifecycleState::AwaitingExit.can_advance_to(LifecycleState::Terminated));

        assert!(!LifecycleState::Idle.can_advance_to(LifecycleState::AwaitingExit));
        assert!(!LifecycleState::Terminated.can_advance_to(LifecycleState::Serving));
        assert!(!LifecycleState::AwaitingExit.can_advance_to(LifecycleState::Serving));
    }

    #[test]
    fn build_result_reports_success_only_for_zero() {
        assert!(BuildResult::success().is_success());
        assert!(!BuildResult::failed(3).is_success());
        assert_eq!(BuildResult::failed(3).exit_code, 3);
    }

    #[test]
    fn execution_mode_run_ignores_bundle_root_for_is_run() {
        assert!(ExecutionMode::Run { bundle_root: None }.is_run());
        assert!(!ExecutionMode::Build.is_run());
    }
}
