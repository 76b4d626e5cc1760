use std::process::Stdio;

use crate::{append_build_log, command_line::CommandLine, LauncherError};

pub(crate) trait DependencyProvider {
    /// Best effort: `false` means the dependency is still unavailable.
    fn try_ensure(&self, name: &str) -> bool;
}

/// Probes a tool by running it, installs it with another command when the
/// probe fails, then probes exactly once more.
#[derive(Debug, Clone)]
pub(crate) struct CommandDependencyProvider {
    probe: CommandLine,
    install: Option<CommandLine>,
}

impl CommandDependencyProvider {
    pub(crate) fn new(tool: &CommandLine, install: Option<CommandLine>) -> Self {
        Self {
            probe: tool.with_args(["--version"]),
            install,
        }
    }

    fn probe_succeeds(&self) -> bool {
        self.probe
            .to_command()
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn run_install(&self, name: &str) -> Result<(), LauncherError> {
        let install_failed = |reason: String| LauncherError::DependencyInstall {
            name: name.to_string(),
            reason,
        };
        let Some(install) = &self.install else {
            return Err(install_failed("no install command configured".to_string()));
        };

        append_build_log(&format!(
            "missing dependency {name}, trying to install it: {}",
            install.render()
        ));
        let status = install
            .to_command()
            .status()
            .map_err(|error| install_failed(format!("failed to run installer: {error}")))?;
        if !status.success() {
            return Err(install_failed(format!("installer exited with {status}")));
        }
        Ok(())
    }
}

impl DependencyProvider for CommandDependencyProvider {
    fn try_ensure(&self, name: &str) -> bool {
        if self.probe_succeeds() {
            return true;
        }

        if let Err(error) = self.run_install(name) {
            append_build_log(&format!("{error}; continuing, packaging may fail"));
            return false;
        }

        let available = self.probe_succeeds();
        if !available {
            append_build_log(&format!(
                "dependency {name} is still unavailable after installation"
            ));
        }
        available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_without_installer_is_reported_unavailable() {
        let tool = CommandLine::from_shell_words("bundle-launcher-definitely-missing-tool")
            .expect("parse tool");
        let provider = CommandDependencyProvider::new(&tool, None);
        assert!(!provider.try_ensure("missing-tool"));
    }

    #[test]
    fn failing_installer_is_not_fatal() {
        let tool = CommandLine::from_shell_words("bundle-launcher-definitely-missing-tool")
            .expect("parse tool");
        let installer = CommandLine::from_shell_words("bundle-launcher-definitely-missing-installer")
            .expect("parse installer");
        let provider = CommandDependencyProvider::new(&tool, Some(installer));
        assert!(!provider.try_ensure("missing-tool"));
    }

    #[cfg(unix)]
    #[test]
    fn installer_success_is_followed_by_a_second_probe() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let marker = temp.path().join("installed");
        let marker = marker.to_string_lossy().to_string();

        // `sh -c SCRIPT --version` runs SCRIPT with `--version` as $0.
        let tool = CommandLine {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), format!("test -f '{marker}'")],
        };
        let installer = CommandLine {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), format!("touch '{marker}'")],
        };
        let provider = CommandDependencyProvider::new(&tool, Some(installer));

        assert!(!provider.probe_succeeds());
        assert!(provider.try_ensure("marker-tool"));
        assert!(provider.probe_succeeds());
    }
}
