use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum LauncherError {
    #[error("static resource directory not found: {}", path.display())]
    MissingResource { path: PathBuf },

    #[error("failed to allocate a local port: {0}")]
    PortAllocation(#[source] io::Error),

    #[error("failed to bind asset server on {addr}: {reason}")]
    ServerBind { addr: String, reason: String },

    #[error("failed to build the served URL for {addr}: {reason}")]
    ServedUrl { addr: String, reason: String },

    #[error("failed to install dependency {name}: {reason}")]
    DependencyInstall { name: String, reason: String },

    #[error("packaging tool exited with code {code}")]
    PackagingTool { code: i32 },

    #[error("failed to clean up {}: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LauncherError {
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            Self::PackagingTool { code } => *code,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io, path::PathBuf};

    use super::LauncherError;

    #[test]
    fn packaging_tool_error_keeps_the_tool_exit_code() {
        assert_eq!(LauncherError::PackagingTool { code: 3 }.exit_code(), 3);
    }

    #[test]
    fn fatal_runtime_errors_exit_with_one() {
        let missing = LauncherError::MissingResource {
            path: PathBuf::from("/nowhere/bin"),
        };
        assert_eq!(missing.exit_code(), 1);
        assert!(missing.to_string().contains("/nowhere/bin"));

        let port = LauncherError::PortAllocation(io::Error::other("denied"));
        assert_eq!(port.exit_code(), 1);

        let url = LauncherError::ServedUrl {
            addr: "127.0.0.1:0".to_string(),
            reason: "bad host".to_string(),
        };
        assert_eq!(url.exit_code(), 1);
        assert!(url.to_string().starts_with("failed to build the served URL"));
    }
}
