use std::{
    path::Path,
    process::{Command, Stdio},
};

/// An external program plus its leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandLine {
    pub(crate) program: String,
    pub(crate) args: Vec<String>,
}

impl CommandLine {
    pub(crate) fn from_shell_words(raw: &str) -> Result<Self, String> {
        let mut pieces =
            shlex::split(raw).ok_or_else(|| format!("Invalid command line: {raw}"))?;
        if pieces.is_empty() {
            return Err("Command line is empty.".to_string());
        }
        let program = pieces.remove(0);
        Ok(Self {
            program,
            args: pieces,
        })
    }

    /// Uses `override_raw` when it holds anything but whitespace.
    pub(crate) fn resolve(override_raw: Option<&str>, default_raw: &str) -> Result<Self, String> {
        match override_raw.map(str::trim).filter(|value| !value.is_empty()) {
            Some(raw) => Self::from_shell_words(raw),
            None => Self::from_shell_words(default_raw),
        }
    }

    pub(crate) fn with_args<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = self.args.clone();
        args.extend(extra.into_iter().map(Into::into));
        Self {
            program: self.program.clone(),
            args,
        }
    }

    /// Last path component of the program, e.g. `pyinstaller` for `/usr/bin/pyinstaller`.
    pub(crate) fn display_name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.clone())
    }

    pub(crate) fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).stdin(Stdio::null());
        command
    }

    pub(crate) fn debug_parts(&self) -> Vec<String> {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.clone());
        parts
    }

    pub(crate) fn render(&self) -> String {
        shlex::try_join(self.debug_parts().iter().map(String::as_str))
            .unwrap_or_else(|_| self.debug_parts().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::CommandLine;

    #[test]
    fn from_shell_words_splits_quoted_arguments() {
        let parsed = CommandLine::from_shell_words("python -m pip install 'py installer'")
            .expect("parse command line");
        assert_eq!(parsed.program, "python");
        assert_eq!(parsed.args, vec!["-m", "pip", "install", "py installer"]);
    }

    #[test]
    fn from_shell_words_rejects_empty_and_unbalanced_input() {
        assert!(CommandLine::from_shell_words("   ").is_err());
        assert!(CommandLine::from_shell_words("tool 'unterminated").is_err());
    }

    #[test]
    fn resolve_prefers_non_blank_override() {
        let default = CommandLine::resolve(Some("  "), "pyinstaller").expect("default");
        assert_eq!(default.program, "pyinstaller");

        let custom = CommandLine::resolve(Some("uvx pyinstaller"), "pyinstaller").expect("override");
        assert_eq!(custom.program, "uvx");
        assert_eq!(custom.args, vec!["pyinstaller"]);
    }

    #[test]
    fn with_args_appends_without_touching_the_base_command() {
        let base = CommandLine::from_shell_words("/usr/local/bin/pyinstaller --clean").expect("parse");
        let extended = base.with_args(["--version"]);
        assert_eq!(base.args, vec!["--clean"]);
        assert_eq!(extended.args, vec!["--clean", "--version"]);
        assert_eq!(base.display_name(), "pyinstaller");
        assert_eq!(extended.render(), "/usr/local/bin/pyinstaller --clean --version");
    }
}
