use crate::AppConfig;

pub(crate) const APP_CONFIG: AppConfig = AppConfig {
    app_name: "BetterQuestBook",
    window_title: "Better Online QuestBook",
    icon_relative_path: Some("bin/favicon.ico"),
    window_width: 1024,
    window_height: 768,
};

/// Set by the packaging runtime inside a built artifact; never by the user.
pub const BUNDLE_ROOT_ENV: &str = "BUNDLE_LAUNCHER_ROOT";
pub const PACKAGER_CMD_ENV: &str = "BUNDLE_LAUNCHER_PACKAGER";
pub const PACKAGER_INSTALL_CMD_ENV: &str = "BUNDLE_LAUNCHER_PACKAGER_INSTALL";
pub const LOG_FILE_ENV: &str = "BUNDLE_LAUNCHER_LOG";

pub const RESOURCE_SUBDIR: &str = "bin";
pub const LOOPBACK_HOST: &str = "127.0.0.1";

/// PyInstaller-compatible packager used when `BUNDLE_LAUNCHER_PACKAGER` is unset.
///
/// Stock PyInstaller expects a Python entry script and does not export
/// `BUNDLE_LAUNCHER_ROOT` in the artifact it builds, so with this default the
/// artifact starts in build mode again. A working artifact needs an override
/// that accepts the same arguments, embeds the native executable and sets the
/// marker to its unpack directory at startup.
pub const DEFAULT_PACKAGER_CMD: &str = "pyinstaller";
pub const DEFAULT_PACKAGER_INSTALL_CMD: &str = "python -m pip install pyinstaller";

pub const BUILD_DIR_NAME: &str = "build";
pub const BUILD_DESCRIPTOR_EXTENSION: &str = "spec";
pub const BYTECODE_CACHE_DIR_NAME: &str = "__pycache__";

pub const DEFAULT_SHELL_LOCALE: &str = "zh-CN";
