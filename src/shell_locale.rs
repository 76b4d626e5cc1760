#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellTexts {
    pub control_suffix: &'static str,
    pub served_at: &'static str,
    pub open_browser: &'static str,
    pub quit: &'static str,
    pub unknown_action: &'static str,
    pub headless_notice: &'static str,
}

pub fn shell_texts_for_locale(locale: &str) -> ShellTexts {
    if locale == "en-US" {
        return ShellTexts {
            control_suffix: "Control",
            served_at: "Serving at:",
            open_browser: "Open browser",
            quit: "Quit",
            unknown_action: "Unknown action",
            headless_notice: "No interactive console; serving until interrupted (Ctrl+C).",
        };
    }

    ShellTexts {
        control_suffix: "控制",
        served_at: "服务地址：",
        open_browser: "打开浏览器",
        quit: "退出应用",
        unknown_action: "未知操作",
        headless_notice: "没有可交互的控制台，服务将持续运行直到收到中断信号（Ctrl+C）。",
    }
}

/// Picks the shell locale from the usual environment keys, in priority order.
pub fn resolve_shell_locale<F>(default_shell_locale: &'static str, lookup: F) -> &'static str
where
    F: Fn(&str) -> Option<String>,
{
    for env_key in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Some(value) = lookup(env_key) {
            if let Some(locale) = normalize_shell_locale(&value) {
                return locale;
            }
        }
    }

    default_shell_locale
}

pub(crate) fn normalize_shell_locale(raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw == "zh-CN" {
        return Some("zh-CN");
    }
    if raw == "en-US" {
        return Some("en-US");
    }

    let lowered = raw.to_ascii_lowercase();
    if lowered.starts_with("zh") {
        return Some("zh-CN");
    }
    if lowered.starts_with("en") {
        return Some("en-US");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_texts_for_locale_returns_english_copy() {
        let texts = shell_texts_for_locale("en-US");
        assert_eq!(texts.open_browser, "Open browser");
        assert_eq!(texts.quit, "Quit");
    }

    #[test]
    fn shell_texts_for_locale_falls_back_to_zh_cn_copy() {
        let texts = shell_texts_for_locale("fr-FR");
        assert_eq!(texts.open_browser, "打开浏览器");
        assert_eq!(texts.quit, "退出应用");
    }

    #[test]
    fn normalize_shell_locale_accepts_language_prefixes() {
        assert_eq!(normalize_shell_locale("EN_us.UTF-8"), Some("en-US"));
        assert_eq!(normalize_shell_locale("zh_TW"), Some("zh-CN"));
        assert_eq!(normalize_shell_locale("fr-FR"), None);
    }

    #[test]
    fn resolve_shell_locale_uses_first_recognised_key() {
        let lookup = |key: &str| match key {
            "LC_ALL" => Some("C".to_string()),
            "LANG" => Some("en_GB.UTF-8".to_string()),
            _ => None,
        };
        assert_eq!(resolve_shell_locale("zh-CN", lookup), "en-US");
        assert_eq!(resolve_shell_locale("zh-CN", |_| None), "zh-CN");
    }
}
