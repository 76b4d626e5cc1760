pub const CONTROL_OPEN_BROWSER: &str = "o";
pub const CONTROL_QUIT: &str = "q";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    OpenBrowser,
    Quit,
}

pub fn action_from_input(line: &str) -> Option<ControlAction> {
    match line.trim().to_ascii_lowercase().as_str() {
        CONTROL_OPEN_BROWSER | "open" => Some(ControlAction::OpenBrowser),
        CONTROL_QUIT | "quit" | "exit" => Some(ControlAction::Quit),
        _ => None,
    }
}
