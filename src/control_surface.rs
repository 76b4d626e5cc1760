use std::{
    io::{self, BufRead, Write},
    sync::{
        mpsc::{self, Receiver, RecvTimeoutError},
        Arc,
    },
    thread,
    time::Duration,
};

use url::Url;

use crate::{
    append_runtime_log,
    browser::BrowserLauncher,
    control_actions::{self, ControlAction, CONTROL_OPEN_BROWSER, CONTROL_QUIT},
    interrupt::InterruptFlag,
    shell_locale::ShellTexts,
    AppConfig, ExitReason,
};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub(crate) trait ControlSurface {
    fn notify_serving(&mut self, url: &Url);
    fn await_exit(&mut self) -> ExitReason;
}

/// Terminal menu offering "open browser again" and "quit".
pub(crate) struct InteractiveSurface<W: Write> {
    title: String,
    texts: ShellTexts,
    input: Receiver<String>,
    output: W,
    browser: Arc<dyn BrowserLauncher>,
    interrupt: InterruptFlag,
    url: Option<Url>,
}

impl<W: Write> InteractiveSurface<W> {
    pub(crate) fn new(
        config: &AppConfig,
        texts: ShellTexts,
        input: Receiver<String>,
        output: W,
        browser: Arc<dyn BrowserLauncher>,
        interrupt: InterruptFlag,
    ) -> Self {
        Self {
            title: format!("{} {}", config.window_title, texts.control_suffix),
            texts,
            input,
            output,
            browser,
            interrupt,
            url: None,
        }
    }

    fn print_menu(&mut self) {
        let _ = writeln!(
            self.output,
            "[{}] {}    [{}] {}",
            CONTROL_OPEN_BROWSER, self.texts.open_browser, CONTROL_QUIT, self.texts.quit
        );
        let _ = self.output.flush();
    }

    fn open_browser(&self) {
        let Some(url) = &self.url else {
            return;
        };
        if let Err(error) = self.browser.open(url) {
            append_runtime_log(&format!("failed to open browser at {url}: {error}"));
        }
    }
}

impl<W: Write> ControlSurface for InteractiveSurface<W> {
    fn notify_serving(&mut self, url: &Url) {
        self.url = Some(url.clone());
        let _ = writeln!(self.output, "{}", self.title);
        let _ = writeln!(self.output, "{} {}", self.texts.served_at, url);
        self.print_menu();
    }

    fn await_exit(&mut self) -> ExitReason {
        loop {
            if self.interrupt.is_raised() {
                return ExitReason::Interrupted;
            }
            match self.input.recv_timeout(POLL_INTERVAL) {
                Ok(line) => match control_actions::action_from_input(&line) {
                    Some(ControlAction::OpenBrowser) => self.open_browser(),
                    Some(ControlAction::Quit) => return ExitReason::QuitRequested,
                    None => {
                        let _ = writeln!(self.output, "{}: {}", self.texts.unknown_action, line.trim());
                        self.print_menu();
                    }
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return ExitReason::InputClosed,
            }
        }
    }
}

/// Used when nothing interactive is available: block until interrupted.
pub(crate) struct HeadlessWaitSurface {
    texts: ShellTexts,
    interrupt: InterruptFlag,
    poll_interval: Duration,
}

impl HeadlessWaitSurface {
    pub(crate) fn new(texts: ShellTexts, interrupt: InterruptFlag) -> Self {
        Self {
            texts,
            interrupt,
            poll_interval: POLL_INTERVAL,
        }
    }
}

impl ControlSurface for HeadlessWaitSurface {
    fn notify_serving(&mut self, url: &Url) {
        append_runtime_log(self.texts.headless_notice);
        append_runtime_log(&format!("{} {}", self.texts.served_at, url));
    }

    fn await_exit(&mut self) -> ExitReason {
        while !self.interrupt.is_raised() {
            thread::sleep(self.poll_interval);
        }
        ExitReason::Interrupted
    }
}

/// Forwards stdin lines to a channel so the foreground loop can keep polling
/// the interrupt flag. The reader thread is left blocked on stdin at exit.
pub(crate) fn spawn_stdin_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Chosen once at startup; nothing re-probes afterwards.
pub(crate) fn select_control_surface(
    interactive_available: bool,
    config: &AppConfig,
    texts: ShellTexts,
    browser: Arc<dyn BrowserLauncher>,
    interrupt: InterruptFlag,
) -> Box<dyn ControlSurface> {
    if interactive_available {
        append_runtime_log("control surface: interactive console");
        return Box::new(InteractiveSurface::new(
            config,
            texts,
            spawn_stdin_reader(),
            io::stdout(),
            browser,
            interrupt,
        ));
    }

    append_runtime_log("control surface: headless wait");
    Box::new(HeadlessWaitSurface::new(texts, interrupt))
}
