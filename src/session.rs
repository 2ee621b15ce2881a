//! Session controller for the ping screen.
//!
//! All display state lives in [`SessionState`]. Keyboard input and ping
//! results arrive as [`Event`] values and side effects leave as [`Effect`]
//! values; [`SessionState::update`] itself does no I/O, so every transition
//! can be driven directly from tests.

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info, warn};

use crate::error::{PersistError, PingError};
use crate::history::{DEFAULT_HISTORY_HEIGHT, HistoryRecord, HistoryRing};
use crate::input::{DEFAULT_PLACEHOLDER, InputField, placeholder_for};
use crate::persist::format_history;
use crate::ping::{PingOutcome, Sample};
use crate::rtt_window::RttWindow;
use crate::scheduler::{is_valid_input, pacing_delay};

pub const HELP_TEXT: &str =
    "esc: quit • enter: submit • ctrl+r: clear input • ctrl+l: reset • ctrl+s: save & quit";

const PINGING_LOG: &str = "🌀 pinging...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingInput,
    Pinging,
    Terminated,
}

/// Commands decoded from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// esc: clears a non-empty focused input, otherwise quits.
    Quit,
    /// ctrl+c: quits no matter what.
    ForceQuit,
    /// ctrl+r: clears the input in place.
    SoftReset,
    /// ctrl+l: clears the input, chart and history.
    HardReset,
    /// ctrl+s: writes the history out, then quits.
    Persist,
    Char(char),
    Backspace,
}

#[derive(Debug)]
pub enum Event {
    Submit,
    Key(KeyCommand),
    PingOutcome { epoch: u64, outcome: PingOutcome },
    PingFailed { epoch: u64, error: PingError },
    Persisted(Result<PathBuf, PersistError>),
}

/// Side effects for the runtime to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run one ping cycle against `target` after waiting `delay`.
    StartPing {
        target: String,
        epoch: u64,
        delay: Duration,
    },
    /// Write these lines to the output file and report back.
    Persist { lines: Vec<String> },
    Quit,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub input: InputField,
    pub is_submitted: bool,
    pub is_pinging: bool,
    pub last_error: Option<String>,
    pub log: String,
    pub help_text: String,
    pub rtt_window: RttWindow,
    pub history: HistoryRing,
    target: String,
    /// Bumped on every submit and hard reset; results tagged with an older
    /// epoch belong to an abandoned cycle.
    epoch: u64,
    terminated: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_HEIGHT, DEFAULT_PLACEHOLDER)
    }
}

impl SessionState {
    pub fn new(history_height: usize, placeholder: impl Into<String>) -> Self {
        Self {
            input: InputField::new(placeholder),
            is_submitted: false,
            is_pinging: false,
            last_error: None,
            log: String::new(),
            help_text: HELP_TEXT.to_string(),
            rtt_window: RttWindow::new(),
            history: HistoryRing::new(history_height),
            target: String::new(),
            epoch: 0,
            terminated: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.terminated {
            Phase::Terminated
        } else if self.is_pinging {
            Phase::Pinging
        } else {
            Phase::AwaitingInput
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Host of the running (or last) session.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The epoch whose cycles may still probe, if any.
    pub fn active_epoch(&self) -> Option<u64> {
        (self.is_pinging && !self.terminated).then_some(self.epoch)
    }

    /// Apply one event and return the effect the runtime should run next.
    pub fn update(&mut self, event: Event) -> Option<Effect> {
        if self.terminated {
            return None;
        }

        match event {
            Event::Submit => self.submit(),
            Event::Key(cmd) => self.handle_key(cmd),
            Event::PingOutcome { epoch, outcome } => self.record_outcome(epoch, outcome),
            Event::PingFailed { epoch, error } => self.fail(epoch, error),
            Event::Persisted(result) => self.finish_persist(result),
        }
    }

    fn submit(&mut self) -> Option<Effect> {
        if self.is_pinging {
            return None;
        }

        let target = self.input.value().to_string();
        if !is_valid_input(&target) {
            self.input.reset();
            self.last_error = Some(PingError::InvalidTarget(target).to_string());
            return None;
        }

        info!("starting session against {target}");
        self.log = PINGING_LOG.to_string();
        self.last_error = None;
        self.input.blur();
        self.is_submitted = true;
        self.is_pinging = true;
        self.epoch += 1;
        self.target = target;

        Some(Effect::StartPing {
            target: self.target.clone(),
            epoch: self.epoch,
            delay: Duration::ZERO,
        })
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.is_pinging && epoch == self.epoch
    }

    fn record_outcome(&mut self, epoch: u64, outcome: PingOutcome) -> Option<Effect> {
        if !self.is_current(epoch) {
            debug!("discarding outcome from epoch {epoch}");
            return None;
        }

        let sample = outcome.rtt;
        self.log = match sample {
            Sample::Reply(rtt) => format!("🐐{rtt:?}"),
            Sample::Failed => "🐇 Failed, retrying...".to_string(),
        };
        self.log.push_str("  ");
        self.log.push_str(PINGING_LOG);

        self.rtt_window.append(sample);
        self.history
            .append(HistoryRecord::new(outcome.timestamp, sample, self.target.clone()));

        Some(Effect::StartPing {
            target: self.target.clone(),
            epoch,
            delay: pacing_delay(outcome.elapsed),
        })
    }

    fn fail(&mut self, epoch: u64, error: PingError) -> Option<Effect> {
        if !self.is_current(epoch) {
            debug!("discarding error from epoch {epoch}: {error}");
            return None;
        }

        warn!("ping to {} failed: {error}", self.target);
        self.last_error = Some(error.to_string());
        self.input.reset();
        self.input.focus();
        self.is_submitted = false;
        self.is_pinging = false;
        self.log.clear();
        None
    }

    fn handle_key(&mut self, cmd: KeyCommand) -> Option<Effect> {
        match cmd {
            KeyCommand::Quit => {
                if self.input.is_focused() && !self.input.value().is_empty() {
                    self.input.reset();
                    return None;
                }
                self.terminate()
            }
            KeyCommand::ForceQuit => self.terminate(),
            KeyCommand::Char(c) => {
                if self.input.is_focused() {
                    self.input.insert(c);
                    None
                } else if c == 'q' {
                    self.terminate()
                } else {
                    None
                }
            }
            KeyCommand::Backspace => {
                if self.input.is_focused() {
                    self.input.backspace();
                }
                None
            }
            KeyCommand::SoftReset => {
                self.input.reset();
                if !self.is_submitted {
                    self.input.focus();
                }
                None
            }
            KeyCommand::HardReset => {
                self.hard_reset();
                None
            }
            KeyCommand::Persist => Some(Effect::Persist {
                lines: format_history(&self.history),
            }),
        }
    }

    fn hard_reset(&mut self) {
        info!("resetting session");
        let placeholder = if self.target.is_empty() {
            self.input.placeholder().to_string()
        } else {
            placeholder_for(Some(&self.target))
        };
        let fresh = Self::new(self.history.capacity(), placeholder);
        *self = Self {
            epoch: self.epoch + 1,
            ..fresh
        };
    }

    fn finish_persist(&mut self, result: Result<PathBuf, PersistError>) -> Option<Effect> {
        match result {
            Ok(path) => {
                info!("history saved to {}", path.display());
                self.terminate()
            }
            Err(e) => {
                warn!("{e}");
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    fn terminate(&mut self) -> Option<Effect> {
        self.terminated = true;
        Some(Effect::Quit)
    }
}
