//! Event loop: feeds events into the session and carries out its effects.

use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::{Event as TermEvent, EventStream};
use futures::StreamExt;
use log::{info, warn};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::keymap;
use crate::persist::Persistence;
use crate::ping_executor::Prober;
use crate::scheduler::PingScheduler;
use crate::session::{Effect, Event, SessionState};
use crate::ui;

pub struct App<P> {
    session: SessionState,
    scheduler: Arc<PingScheduler<P>>,
    persistence: Persistence,
    config: AppConfig,
    config_path: Option<PathBuf>,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
    /// Epoch the session is pinging under, `None` when idle or quitting.
    live_epoch: watch::Sender<Option<u64>>,
}

impl<P: Prober> App<P> {
    pub fn new(prober: P, config: AppConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (live_epoch, _) = watch::channel(None);
        Self {
            session: SessionState::new(config.history_height, config.placeholder()),
            scheduler: Arc::new(PingScheduler::new(prober)),
            persistence: Persistence::new(config.output_file.clone()),
            config,
            config_path: None,
            tx,
            rx,
            live_epoch,
        }
    }

    /// Remember submitted targets in the config file at `path`.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Apply `event`, then keep applying whatever events its effects produce.
    pub fn dispatch(&mut self, event: Event) {
        let mut next = Some(event);
        while let Some(event) = next.take() {
            let effect = self.session.update(event);
            self.live_epoch.send_replace(self.session.active_epoch());
            if let Some(effect) = effect {
                next = self.interpret(effect);
            }
        }
    }

    fn interpret(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::StartPing {
                target,
                epoch,
                delay,
            } => {
                self.remember_target(&target);
                self.scheduler.spawn_cycle(
                    target,
                    epoch,
                    delay,
                    self.live_epoch.subscribe(),
                    self.tx.clone(),
                );
                None
            }
            Effect::Persist { lines } => {
                Some(Event::Persisted(self.persistence.write(&lines)))
            }
            Effect::Quit => {
                info!("quitting");
                None
            }
        }
    }

    fn remember_target(&mut self, target: &str) {
        if self.config.last_target.as_deref() == Some(target) {
            return;
        }
        self.config.last_target = Some(target.to_string());
        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                warn!("failed to save config: {e}");
            }
        }
    }

    /// Wait for the next ping result and apply it.
    pub async fn step(&mut self) -> bool {
        match self.rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut events = EventStream::new();

        while !self.session.is_terminated() {
            terminal.draw(|f| ui::draw(f, &self.session, self.config.chart_width))?;

            tokio::select! {
                maybe_ev = events.next() => match maybe_ev {
                    Some(Ok(TermEvent::Key(key))) => {
                        if let Some(event) = keymap::translate(key) {
                            self.dispatch(event);
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                Some(event) = self.rx.recv() => self.dispatch(event),
            }
        }

        Ok(())
    }
}
