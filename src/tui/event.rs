//! Event handling for the terminal front end.
//!
//! Merges crossterm input, messages coming back from the effect runtime and
//! a periodic redraw tick into one stream of [`Event`]s.

use std::time::Duration;

use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use futures::StreamExt;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{interval, Interval, MissedTickBehavior};

use crate::dashboard::{Mode, Msg};

/// Application-level event variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// A result or timer message for the dashboard.
    Dashboard(Msg),
    /// Periodic tick for UI refresh.
    Tick,
}

/// Waits on terminal input, runtime messages and the redraw tick.
pub struct EventHandler {
    tick: Interval,
}

impl EventHandler {
    /// Creates a handler that yields [`Event::Tick`] every `tick_rate`.
    pub fn new(tick_rate: Duration) -> Self {
        let mut tick = interval(tick_rate.max(Duration::from_millis(1)));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { tick }
    }

    /// Waits for the next event.
    pub async fn next(
        &mut self,
        reader: &mut EventStream,
        messages: &mut UnboundedReceiver<Msg>,
    ) -> std::io::Result<Event> {
        loop {
            tokio::select! {
                maybe_event = reader.next() => {
                    match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) => return Ok(Event::Key(key)),
                        Some(Ok(CrosstermEvent::Resize(w, h))) => return Ok(Event::Resize(w, h)),
                        Some(Err(e)) => return Err(e),
                        // Ignore mouse, focus, paste events
                        Some(Ok(_)) => continue,
                        None => return Err(std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            "event stream ended",
                        )),
                    }
                }
                Some(msg) = messages.recv() => return Ok(Event::Dashboard(msg)),
                _ = self.tick.tick() => return Ok(Event::Tick),
            }
        }
    }
}

/// Action produced by handling a key event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No action to take.
    None,
    /// Quit the application.
    Quit,
    /// Feed a message to the dashboard.
    Dispatch(Msg),
}

impl From<Msg> for Action {
    fn from(msg: Msg) -> Self {
        Action::Dispatch(msg)
    }
}

/// Maps a key press to an action for the current input mode.
///
/// Ctrl-C always quits. While a text field or a resize is active, keys edit
/// it; `q` only quits in normal mode so it can be typed into a profile name.
pub fn handle_key_event(mode: &Mode, key: KeyEvent) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match mode {
        Mode::Normal => handle_normal_key(key),
        Mode::EditProfile | Mode::EditInterval => handle_text_key(key),
        Mode::Resize(_) => handle_resize_key(key),
    }
}

fn handle_normal_key(key: KeyEvent) -> Action {
    let msg = match key.code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Tab => Msg::FocusNext,
        KeyCode::BackTab => Msg::FocusPrev,
        KeyCode::Char('x') => Msg::CloseFocused,
        KeyCode::Char('z') => Msg::BeginResize,
        KeyCode::Char('p') => Msg::BeginProfileEdit,
        KeyCode::Char('s') => Msg::SaveProfile,
        KeyCode::Char('r') => Msg::ReloadProfile,
        KeyCode::Char('e') => Msg::RestoreHidden,
        KeyCode::Char('i') => Msg::BeginIntervalEdit,
        KeyCode::Char('w') => Msg::SavePhotoSettings,
        _ => return Action::None,
    };
    msg.into()
}

fn handle_text_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char(c) => Msg::Input(c).into(),
        KeyCode::Backspace => Msg::Backspace.into(),
        KeyCode::Enter => Msg::Submit.into(),
        KeyCode::Esc => Msg::Cancel.into(),
        _ => Action::None,
    }
}

fn handle_resize_key(key: KeyEvent) -> Action {
    let (cols, rows) = match key.code {
        KeyCode::Left | KeyCode::Char('h') => (-1, 0),
        KeyCode::Right | KeyCode::Char('l') => (1, 0),
        KeyCode::Up | KeyCode::Char('k') => (0, -1),
        KeyCode::Down | KeyCode::Char('j') => (0, 1),
        KeyCode::Enter => return Msg::Submit.into(),
        KeyCode::Esc => return Msg::Cancel.into(),
        _ => return Action::None,
    };
    Msg::ResizeBy { cols, rows }.into()
}
