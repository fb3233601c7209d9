//! Application state and main event loop for the terminal front end.
//!
//! Manages terminal setup/teardown, the panic hook, and the loop that feeds
//! key presses and runtime results through the dashboard reducer.

use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dashboard_api::DashboardApi;
use ratatui::prelude::{CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::dashboard::{Dashboard, Msg};
use crate::profile::ProfileName;
use crate::render::{render_tree, RenderTree};
use crate::runtime::Runtime;
use crate::tui::event::{handle_key_event, Action, Event, EventHandler};
use crate::tui::ui;
use crate::widgets::WidgetRegistry;

/// Core application state for the terminal front end.
pub struct App {
    dashboard: Dashboard,
    registry: WidgetRegistry,
    runtime: Runtime,
    messages: UnboundedReceiver<Msg>,
    tick_rate: Duration,
    /// Whether the application should exit.
    pub should_quit: bool,
}

impl App {
    /// Creates an app for `profile` backed by `api`.
    pub fn new(api: Arc<dyn DashboardApi>, profile: ProfileName, tick_rate: Duration) -> Self {
        let (tx, messages) = mpsc::unbounded_channel();
        Self {
            dashboard: Dashboard::new(profile),
            registry: WidgetRegistry::new(),
            runtime: Runtime::new(api, tx),
            messages,
            tick_rate,
            should_quit: false,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Projection of the current state for drawing.
    pub fn render_tree(&self) -> RenderTree {
        render_tree(&self.dashboard, &self.registry)
    }

    /// Runs one message through the reducer and executes its effects.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, msg: Msg) {
        let dashboard = std::mem::take(&mut self.dashboard);
        let (dashboard, effects) = dashboard.update(msg);
        self.dashboard = dashboard;
        self.runtime.execute_all(effects);
    }

    /// Handles one event, setting `should_quit` when the user asks to exit.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => match handle_key_event(self.dashboard.mode(), key) {
                Action::Quit => self.should_quit = true,
                Action::Dispatch(msg) => self.dispatch(msg),
                Action::None => {}
            },
            Event::Dashboard(msg) => self.dispatch(msg),
            // Redrawn on the next loop iteration
            Event::Tick | Event::Resize(_, _) => {}
        }
    }

    /// Applies every runtime message that is already waiting.
    pub fn drain_messages(&mut self) {
        while let Ok(msg) = self.messages.try_recv() {
            self.dispatch(msg);
        }
    }

    /// Runs the TUI application: sets up terminal, enters event loop, restores on exit.
    pub async fn run(&mut self) -> io::Result<()> {
        // Install panic hook that restores terminal before printing panic info
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        setup_terminal()?;

        let result = self.event_loop().await;

        restore_terminal()?;
        result
    }

    async fn event_loop(&mut self) -> io::Result<()> {
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;
        let mut events = EventHandler::new(self.tick_rate);
        let mut reader = EventStream::new();

        self.dispatch(Msg::Start);

        while !self.should_quit {
            let tree = self.render_tree();
            terminal.draw(|frame| ui::draw(frame, &tree))?;

            let event = events.next(&mut reader, &mut self.messages).await?;
            self.handle_event(event);
            self.drain_messages();
        }
        tracing::info!(profile = %self.dashboard.profile(), "dashboard closed");
        Ok(())
    }
}

/// Enables raw mode and enters the alternate screen.
fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    Ok(())
}

/// Leaves the alternate screen and disables raw mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}
