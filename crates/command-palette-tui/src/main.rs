use anyhow::{Context, Result};
use command_palette::{CommandPalette, CommandRegistry, HotKeyRegistry, ListenerId};
use ratatui::{
    crossterm::{
        self,
        event::{
            self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
            MouseEventKind,
        },
    },
    prelude::*,
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::mpsc;

use crate::actions::Action;
use crate::config::Config;
use crate::effect::execute_effect;
use crate::keymap::KeyContext;
use crate::state::{AppState, CommandContext};
use crate::store::Store;

mod actions;
mod commands;
mod config;
mod effect;
mod keymap;
mod log_capture;
mod reducer;
mod state;
mod store;
mod theme;
mod view_models;
mod views;

pub struct App {
    // Redux store - centralized state management
    pub store: Store,
    // Command handlers and effects send follow-up actions here
    pub action_tx: mpsc::UnboundedSender<Action>,
    // Providers the palette's command list is rebuilt from
    pub commands: CommandRegistry<CommandContext>,
    // Hotkey listeners; the palette keeps its own registration alive
    pub hotkeys: HotKeyRegistry,
}

/// What the input thread needs to know to interpret a key press
#[derive(Debug, Clone, Copy, Default)]
struct InputSnapshot {
    keys: KeyContext,
    listener: Option<ListenerId>,
}

pub fn initialize_panic_handler() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = shutdown();
        original_hook(panic_info);
    }));
}

fn startup() -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(
        std::io::stderr(),
        crossterm::terminal::EnterAlternateScreen,
        EnableMouseCapture
    )?;
    Ok(())
}

fn shutdown() -> Result<()> {
    crossterm::execute!(
        std::io::stderr(),
        DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    crossterm::terminal::disable_raw_mode()?;
    Ok(())
}

async fn update(app: &mut App, msg: Action) -> Result<()> {
    // Pure Redux/Elm architecture: Dispatch action to reducers, get effects back
    let effects = app.store.dispatch(msg);

    // Execute effects returned by reducers and dispatch follow-up actions
    for effect in effects {
        let follow_up_actions = execute_effect(app, effect).await?;

        for action in follow_up_actions {
            let nested_effects = app.store.dispatch(action);
            for nested_effect in nested_effects {
                let nested_actions = execute_effect(app, nested_effect).await?;
                for nested_action in nested_actions {
                    let _ = app.action_tx.send(nested_action);
                }
            }
        }
    }

    Ok(())
}

fn start_event_handler(
    app: &App,
    tx: mpsc::UnboundedSender<Action>,
    snapshot: Arc<Mutex<InputSnapshot>>,
) -> tokio::task::JoinHandle<()> {
    let tick_rate = Duration::from_millis(250);
    let hotkeys = app.hotkeys.clone();

    tokio::spawn(async move {
        loop {
            let action = match crossterm::event::poll(tick_rate) {
                Ok(true) => {
                    let current = snapshot.lock().map(|s| *s).unwrap_or_default();
                    handle_events(current, &hotkeys).unwrap_or_else(|err| {
                        log::debug!("Failed to read terminal event: {}", err);
                        Action::None
                    })
                }
                Ok(false) => Action::None,
                Err(err) => {
                    log::error!("Terminal event polling failed: {}", err);
                    break;
                }
            };

            if tx.send(action).is_err() {
                break;
            }
        }
    })
}

fn handle_events(snapshot: InputSnapshot, hotkeys: &HotKeyRegistry) -> Result<Action> {
    Ok(match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            keymap::handle_key(key, snapshot.keys, |chord| {
                snapshot
                    .listener
                    .is_some_and(|id| hotkeys.listeners_for(chord).contains(&id))
            })
        }
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            Action::MouseClick(mouse.column, mouse.row)
        }
        _ => Action::None,
    })
}

async fn run(mut app: App, mut action_rx: mpsc::UnboundedReceiver<Action>) -> Result<()> {
    let mut t = Terminal::new(CrosstermBackend::new(std::io::stderr()))?;

    let snapshot = Arc::new(Mutex::new(InputSnapshot::default()));
    let event_task = start_event_handler(&app, app.action_tx.clone(), snapshot.clone());

    // Seed the command list with the providers' current view
    app.action_tx.send(Action::RefreshCommands)?;

    loop {
        // Sync what the input thread needs for the next key press
        if let Ok(mut shared) = snapshot.lock() {
            let palette = &app.store.state().palette;
            *shared = InputSnapshot {
                keys: KeyContext {
                    palette_open: palette.is_open(),
                    input_focused: palette.input_focused(),
                },
                listener: palette.listener_id(),
            };
        }

        let mut layout = Default::default();
        t.draw(|f| {
            layout = views::home::render(f, &app);
        })?;
        app.store.state_mut().ui.layout = layout;

        let maybe_action =
            tokio::time::timeout(Duration::from_millis(100), action_rx.recv()).await;

        match maybe_action {
            Ok(Some(action)) => {
                if let Err(err) = update(&mut app, action).await {
                    log::error!("Error updating app: {}", err);
                    app.store.state_mut().ui.should_quit = true;
                }
            }
            Ok(None) => break, // Channel closed
            Err(_) => {
                // Timeout - tick spinner animation
                let _ = app.action_tx.send(Action::TickSpinner);
            }
        }

        if app.store.state().ui.should_quit {
            break;
        }
    }

    event_task.abort();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads RUST_LOG
    let _ = dotenvy::dotenv();
    let log_buffer = log_capture::init_logger()?;

    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let app = App::new(Config::load(), log_buffer, action_tx)?;

    initialize_panic_handler();
    startup()?;
    let result = run(app, action_rx).await;
    shutdown()?;
    result
}

impl App {
    fn new(
        config: Config,
        log_buffer: log_capture::LogBuffer,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Result<App> {
        let commands = commands::build_registry(config.commands, action_tx.clone());
        let hotkeys = HotKeyRegistry::new();

        let mut palette = CommandPalette::new(Vec::new(), config.palette)
            .context("Invalid [palette] settings in command-palette.toml")?;
        palette.listen(&hotkeys);

        Ok(App {
            store: Store::new(AppState::new(palette, log_buffer)),
            action_tx,
            commands,
            hotkeys,
        })
    }
}
