use std::time::Duration;

use anyhow::Result;
use command_palette::PaletteEvent;

use crate::{App, actions::Action};

/// How long the "Run slow task" command pretends to work
const SLOW_TASK_DURATION: Duration = Duration::from_secs(2);

/// Side effects requested by reducers
#[derive(Debug, Clone)]
pub enum Effect {
    /// Rebuild the palette's command list from the providers
    RefreshCommands,
    /// Run a background task that reports back with `SlowTaskFinished`
    SpawnSlowTask,
}

/// Execute an effect, returning follow-up actions to dispatch
pub async fn execute_effect(app: &mut App, effect: Effect) -> Result<Vec<Action>> {
    let mut follow_up_actions = Vec::new();

    match effect {
        Effect::RefreshCommands => {
            let context = app.store.state().command_context();
            let commands = app.commands.all_commands(&context);
            log::debug!("Refreshing palette with {} commands", commands.len());
            follow_up_actions.push(Action::Palette(PaletteEvent::CommandsChanged(commands)));
        }
        Effect::SpawnSlowTask => {
            let tx = app.action_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(SLOW_TASK_DURATION).await;
                let _ = tx.send(Action::SlowTaskFinished);
            });
        }
    }

    Ok(follow_up_actions)
}
