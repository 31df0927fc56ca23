//! Command providers for the demo application
//!
//! Every command's handler sends an [`Action`] through the app's channel;
//! the palette fires it and moves on.

use std::sync::Arc;

use command_palette::{
    Command, CommandAction, CommandFn, CommandProvider, CommandRegistry, CommandSpec,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::actions::Action;
use crate::state::CommandContext;

/// Built-in commands: (name, action id, category, shortcut hint)
const BUILTIN_COMMANDS: &[(&str, &str, &str, Option<&str>)] = &[
    ("Increment counter", "increment", "Counter", Some("+")),
    ("Decrement counter", "decrement", "Counter", Some("-")),
    ("Reset counter", "reset", "Counter", None),
    ("Run slow task", "slow_task", "Tasks", None),
    ("Toggle palette display", "toggle_display", "View", None),
    ("Clear activity", "clear_activity", "View", None),
    ("Quit", "quit", "General", Some("q")),
];

/// Handler that dispatches the action behind `id`
fn handler_for(id: &str, tx: &UnboundedSender<Action>) -> Option<CommandFn> {
    // Validate the id up front so unknown ids stay unbound
    Action::from_id(id)?;

    let id = id.to_string();
    let tx = tx.clone();
    Some(Arc::new(move || {
        if let Some(action) = Action::from_id(&id) {
            let _ = tx.send(action);
        }
    }))
}

/// Provides the built-in demo commands, filtered by context
#[derive(Debug)]
pub struct BuiltinCommandProvider {
    tx: UnboundedSender<Action>,
}

impl BuiltinCommandProvider {
    pub fn new(tx: UnboundedSender<Action>) -> Self {
        Self { tx }
    }
}

impl CommandProvider<CommandContext> for BuiltinCommandProvider {
    fn commands(&self, context: &CommandContext) -> Vec<Command> {
        BUILTIN_COMMANDS
            .iter()
            .filter(|(_, id, _, _)| is_available(id, context))
            .filter_map(|(name, id, category, shortcut)| {
                Some(Command {
                    name: name.to_string(),
                    category: Some(category.to_string()),
                    shortcut: shortcut.map(str::to_string),
                    action: CommandAction::Callable(handler_for(id, &self.tx)?),
                })
            })
            .collect()
    }

    fn name(&self) -> &str {
        "Builtin"
    }
}

/// Check if a built-in command makes sense in the current context
fn is_available(id: &str, context: &CommandContext) -> bool {
    match id {
        "reset" => context.counter != 0,
        "clear_activity" => context.has_activity,
        _ => true,
    }
}

/// Provides the `[[commands]]` entries from the config file
///
/// Entries whose action id is unknown still show up; selecting them
/// fails with "command must be a function".
#[derive(Debug)]
pub struct ConfigCommandProvider {
    specs: Vec<CommandSpec>,
    tx: UnboundedSender<Action>,
}

impl ConfigCommandProvider {
    pub fn new(specs: Vec<CommandSpec>, tx: UnboundedSender<Action>) -> Self {
        Self { specs, tx }
    }
}

impl CommandProvider<CommandContext> for ConfigCommandProvider {
    fn commands(&self, _context: &CommandContext) -> Vec<Command> {
        self.specs
            .iter()
            .map(|spec| spec.resolve(|id| handler_for(id, &self.tx)))
            .collect()
    }

    fn name(&self) -> &str {
        "Config"
    }
}

/// Registry with the built-in provider followed by the config provider
pub fn build_registry(
    specs: Vec<CommandSpec>,
    tx: UnboundedSender<Action>,
) -> CommandRegistry<CommandContext> {
    let mut registry = CommandRegistry::new();
    registry.register(Box::new(BuiltinCommandProvider::new(tx.clone())));
    if !specs.is_empty() {
        registry.register(Box::new(ConfigCommandProvider::new(specs, tx)));
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn context(counter: i64, has_activity: bool) -> CommandContext {
        CommandContext {
            counter,
            has_activity,
        }
    }

    fn names(commands: &[Command]) -> Vec<&str> {
        commands.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_builtin_context_filtering() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let registry = build_registry(vec![], tx);

        let commands = registry.all_commands(&context(0, false));
        assert!(!names(&commands).contains(&"Reset counter"));
        assert!(!names(&commands).contains(&"Clear activity"));

        let commands = registry.all_commands(&context(3, true));
        assert!(names(&commands).contains(&"Reset counter"));
        assert!(names(&commands).contains(&"Clear activity"));

        for cmd in &commands {
            assert!(cmd.category.is_some());
        }
    }

    #[test]
    fn test_handler_dispatches_action() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let registry = build_registry(vec![], tx);
        let commands = registry.all_commands(&context(0, false));

        let increment = commands
            .iter()
            .find(|c| c.name == "Increment counter")
            .unwrap();
        match &increment.action {
            CommandAction::Callable(f) => f(),
            CommandAction::Unbound(_) => panic!("builtin command must be callable"),
        }

        assert!(matches!(rx.try_recv(), Ok(Action::Increment)));
    }

    #[test]
    fn test_config_commands_follow_builtins() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let specs = vec![
            CommandSpec {
                name: "Bump".into(),
                action: Some("increment".into()),
                category: Some("Custom".into()),
                shortcut: None,
            },
            CommandSpec {
                name: "Launch rockets".into(),
                action: Some("rockets".into()),
                category: None,
                shortcut: None,
            },
        ];
        let registry = build_registry(specs, tx);
        assert_eq!(registry.provider_count(), 2);

        let commands = registry.all_commands(&context(0, false));
        let tail: Vec<_> = commands.iter().rev().take(2).collect();
        assert_eq!(tail[1].name, "Bump");
        assert!(tail[1].is_callable());
        assert_eq!(tail[0].name, "Launch rockets");
        assert!(!tail[0].is_callable());
    }
}
