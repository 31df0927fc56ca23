//! Resolving a pick from the suggestion list and running its command

use crate::command::{CommandAction, Suggestion};
use crate::error::SelectError;

/// How the user made the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMethod {
    Click,
    Enter,
}

/// A pick from the current suggestion list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionEvent {
    pub index: usize,
    pub method: SelectionMethod,
}

impl SelectionEvent {
    pub fn click(index: usize) -> Self {
        Self {
            index,
            method: SelectionMethod::Click,
        }
    }

    pub fn enter(index: usize) -> Self {
        Self {
            index,
            method: SelectionMethod::Enter,
        }
    }
}

/// Look up the suggestion a selection event refers to
pub fn resolve<'a>(
    suggestions: &'a [Suggestion],
    event: &SelectionEvent,
) -> Result<&'a Suggestion, SelectError> {
    suggestions
        .get(event.index)
        .ok_or(SelectError::NoSuggestion {
            index: event.index,
            available: suggestions.len(),
        })
}

/// Invoke the suggestion's command
///
/// The handler runs to completion on the caller's thread; whatever it
/// starts in the background is its own business.
pub fn execute(suggestion: &Suggestion) -> Result<(), SelectError> {
    let command = &suggestion.command;
    match &command.action {
        CommandAction::Callable(handler) => {
            log::debug!("Executing command {:?}", command.name);
            handler();
            Ok(())
        }
        CommandAction::Unbound(action_id) => {
            log::warn!(
                "Command {:?} has no handler (action {:?})",
                command.name,
                action_id
            );
            Err(SelectError::NotCallable {
                name: command.name.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_command(name: &str, calls: &Arc<AtomicUsize>) -> Suggestion {
        let calls = calls.clone();
        Suggestion::unscored(Command::new(name, move || {
            calls.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[test]
    fn test_execute_runs_handler_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let suggestion = counting_command("Manage Tenants", &calls);

        execute(&suggestion).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_execute_unbound_fails() {
        let suggestion = Suggestion::unscored(Command::unbound("Broken", "not a function"));

        let err = execute(&suggestion).unwrap_err();
        assert_eq!(err.to_string(), "command must be a function");
        assert_eq!(
            err,
            SelectError::NotCallable {
                name: "Broken".into()
            }
        );
    }

    #[test]
    fn test_resolve_by_index() {
        let calls = Arc::new(AtomicUsize::new(0));
        let suggestions = vec![
            counting_command("First", &calls),
            counting_command("Second", &calls),
        ];

        let picked = resolve(&suggestions, &SelectionEvent::click(1)).unwrap();
        assert_eq!(picked.name(), "Second");

        let err = resolve(&suggestions, &SelectionEvent::enter(2)).unwrap_err();
        assert_eq!(
            err,
            SelectError::NoSuggestion {
                index: 2,
                available: 2
            }
        );
    }
}
