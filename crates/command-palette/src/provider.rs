//! Sources of palette commands

use std::fmt::Debug;

use crate::command::Command;

/// Something that contributes commands to a palette
///
/// `S` is whatever context the application filters on; a provider returns
/// only the commands that apply to it.
pub trait CommandProvider<S>: Debug {
    fn commands(&self, context: &S) -> Vec<Command>;

    /// Shown in logs
    fn name(&self) -> &str;
}

/// Ordered set of providers
///
/// [`CommandRegistry::all_commands`] concatenates their output, ready to
/// hand to [`crate::CommandPalette::set_commands`].
pub struct CommandRegistry<S> {
    providers: Vec<Box<dyn CommandProvider<S>>>,
}

impl<S> CommandRegistry<S> {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Append a provider; its commands follow those of earlier ones
    pub fn register(&mut self, provider: Box<dyn CommandProvider<S>>) {
        log::debug!("Registered command provider {}", provider.name());
        self.providers.push(provider);
    }

    /// Every provider's commands for `context`, in registration order
    pub fn all_commands(&self, context: &S) -> Vec<Command> {
        self.providers
            .iter()
            .flat_map(|p| p.commands(context))
            .collect()
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}

impl<S> Default for CommandRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Debug for CommandRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("providers", &self.providers)
            .finish()
    }
}
