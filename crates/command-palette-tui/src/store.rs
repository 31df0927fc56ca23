use crate::{actions::Action, effect::Effect, reducer::reduce, state::AppState};

/// Owns the [`AppState`] and runs every action through the root reducer
///
/// Unlike a classic Redux store the state is mutated in place, since the
/// palette holds a hotkey registration that cannot be cloned.
pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(initial_state: AppState) -> Self {
        Self {
            state: initial_state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Escape hatch for render bookkeeping (layout hit areas)
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Apply `action`, returning the effects the caller must run
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        reduce(&mut self.state, action)
    }
}
