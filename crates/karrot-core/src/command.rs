//! Command dispatch for the state modules.
//!
//! Each module describes its state transitions as a command enum and applies
//! them through [`Reducer::commit`]. The `match` inside each implementation is
//! the single place a transition can happen; async actions only decide which
//! commands to commit and when.

use std::fmt::Debug;

pub trait Reducer {
    type Command: Debug;
    type Outcome;

    /// Name used when logging committed commands
    fn name(&self) -> &'static str;

    fn apply(&mut self, command: Self::Command) -> Self::Outcome;

    fn commit(&mut self, command: Self::Command) -> Self::Outcome {
        log::debug!("[{}] commit {:?}", self.name(), command);
        self.apply(command)
    }
}
