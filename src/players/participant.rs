//! Seated participants: a unique name plus a strategy.

use super::strategy::{GreedyFirstFit, MoveDecider, Strategy};

/// A participant in a match.
#[derive(Debug)]
pub struct Participant {
    name: String,
    strategy: Strategy,
}

impl Participant {
    /// Seat a participant with an explicit strategy.
    pub fn new(name: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            name: name.into(),
            strategy,
        }
    }

    /// Seat a greedy bot.
    pub fn bot(name: impl Into<String>) -> Self {
        Self::new(name, Strategy::Greedy(GreedyFirstFit))
    }

    /// Seat a participant whose moves come from `decider`.
    pub fn interactive(name: impl Into<String>, decider: impl MoveDecider + 'static) -> Self {
        Self::new(name, Strategy::Interactive(Box::new(decider)))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub(crate) fn strategy_mut(&mut self) -> &mut Strategy {
        &mut self.strategy
    }
}
