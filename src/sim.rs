//! Token-game driver.
//!
//! Holds the single "current marking" cell for a play of the net. Each step
//! collects the enabled transitions, lets an injected [`ChoicePolicy`] pick
//! one, fires it and records the firing. The firing engine itself stays
//! pure; only this cell is updated between steps.
use rand::Rng;
use rand::rngs::ThreadRng;

use crate::analysis::Firing;
use crate::net::core::Net;
use crate::net::ids::TransitionId;
use crate::net::structure::Marking;

/// Picks which of the enabled transitions to fire next. Injected so tests
/// can play deterministically while interactive callers plug in randomness.
pub trait ChoicePolicy {
    /// Returns an index into `enabled`, which is never empty.
    fn choose(&mut self, enabled: &[TransitionId]) -> usize;
}

pub struct RandomChoice {
    rng: ThreadRng,
}

impl RandomChoice {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RandomChoice {
    fn default() -> Self {
        Self::new()
    }
}

impl ChoicePolicy for RandomChoice {
    fn choose(&mut self, enabled: &[TransitionId]) -> usize {
        self.rng.random_range(0..enabled.len())
    }
}

/// Always fires the first enabled transition in declared order.
pub struct FirstEnabled;

impl ChoicePolicy for FirstEnabled {
    fn choose(&mut self, _enabled: &[TransitionId]) -> usize {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No transition was enabled; a terminal marking was reached.
    Deadlock,
    /// The step budget ran out before the play terminated.
    StepBudget,
}

pub struct TokenGame<'net, P> {
    net: &'net Net,
    marking: Marking,
    policy: P,
}

impl<'net, P> TokenGame<'net, P>
where
    P: ChoicePolicy,
{
    /// Starts a play at the net's initial marking.
    pub fn new(net: &'net Net, policy: P) -> Self {
        Self::with_marking(net, net.initial_marking(), policy)
    }

    pub fn with_marking(net: &'net Net, marking: Marking, policy: P) -> Self {
        Self {
            net,
            marking,
            policy,
        }
    }

    pub fn marking(&self) -> &Marking {
        &self.marking
    }

    /// Plays one step. Returns `None` at a terminal marking.
    pub fn step(&mut self) -> Option<Firing> {
        let enabled = self.net.enabled_transitions(&self.marking);
        if enabled.is_empty() {
            return None;
        }
        let transition = enabled[self.policy.choose(&enabled)];
        let next = self.net.fire(transition, &self.marking).ok()?;
        let record = Firing {
            source: self.marking.clone(),
            transition,
            target: next.clone(),
        };
        log::trace!(
            "fired {}: {} -> {}",
            self.net.transitions()[transition].name,
            record.source,
            record.target
        );
        self.marking = next;
        Some(record)
    }

    /// Plays until a terminal marking or until `max_steps` firings happened.
    pub fn run(&mut self, max_steps: usize) -> (Vec<Firing>, StopReason) {
        let mut trace = Vec::new();
        for _ in 0..max_steps {
            match self.step() {
                Some(record) => trace.push(record),
                None => return (trace, StopReason::Deadlock),
            }
        }
        (trace, StopReason::StepBudget)
    }
}
