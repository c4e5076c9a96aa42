//! Behavioral analyses derived from the firing rule: reachability from an
//! initial marking and the full bounded state space with its transition
//! relation.

pub mod reachability;
pub mod statespace;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::net::ids::TransitionId;
use crate::net::structure::Marking;

pub use reachability::{ReachabilityGraph, StateEdge, StateGraphStats, StateNode};
pub use statespace::{MarkingSpace, TransitionSystem, marking_space, space_size, transition_system};

/// One firing fact: firing `transition` in `source` yields `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Firing {
    pub source: Marking,
    pub transition: TransitionId,
    pub target: Marking,
}

/// Exploration limits. The marking space grows like `(bound+1)^|P|`, so a
/// cap keeps a run from eating the machine; hitting it is reported as an
/// error rather than silently truncating.
#[derive(Debug, Clone)]
pub struct ExploreConfig {
    /// Maximum number of markings to visit. `None` removes the cap.
    pub state_limit: Option<usize>,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            state_limit: Some(10_000),
        }
    }
}

/// Resource-limit errors. The partially built artifact travels with the
/// error so callers can inspect how far the run got, while the `Err` itself
/// keeps "capped" distinguishable from "fully explored".
#[derive(Debug, Error)]
pub enum ExploreError {
    #[error("reachability exploration exceeded the state limit of {limit}")]
    ReachabilityLimit {
        limit: usize,
        partial: Box<ReachabilityGraph>,
    },
    #[error("state-space enumeration exceeded the state limit of {limit}")]
    StateSpaceLimit {
        limit: usize,
        partial: Box<TransitionSystem>,
    },
}
