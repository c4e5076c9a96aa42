//! # ptnet — bounded Place/Transition net modeling and analysis
//!
//! Models nets whose places all share one capacity bound `k`, with
//! unit-weight arcs and interleaving semantics (one transition fires at a
//! time). On top of the enabling/firing rule the crate derives:
//!
//! * the marking graph reachable from an initial marking (deterministic
//!   breadth-first search with a configurable state cap);
//! * the complete bounded state space `{0,...,k}^|P|`, the transition
//!   relation over it and the silent markings that relation never touches;
//! * the structural merge of two nets by shared transition name, with
//!   places deduplicated by name.
//!
//! ## Example
//!
//! ```rust
//! use ptnet::analysis::ReachabilityGraph;
//! use ptnet::net::{ArcKind, Marking, Net};
//!
//! let mut net = Net::new(1);
//! net.add_place_with_tokens("p1", 1)?;
//! net.add_place("p2")?;
//! net.add_transition("t1")?;
//! net.add_arc("p1", "t1", ArcKind::Input)?;
//! net.add_arc("p2", "t1", ArcKind::Output)?;
//!
//! let t1 = net.transition_id("t1").unwrap();
//! let m0 = net.initial_marking();
//! assert!(net.can_fire(t1, &m0));
//! assert_eq!(net.fire(t1, &m0)?, Marking::from(vec![0, 1]));
//!
//! let graph = ReachabilityGraph::explore(&net)?;
//! assert_eq!(graph.stats().state_count, 2);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod analysis;
pub mod config;
pub mod dot;
pub mod net;
pub mod sim;

pub use analysis::{
    ExploreConfig, ExploreError, Firing, ReachabilityGraph, TransitionSystem, marking_space,
    space_size, transition_system,
};
pub use config::AnalysisConfig;
pub use net::{
    Arc, ArcKind, FireError, Marking, Net, NetError, Place, PlaceId, Tokens, Transition,
    TransitionId, merge,
};
