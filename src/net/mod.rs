//! # Bounded Place/Transition net core
//!
//! Let `P` be the place set and `T` the transition set of a net with a
//! net-wide capacity bound `k`. A marking is a vector `M ∈ {0,...,k}^{|P|}`
//! in stable (first-insertion) place order. With unit-weight arcs:
//!
//! * `t ∈ T` is **enabled** under `M` iff every input place of `t` holds a
//!   token (`M[p] ≥ 1`) and every output place has capacity left
//!   (`M[p] < k`); a self-loop must pass both checks;
//! * **firing** `t` yields `M'` with one token removed per input arc and one
//!   added per output arc. `fire` is a pure value transform.
//!
//! On top of the firing rule the crate derives the reachable marking graph,
//! the bounded state space with its transition relation and silent markings
//! (see [`crate::analysis`]), and the structural merge of two nets by shared
//! transition name ([`merge`]).

pub mod core;
pub mod ids;
pub mod index_vec;
pub mod io;
pub mod merge;
pub mod structure;

pub use core::{FireError, Net, NetError};
pub use ids::{PlaceId, TransitionId};
pub use index_vec::{Idx, IndexVec};
pub use merge::merge;
pub use structure::{Arc, ArcKind, Marking, Place, Tokens, Transition};
