//! Static structure of a bounded P/T net: places, transitions, arcs and markings.
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::net::ids::{PlaceId, TransitionId};
use crate::net::index_vec::IndexVec;

pub type Tokens = u32;

/// Ordered arc endpoints of one transition. Order only matters for
/// deterministic output, not for the firing rule.
pub type Endpoints = SmallVec<[PlaceId; 4]>;

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub struct Place {
    pub name: String,
    pub tokens: Tokens,
    pub bound: Tokens,
}

impl Place {
    pub fn new(name: impl Into<String>, tokens: Tokens, bound: Tokens) -> Self {
        Self {
            name: name.into(),
            tokens,
            bound,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Transition {
    pub name: String,
    /// Places feeding this transition (one token consumed per firing).
    pub inputs: Endpoints,
    /// Places fed by this transition (one token produced per firing).
    pub outputs: Endpoints,
}

impl Transition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Endpoints::new(),
            outputs: Endpoints::new(),
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transition").field(&self.name).finish()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ArcKind {
    /// place -> transition
    Input,
    /// transition -> place
    Output,
}

/// A unit-weight arc. Every arc moves exactly one token per firing.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub struct Arc {
    pub place: PlaceId,
    pub transition: TransitionId,
    pub kind: ArcKind,
}

impl Arc {
    pub fn new(place: PlaceId, transition: TransitionId, kind: ArcKind) -> Self {
        Self {
            place,
            transition,
            kind,
        }
    }
}

/// Token-count vector over the net's places, in stable place order.
///
/// Markings are values: equality and hashing go over the contents, and every
/// firing produces a fresh vector instead of mutating the source.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Marking(IndexVec<PlaceId, Tokens>);

impl Marking {
    pub fn new(tokens: IndexVec<PlaceId, Tokens>) -> Self {
        Self(tokens)
    }

    pub fn zero(places: usize) -> Self {
        Self(IndexVec::from(vec![0; places]))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlaceId, &Tokens)> {
        self.0.iter_enumerated()
    }

    pub fn tokens(&self, place: PlaceId) -> Tokens {
        self.0[place]
    }

    pub fn tokens_mut(&mut self, place: PlaceId) -> &mut Tokens {
        &mut self.0[place]
    }

    pub fn into_inner(self) -> IndexVec<PlaceId, Tokens> {
        self.0
    }
}

impl From<Vec<Tokens>> for Marking {
    fn from(tokens: Vec<Tokens>) -> Self {
        Self(IndexVec::from(tokens))
    }
}

impl fmt::Debug for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, tokens) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{tokens}")?;
        }
        write!(f, "]")
    }
}
