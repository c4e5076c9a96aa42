//! Net construction surface, enabling/firing rule and the marking text codec.
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::net::ids::{PlaceId, TransitionId};
use crate::net::index_vec::IndexVec;
use crate::net::structure::{Arc, ArcKind, Marking, Place, Tokens, Transition};

/// Structural errors raised while building a net or decoding a marking
/// string. Construction aborts without leaving a half-built net behind.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("duplicate place name {0:?}")]
    DuplicatePlace(String),
    #[error("duplicate transition name {0:?}")]
    DuplicateTransition(String),
    #[error("unknown place {0:?}")]
    UnknownPlace(String),
    #[error("unknown transition {0:?}")]
    UnknownTransition(String),
    #[error("malformed marking string {0:?}")]
    MalformedMarking(String),
    #[error("marking has {actual} entries but the net has {expected} places")]
    MarkingLength { expected: usize, actual: usize },
    #[error("{tokens} tokens exceed bound {bound} at place {place:?}")]
    BoundExceeded {
        place: String,
        tokens: Tokens,
        bound: Tokens,
    },
}

/// Firing a transition that is not enabled is a recoverable condition, not a
/// crash: the supplied marking is left untouched and the caller decides what
/// to fire instead.
#[derive(Debug, Error)]
pub enum FireError {
    #[error("transition {0:?} is out of bounds")]
    OutOfBounds(TransitionId),
    #[error("transition {0:?} is not enabled under the supplied marking")]
    NotEnabled(TransitionId),
}

/// A bounded place/transition net.
///
/// Places and transitions carry name identity; names are unique per net and
/// resolve through insertion-ordered maps, so the place ordering underlying
/// every [`Marking`] is the first-seen order and never changes afterwards.
/// All places share the single net-wide capacity `bound`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Net {
    places: IndexVec<PlaceId, Place>,
    transitions: IndexVec<TransitionId, Transition>,
    arcs: Vec<Arc>,
    place_names: IndexMap<String, PlaceId>,
    transition_names: IndexMap<String, TransitionId>,
    bound: Tokens,
}

impl Net {
    pub fn new(bound: Tokens) -> Self {
        Self {
            places: IndexVec::new(),
            transitions: IndexVec::new(),
            arcs: Vec::new(),
            place_names: IndexMap::new(),
            transition_names: IndexMap::new(),
            bound,
        }
    }

    pub fn bound(&self) -> Tokens {
        self.bound
    }

    pub fn places(&self) -> &IndexVec<PlaceId, Place> {
        &self.places
    }

    pub fn transitions(&self) -> &IndexVec<TransitionId, Transition> {
        &self.transitions
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn places_len(&self) -> usize {
        self.places.len()
    }

    pub fn transitions_len(&self) -> usize {
        self.transitions.len()
    }

    pub fn place_id(&self, name: &str) -> Option<PlaceId> {
        self.place_names.get(name).copied()
    }

    pub fn transition_id(&self, name: &str) -> Option<TransitionId> {
        self.transition_names.get(name).copied()
    }

    /// Adds a place with zero tokens and the net-wide bound.
    pub fn add_place(&mut self, name: impl Into<String>) -> Result<PlaceId, NetError> {
        self.add_place_with_tokens(name, 0)
    }

    pub fn add_place_with_tokens(
        &mut self,
        name: impl Into<String>,
        tokens: Tokens,
    ) -> Result<PlaceId, NetError> {
        let name = name.into();
        if self.place_names.contains_key(&name) {
            return Err(NetError::DuplicatePlace(name));
        }
        if tokens > self.bound {
            return Err(NetError::BoundExceeded {
                place: name,
                tokens,
                bound: self.bound,
            });
        }
        let place = self.places.push(Place::new(name.clone(), tokens, self.bound));
        self.place_names.insert(name, place);
        Ok(place)
    }

    pub fn add_transition(&mut self, name: impl Into<String>) -> Result<TransitionId, NetError> {
        let name = name.into();
        if self.transition_names.contains_key(&name) {
            return Err(NetError::DuplicateTransition(name));
        }
        let transition = self.transitions.push(Transition::new(name.clone()));
        self.transition_names.insert(name, transition);
        Ok(transition)
    }

    /// Adds a unit-weight arc between an existing place and transition.
    /// Both endpoints are resolved before anything is mutated.
    pub fn add_arc(
        &mut self,
        place: &str,
        transition: &str,
        kind: ArcKind,
    ) -> Result<(), NetError> {
        let place_id = self
            .place_id(place)
            .ok_or_else(|| NetError::UnknownPlace(place.to_owned()))?;
        let transition_id = self
            .transition_id(transition)
            .ok_or_else(|| NetError::UnknownTransition(transition.to_owned()))?;
        match kind {
            ArcKind::Input => self.transitions[transition_id].inputs.push(place_id),
            ArcKind::Output => self.transitions[transition_id].outputs.push(place_id),
        }
        self.arcs.push(Arc::new(place_id, transition_id, kind));
        Ok(())
    }

    pub fn set_tokens(&mut self, place: PlaceId, tokens: Tokens) -> Result<(), NetError> {
        let slot = self
            .places
            .get(place)
            .ok_or_else(|| NetError::UnknownPlace(format!("{place:?}")))?;
        if tokens > self.bound {
            return Err(NetError::BoundExceeded {
                place: slot.name.clone(),
                tokens,
                bound: self.bound,
            });
        }
        self.places[place].tokens = tokens;
        Ok(())
    }

    /// The marking derived from the current per-place token counts.
    pub fn initial_marking(&self) -> Marking {
        Marking::new(IndexVec::from(
            self.places.iter().map(|p| p.tokens).collect::<Vec<_>>(),
        ))
    }

    /// Writes `marking` back into the per-place token counts. Validation
    /// happens up front so a failed call leaves the net unchanged.
    pub fn set_marking(&mut self, marking: &Marking) -> Result<(), NetError> {
        if marking.len() != self.places.len() {
            return Err(NetError::MarkingLength {
                expected: self.places.len(),
                actual: marking.len(),
            });
        }
        for (place, &tokens) in marking.iter() {
            if tokens > self.bound {
                return Err(NetError::BoundExceeded {
                    place: self.places[place].name.clone(),
                    tokens,
                    bound: self.bound,
                });
            }
        }
        for (place, &tokens) in marking.iter() {
            self.places[place].tokens = tokens;
        }
        Ok(())
    }

    /// Decodes the textual marking form `[count.place, ...]`, e.g.
    /// `[1.p1, 0.p2]`. Places not mentioned default to zero tokens; `[]`
    /// yields the all-zero marking.
    pub fn parse_marking(&self, text: &str) -> Result<Marking, NetError> {
        let trimmed = text.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| NetError::MalformedMarking(text.to_owned()))?
            .trim();

        let mut marking = Marking::zero(self.places.len());
        if inner.is_empty() {
            return Ok(marking);
        }
        for entry in inner.split(',') {
            let entry = entry.trim();
            let (count, name) = entry
                .split_once('.')
                .ok_or_else(|| NetError::MalformedMarking(text.to_owned()))?;
            let tokens: Tokens = count
                .trim()
                .parse()
                .map_err(|_| NetError::MalformedMarking(text.to_owned()))?;
            let name = name.trim();
            let place = self
                .place_id(name)
                .ok_or_else(|| NetError::UnknownPlace(name.to_owned()))?;
            if tokens > self.bound {
                return Err(NetError::BoundExceeded {
                    place: name.to_owned(),
                    tokens,
                    bound: self.bound,
                });
            }
            *marking.tokens_mut(place) = tokens;
        }
        Ok(marking)
    }

    /// Canonical textual form of a marking, in stable place order. A decode
    /// of the result reproduces the same vector.
    pub fn format_marking(&self, marking: &Marking) -> String {
        let entries = self
            .places
            .iter_enumerated()
            .map(|(place, slot)| format!("{}.{}", marking.tokens(place), slot.name))
            .join(", ");
        format!("[{entries}]")
    }

    /// The enabling rule: every output place must have capacity left and
    /// every input place must hold a token. A transition without arcs is
    /// vacuously enabled; a self-loop has to pass both checks.
    pub fn can_fire(&self, transition: TransitionId, marking: &Marking) -> bool {
        let Some(t) = self.transitions.get(transition) else {
            return false;
        };
        if marking.len() != self.places.len() {
            return false;
        }
        for &place in &t.outputs {
            if marking.tokens(place) == self.bound {
                return false;
            }
        }
        for &place in &t.inputs {
            if marking.tokens(place) == 0 {
                return false;
            }
        }
        true
    }

    /// Fires `transition` as a pure value transform: the input marking is
    /// left untouched and a fresh marking is returned.
    pub fn fire(&self, transition: TransitionId, marking: &Marking) -> Result<Marking, FireError> {
        if self.transitions.get(transition).is_none() {
            return Err(FireError::OutOfBounds(transition));
        }
        if !self.can_fire(transition, marking) {
            return Err(FireError::NotEnabled(transition));
        }
        let t = &self.transitions[transition];
        let mut next = marking.clone();
        for &place in &t.inputs {
            *next.tokens_mut(place) -= 1;
        }
        for &place in &t.outputs {
            *next.tokens_mut(place) += 1;
        }
        Ok(next)
    }

    /// Enabled transitions under `marking`, in declared order.
    pub fn enabled_transitions(&self, marking: &Marking) -> Vec<TransitionId> {
        self.transitions
            .iter_enumerated()
            .filter_map(|(transition, _)| {
                if self.can_fire(transition, marking) {
                    Some(transition)
                } else {
                    None
                }
            })
            .collect()
    }
}

impl Default for Net {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_shot_net() -> Net {
        let mut net = Net::new(1);
        net.add_place_with_tokens("p1", 1).unwrap();
        net.add_place("p2").unwrap();
        net.add_transition("t1").unwrap();
        net.add_arc("p1", "t1", ArcKind::Input).unwrap();
        net.add_arc("p2", "t1", ArcKind::Output).unwrap();
        net
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut net = Net::new(1);
        net.add_place("p").unwrap();
        assert!(matches!(
            net.add_place("p"),
            Err(NetError::DuplicatePlace(_))
        ));
        net.add_transition("t").unwrap();
        assert!(matches!(
            net.add_transition("t"),
            Err(NetError::DuplicateTransition(_))
        ));
        assert_eq!(net.places_len(), 1);
        assert_eq!(net.transitions_len(), 1);
    }

    #[test]
    fn arc_endpoints_must_exist() {
        let mut net = Net::new(1);
        net.add_place("p").unwrap();
        net.add_transition("t").unwrap();
        assert!(matches!(
            net.add_arc("q", "t", ArcKind::Input),
            Err(NetError::UnknownPlace(_))
        ));
        assert!(matches!(
            net.add_arc("p", "u", ArcKind::Output),
            Err(NetError::UnknownTransition(_))
        ));
        assert!(net.arcs().is_empty());
        assert!(net.transitions()[TransitionId(0)].inputs.is_empty());
    }

    #[test]
    fn firing_moves_one_token() {
        let net = one_shot_net();
        let t1 = net.transition_id("t1").unwrap();
        let m0 = net.initial_marking();
        assert_eq!(m0, Marking::from(vec![1, 0]));

        assert!(net.can_fire(t1, &m0));
        let m1 = net.fire(t1, &m0).unwrap();
        assert_eq!(m1, Marking::from(vec![0, 1]));
        // the source marking is a value, not shared state
        assert_eq!(m0, Marking::from(vec![1, 0]));
        assert!(!net.can_fire(t1, &m1));
    }

    #[test]
    fn disabled_fire_reports_and_leaves_marking_alone() {
        let net = one_shot_net();
        let t1 = net.transition_id("t1").unwrap();
        let empty = Marking::from(vec![0, 0]);
        assert!(matches!(
            net.fire(t1, &empty),
            Err(FireError::NotEnabled(_))
        ));
        assert_eq!(empty, Marking::from(vec![0, 0]));
    }

    #[test]
    fn transition_without_arcs_is_vacuously_enabled() {
        let mut net = Net::new(1);
        net.add_place("p").unwrap();
        let t = net.add_transition("t").unwrap();
        assert!(net.can_fire(t, &net.initial_marking()));
    }

    #[test]
    fn self_loop_checks_both_directions() {
        let mut net = Net::new(2);
        net.add_place_with_tokens("p", 2).unwrap();
        let t = net.add_transition("t").unwrap();
        net.add_arc("p", "t", ArcKind::Input).unwrap();
        net.add_arc("p", "t", ArcKind::Output).unwrap();

        // full place: the output arc has no capacity to receive
        assert!(!net.can_fire(t, &Marking::from(vec![2])));
        // empty place: the input arc has nothing to consume
        assert!(!net.can_fire(t, &Marking::from(vec![0])));
        let next = net.fire(t, &Marking::from(vec![1])).unwrap();
        assert_eq!(next, Marking::from(vec![1]));
    }

    #[test]
    fn enabled_transitions_follow_declared_order() {
        let mut net = Net::new(1);
        net.add_place_with_tokens("p", 1).unwrap();
        let tb = net.add_transition("b").unwrap();
        let ta = net.add_transition("a").unwrap();
        net.add_arc("p", "b", ArcKind::Input).unwrap();
        net.add_arc("p", "a", ArcKind::Input).unwrap();
        assert_eq!(
            net.enabled_transitions(&net.initial_marking()),
            vec![tb, ta]
        );
    }

    #[test]
    fn marking_string_round_trip() {
        let net = one_shot_net();
        let parsed = net.parse_marking("[0.p1, 1.p2]").unwrap();
        assert_eq!(parsed, Marking::from(vec![0, 1]));
        assert_eq!(net.format_marking(&parsed), "[0.p1, 1.p2]");
        assert_eq!(net.parse_marking(&net.format_marking(&parsed)).unwrap(), parsed);
    }

    #[test]
    fn marking_string_defaults_and_rejects() {
        let net = one_shot_net();
        assert_eq!(net.parse_marking("[]").unwrap(), Marking::from(vec![0, 0]));
        assert_eq!(
            net.parse_marking("[1.p2]").unwrap(),
            Marking::from(vec![0, 1])
        );
        assert!(matches!(
            net.parse_marking("[1.zz]"),
            Err(NetError::UnknownPlace(_))
        ));
        assert!(matches!(
            net.parse_marking("1.p1"),
            Err(NetError::MalformedMarking(_))
        ));
        assert!(matches!(
            net.parse_marking("[x.p1]"),
            Err(NetError::MalformedMarking(_))
        ));
        assert!(matches!(
            net.parse_marking("[2.p1]"),
            Err(NetError::BoundExceeded { .. })
        ));
    }

    #[test]
    fn set_marking_validates_before_mutating() {
        let mut net = one_shot_net();
        let before = net.initial_marking();
        assert!(matches!(
            net.set_marking(&Marking::from(vec![1])),
            Err(NetError::MarkingLength { .. })
        ));
        assert!(matches!(
            net.set_marking(&Marking::from(vec![0, 9])),
            Err(NetError::BoundExceeded { .. })
        ));
        assert_eq!(net.initial_marking(), before);

        net.set_marking(&Marking::from(vec![0, 1])).unwrap();
        assert_eq!(net.initial_marking(), Marking::from(vec![0, 1]));
    }
}
