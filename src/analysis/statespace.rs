//! Bounded state-space enumeration and the full-space transition relation.
//!
//! The state space is the Cartesian product `{0,...,bound}^|P|` — a superset
//! of whatever is reachable from any particular initial marking. Silent
//! markings are the members of that space the transition relation never
//! touches, as source or as target; they are a structural property of the
//! whole bounded space, independent of initial markings.
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::analysis::{ExploreConfig, ExploreError, Firing};
use crate::net::core::Net;
use crate::net::structure::{Marking, Tokens};

/// Iterator over every marking in `{0,...,bound}^|P|`.
///
/// Implemented as an odometer with the first place as the fastest digit, so
/// the walk is iterative no matter how many places the net has.
#[derive(Debug, Clone)]
pub struct MarkingSpace {
    digits: Option<Vec<Tokens>>,
    bound: Tokens,
}

impl Iterator for MarkingSpace {
    type Item = Marking;

    fn next(&mut self) -> Option<Marking> {
        let digits = self.digits.as_mut()?;
        let item = Marking::from(digits.clone());
        let mut advanced = false;
        for digit in digits.iter_mut() {
            if *digit < self.bound {
                *digit += 1;
                advanced = true;
                break;
            }
            *digit = 0;
        }
        if !advanced {
            self.digits = None;
        }
        Some(item)
    }
}

pub fn marking_space(net: &Net) -> MarkingSpace {
    MarkingSpace {
        digits: Some(vec![0; net.places_len()]),
        bound: net.bound(),
    }
}

/// Exact size of the bounded state space, `(bound+1)^|P|`.
pub fn space_size(net: &Net) -> u128 {
    (net.bound() as u128 + 1).pow(net.places_len() as u32)
}

/// The bounded state space together with the transition relation computed
/// over all of it, and the silent markings left untouched by the relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionSystem {
    /// Every marking of the bounded space, in enumeration order.
    pub states: Vec<Marking>,
    pub relation: Vec<Firing>,
    pub silent: Vec<Marking>,
}

/// Builds the transition relation over the complete bounded space.
///
/// Firing never leaves the bounded space (the enabling rule checks the
/// capacity side), so a single pass over the enumeration sees every
/// possible source exactly once.
pub fn transition_system(
    net: &Net,
    config: &ExploreConfig,
) -> Result<TransitionSystem, ExploreError> {
    let mut states = Vec::new();
    let mut relation = Vec::new();
    let mut touched: FxHashSet<Marking> = FxHashSet::default();
    let mut truncated = false;

    for marking in marking_space(net) {
        if let Some(limit) = config.state_limit {
            if states.len() >= limit {
                truncated = true;
                break;
            }
        }
        for (transition, _) in net.transitions().iter_enumerated() {
            if !net.can_fire(transition, &marking) {
                continue;
            }
            let Ok(target) = net.fire(transition, &marking) else {
                continue;
            };
            touched.insert(marking.clone());
            touched.insert(target.clone());
            relation.push(Firing {
                source: marking.clone(),
                transition,
                target,
            });
        }
        states.push(marking);
    }

    let silent = states
        .iter()
        .filter(|marking| !touched.contains(*marking))
        .cloned()
        .collect();
    log::debug!(
        "state space: {} states, {} relation entries{}",
        states.len(),
        relation.len(),
        if truncated { " (capped)" } else { "" }
    );

    let system = TransitionSystem {
        states,
        relation,
        silent,
    };
    if truncated {
        return Err(ExploreError::StateSpaceLimit {
            limit: config.state_limit.unwrap_or_default(),
            partial: Box::new(system),
        });
    }
    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::structure::ArcKind;

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
    fn enumeration_covers_the_whole_space_in_order() {
        let net = one_shot_net();
        let space: Vec<_> = marking_space(&net).collect();
        assert_eq!(
            space,
            vec![
                Marking::from(vec![0, 0]),
                Marking::from(vec![1, 0]),
                Marking::from(vec![0, 1]),
                Marking::from(vec![1, 1]),
            ]
        );
        assert_eq!(space.len() as u128, space_size(&net));
    }

    #[test]
    fn space_size_is_exponential_in_places() {
        let mut net = Net::new(2);
        for name in ["a", "b", "c"] {
            net.add_place(name).unwrap();
        }
        assert_eq!(space_size(&net), 27);
        assert_eq!(marking_space(&net).count() as u128, 27);
    }

    #[test]
    fn empty_net_has_one_marking() {
        let net = Net::new(1);
        let space: Vec<_> = marking_space(&net).collect();
        assert_eq!(space, vec![Marking::from(vec![])]);
        assert_eq!(space_size(&net), 1);
    }

    #[test]
    fn silent_markings_are_untouched_by_the_relation() {
        let net = one_shot_net();
        let t1 = net.transition_id("t1").unwrap();
        let system = transition_system(&net, &ExploreConfig::default()).unwrap();

        assert_eq!(
            system.relation,
            vec![Firing {
                source: Marking::from(vec![1, 0]),
                transition: t1,
                target: Marking::from(vec![0, 1]),
            }]
        );
        // [0,0] cannot fire or be produced; [1,1] blocks on the full output
        assert_eq!(
            system.silent,
            vec![Marking::from(vec![0, 0]), Marking::from(vec![1, 1])]
        );
    }

    #[test]
    fn silent_set_is_space_minus_relation_endpoints() {
        let net = one_shot_net();
        let system = transition_system(&net, &ExploreConfig::default()).unwrap();

        let mut endpoints = FxHashSet::default();
        for firing in &system.relation {
            endpoints.insert(firing.source.clone());
            endpoints.insert(firing.target.clone());
        }
        let expected: Vec<_> = system
            .states
            .iter()
            .filter(|state| !endpoints.contains(*state))
            .cloned()
            .collect();
        assert_eq!(system.silent, expected);
    }

    #[test]
    fn enumeration_cap_reports_partial_system() {
        let net = one_shot_net();
        let config = ExploreConfig {
            state_limit: Some(2),
        };
        let err = transition_system(&net, &config).expect_err("cap must trip");
        match err {
            ExploreError::StateSpaceLimit { limit, partial } => {
                assert_eq!(limit, 2);
                assert_eq!(partial.states.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
