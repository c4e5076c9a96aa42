//! Breadth-first exploration of the marking graph.
use std::collections::VecDeque;
use std::collections::hash_map::Entry;

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::analysis::{ExploreConfig, ExploreError, Firing};
use crate::net::core::Net;
use crate::net::ids::TransitionId;
use crate::net::structure::Marking;

/// One discovered marking. `enabled` is filled in when the state is
/// expanded; states left unexpanded by a capped run keep it empty.
#[derive(Debug, Clone)]
pub struct StateNode {
    pub index: usize,
    pub marking: Marking,
    pub enabled: Vec<TransitionId>,
}

impl StateNode {
    fn new(index: usize, marking: Marking) -> Self {
        Self {
            index,
            marking,
            enabled: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StateEdge {
    pub transition: TransitionId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct StateGraphStats {
    pub state_count: usize,
    pub edge_count: usize,
    pub deadlock_count: usize,
}

/// The marking graph reachable from one initial marking.
///
/// Discovery follows BFS enqueue order with first-seen-wins deduplication;
/// for a given source state, edges appear in the order transitions were
/// declared on the net. Both orders are deterministic.
#[derive(Debug)]
pub struct ReachabilityGraph {
    pub graph: StableGraph<StateNode, StateEdge>,
    pub initial: NodeIndex,
    pub markings: FxHashMap<Marking, NodeIndex>,
    pub deadlocks: FxHashSet<NodeIndex>,
}

impl ReachabilityGraph {
    /// Explores from the net's own initial marking with default limits.
    pub fn explore(net: &Net) -> Result<Self, ExploreError> {
        Self::explore_from(net, net.initial_marking(), &ExploreConfig::default())
    }

    /// Explores from `initial`, which must be a marking over `net`'s places.
    pub fn explore_from(
        net: &Net,
        initial: Marking,
        config: &ExploreConfig,
    ) -> Result<Self, ExploreError> {
        debug_assert_eq!(initial.len(), net.places_len());

        let mut graph = StableGraph::new();
        let mut markings: FxHashMap<Marking, NodeIndex> = FxHashMap::default();
        let mut deadlocks = FxHashSet::default();
        let mut queue = VecDeque::new();
        let mut truncated = false;

        let initial_index = graph.add_node(StateNode::new(0, initial.clone()));
        markings.insert(initial, initial_index);
        queue.push_back(initial_index);

        'bfs: while let Some(state) = queue.pop_front() {
            let current = graph[state].marking.clone();
            let enabled = net.enabled_transitions(&current);
            if enabled.is_empty() {
                deadlocks.insert(state);
                continue;
            }
            graph[state].enabled = enabled.clone();

            for transition in enabled {
                // enabled above, so the fire cannot fail
                let Ok(next) = net.fire(transition, &current) else {
                    continue;
                };
                let target = match markings.entry(next.clone()) {
                    Entry::Occupied(entry) => *entry.get(),
                    Entry::Vacant(entry) => {
                        if let Some(limit) = config.state_limit {
                            if graph.node_count() >= limit {
                                truncated = true;
                                break 'bfs;
                            }
                        }
                        let index = graph.add_node(StateNode::new(graph.node_count(), next));
                        entry.insert(index);
                        queue.push_back(index);
                        index
                    }
                };
                graph.add_edge(
                    state,
                    target,
                    StateEdge {
                        transition,
                        name: net.transitions()[transition].name.clone(),
                    },
                );
            }
        }

        log::debug!(
            "reachability: {} states, {} edges, {} deadlocks{}",
            graph.node_count(),
            graph.edge_count(),
            deadlocks.len(),
            if truncated { " (capped)" } else { "" }
        );

        let result = Self {
            graph,
            initial: initial_index,
            markings,
            deadlocks,
        };
        if truncated {
            return Err(ExploreError::ReachabilityLimit {
                // state_limit is Some whenever truncated got set
                limit: config.state_limit.unwrap_or_default(),
                partial: Box::new(result),
            });
        }
        Ok(result)
    }

    /// Discovered markings in BFS discovery order.
    pub fn states(&self) -> impl Iterator<Item = &Marking> {
        self.graph.node_weights().map(|node| &node.marking)
    }

    /// The emitted `(marking, transition, marking')` edges as plain data.
    pub fn firings(&self) -> Vec<Firing> {
        self.graph
            .edge_references()
            .map(|edge| Firing {
                source: self.graph[edge.source()].marking.clone(),
                transition: edge.weight().transition,
                target: self.graph[edge.target()].marking.clone(),
            })
            .collect()
    }

    pub fn contains_marking(&self, marking: &Marking) -> bool {
        self.markings.contains_key(marking)
    }

    pub fn node(&self, index: NodeIndex) -> &StateNode {
        &self.graph[index]
    }

    pub fn stats(&self) -> StateGraphStats {
        StateGraphStats {
            state_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            deadlock_count: self.deadlocks.len(),
        }
    }
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

    fn cycle_net() -> Net {
        let mut net = Net::new(1);
        net.add_place_with_tokens("p1", 1).unwrap();
        net.add_place("p2").unwrap();
        net.add_transition("fwd").unwrap();
        net.add_transition("back").unwrap();
        net.add_arc("p1", "fwd", ArcKind::Input).unwrap();
        net.add_arc("p2", "fwd", ArcKind::Output).unwrap();
        net.add_arc("p2", "back", ArcKind::Input).unwrap();
        net.add_arc("p1", "back", ArcKind::Output).unwrap();
        net
    }

    #[test]
    fn one_shot_reaches_two_states() {
        let net = one_shot_net();
        let t1 = net.transition_id("t1").unwrap();
        let graph = ReachabilityGraph::explore(&net).unwrap();

        let states: Vec<_> = graph.states().cloned().collect();
        assert_eq!(
            states,
            vec![Marking::from(vec![1, 0]), Marking::from(vec![0, 1])]
        );
        assert_eq!(
            graph.firings(),
            vec![Firing {
                source: Marking::from(vec![1, 0]),
                transition: t1,
                target: Marking::from(vec![0, 1]),
            }]
        );
        // [0,1] has no enabled transition
        assert_eq!(graph.stats().deadlock_count, 1);
    }

    #[test]
    fn revisited_markings_are_not_duplicated() {
        let net = cycle_net();
        let graph = ReachabilityGraph::explore(&net).unwrap();

        assert_eq!(graph.stats().state_count, 2);
        assert_eq!(graph.stats().edge_count, 2);
        assert_eq!(graph.stats().deadlock_count, 0);

        // firing is a function: one target per (source, transition) pair
        let firings = graph.firings();
        let mut pairs: Vec<_> = firings
            .iter()
            .map(|f| (f.source.clone(), f.transition))
            .collect();
        pairs.sort_by_key(|(_, t)| *t);
        pairs.dedup();
        assert_eq!(pairs.len(), firings.len());
    }

    #[test]
    fn state_limit_reports_partial_graph() {
        let net = cycle_net();
        let config = ExploreConfig {
            state_limit: Some(1),
        };
        let err = ReachabilityGraph::explore_from(&net, net.initial_marking(), &config)
            .expect_err("cap must trip");
        match err {
            ExploreError::ReachabilityLimit { limit, partial } => {
                assert_eq!(limit, 1);
                assert_eq!(partial.stats().state_count, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn exploration_can_start_from_a_parsed_marking() {
        let net = cycle_net();
        let start = net.parse_marking("[1.p2]").unwrap();
        let graph =
            ReachabilityGraph::explore_from(&net, start, &ExploreConfig::default()).unwrap();
        assert!(graph.contains_marking(&Marking::from(vec![1, 0])));
        assert!(graph.contains_marking(&Marking::from(vec![0, 1])));
    }
}
