//! DOT text generation for the net structure, the reachability graph and
//! the full transition system. Text only; rendering is someone else's job.
use std::fmt::Write as FmtWrite;

use petgraph::dot::{Config, Dot};
use petgraph::stable_graph::NodeIndex;
use rustc_hash::FxHashMap;

use crate::analysis::reachability::{ReachabilityGraph, StateEdge, StateNode};
use crate::analysis::statespace::TransitionSystem;
use crate::net::core::Net;
use crate::net::structure::{ArcKind, Marking};

/// The static net structure: places as circles (`tokens/bound`),
/// transitions as boxes, arcs directed by their kind.
pub fn net_dot(net: &Net) -> String {
    let mut dot = String::new();
    let _ = writeln!(&mut dot, "digraph PetriNet {{");
    let _ = writeln!(&mut dot, "    rankdir=LR;");
    let _ = writeln!(&mut dot, "    node [fontname=\"Helvetica\"];");

    for (place_id, place) in net.places().iter_enumerated() {
        let label = format!(
            "{}\\n{}/{}",
            escape_label(&place.name),
            place.tokens,
            place.bound
        );
        let _ = writeln!(
            &mut dot,
            "    place_{} [label=\"{}\", shape=circle];",
            place_id.0, label
        );
    }
    for (transition_id, transition) in net.transitions().iter_enumerated() {
        let _ = writeln!(
            &mut dot,
            "    trans_{} [label=\"{}\", shape=box];",
            transition_id.0,
            escape_label(&transition.name)
        );
    }
    for arc in net.arcs() {
        match arc.kind {
            ArcKind::Input => {
                let _ = writeln!(
                    &mut dot,
                    "    place_{} -> trans_{};",
                    arc.place.0, arc.transition.0
                );
            }
            ArcKind::Output => {
                let _ = writeln!(
                    &mut dot,
                    "    trans_{} -> place_{};",
                    arc.transition.0, arc.place.0
                );
            }
        }
    }

    let _ = writeln!(&mut dot, "}}");
    dot
}

/// The reachability graph with markings as node labels and transition names
/// as edge labels. Deadlocked states are double-circled.
pub fn reachability_dot(net: &Net, reach: &ReachabilityGraph) -> String {
    let edge_attr = |_: &_, edge: petgraph::stable_graph::EdgeReference<'_, StateEdge>| -> String {
        format!("label=\"{}\"", escape_label(&edge.weight().name))
    };
    let node_attr = |_: &_, (index, node): (NodeIndex, &StateNode)| -> String {
        let mut attrs = format!(
            "label=\"s{}\\n{}\"",
            node.index,
            escape_label(&net.format_marking(&node.marking))
        );
        if reach.deadlocks.contains(&index) {
            attrs.push_str(", shape=doublecircle");
        }
        attrs
    };

    format!(
        "{:?}",
        Dot::with_attr_getters(
            &reach.graph,
            &[Config::EdgeNoLabel, Config::NodeNoLabel],
            &edge_attr,
            &node_attr
        )
    )
}

/// The full bounded transition system: one node per state-space marking
/// (silent ones stay isolated), one edge per relation entry.
pub fn transition_system_dot(net: &Net, system: &TransitionSystem) -> String {
    let mut index: FxHashMap<&Marking, usize> = FxHashMap::default();
    for (idx, state) in system.states.iter().enumerate() {
        index.insert(state, idx);
    }

    let mut dot = String::new();
    let _ = writeln!(&mut dot, "digraph TransitionSystem {{");
    for (idx, state) in system.states.iter().enumerate() {
        let _ = writeln!(
            &mut dot,
            "    s{} [label=\"{}\"];",
            idx,
            escape_label(&net.format_marking(state))
        );
    }
    for firing in &system.relation {
        let (Some(&source), Some(&target)) =
            (index.get(&firing.source), index.get(&firing.target))
        else {
            continue;
        };
        let name = &net.transitions()[firing.transition].name;
        let _ = writeln!(
            &mut dot,
            "    s{} -> s{} [label=\"{}\"];",
            source,
            target,
            escape_label(name)
        );
    }
    let _ = writeln!(&mut dot, "}}");
    dot
}

fn escape_label(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ExploreConfig, transition_system};

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
    fn net_dot_lists_nodes_and_arcs() {
        let dot = net_dot(&one_shot_net());
        assert!(dot.contains("place_0 [label=\"p1\\n1/1\", shape=circle];"));
        assert!(dot.contains("trans_0 [label=\"t1\", shape=box];"));
        assert!(dot.contains("place_0 -> trans_0;"));
        assert!(dot.contains("trans_0 -> place_1;"));
    }

    #[test]
    fn reachability_dot_labels_edges_with_transition_names() {
        let net = one_shot_net();
        let reach = ReachabilityGraph::explore(&net).unwrap();
        let dot = reachability_dot(&net, &reach);
        assert!(dot.contains("label=\"t1\""));
        assert!(dot.contains("[1.p1, 0.p2]"));
        assert!(dot.contains("doublecircle"));
    }

    #[test]
    fn transition_system_dot_keeps_silent_states_isolated() {
        let net = one_shot_net();
        let system = transition_system(&net, &ExploreConfig::default()).unwrap();
        let dot = transition_system_dot(&net, &system);
        // 4 states, one edge
        assert!(dot.contains("s0 [label=\"[0.p1, 0.p2]\"];"));
        assert!(dot.contains("s1 -> s2 [label=\"t1\"];"));
        assert!(!dot.contains("s0 ->"));
        assert!(!dot.contains("-> s0"));
    }
}
