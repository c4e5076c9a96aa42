//! `ptn`: load a net description, run the analyses, dump the artifacts.
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use itertools::Itertools;

use ptnet::analysis::{ExploreError, ReachabilityGraph, TransitionSystem, transition_system};
use ptnet::config::AnalysisConfig;
use ptnet::dot;
use ptnet::net::{ArcKind, Net, io};

fn make_parser() -> Command {
    Command::new("ptn")
        .about("Bounded place/transition net analyzer")
        .arg(
            Arg::new("net")
                .required(true)
                .help("Net description file (.json or .ron)"),
        )
        .arg(
            Arg::new("marking")
                .short('m')
                .long("marking")
                .help("Initial marking, e.g. \"[1.p1, 0.p2]\""),
        )
        .arg(
            Arg::new("limit")
                .short('l')
                .long("state-limit")
                .value_parser(clap::value_parser!(usize))
                .help("Cap on markings visited per analysis"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .default_value("ptnet.toml"),
        )
        .arg(
            Arg::new("dot")
                .long("dot")
                .action(ArgAction::SetTrue)
                .help("Emit DOT instead of text"),
        )
}

fn main() -> Result<()> {
    env_logger::init();
    let matches = make_parser().get_matches();
    let net_path = matches
        .get_one::<String>("net")
        .context("missing net file argument")?;
    let config_path = matches
        .get_one::<String>("config")
        .context("missing config path")?;
    let config = AnalysisConfig::load_from_file(config_path)?;

    let mut net: Net = if net_path.ends_with(".ron") {
        io::read_ron(net_path)
    } else {
        io::read_json(net_path)
    }
    .with_context(|| format!("failed to load net from {net_path}"))?;

    if let Some(text) = matches.get_one::<String>("marking") {
        let marking = net.parse_marking(text)?;
        net.set_marking(&marking)?;
    }

    let mut explore = config.explore();
    if let Some(&limit) = matches.get_one::<usize>("limit") {
        explore.state_limit = Some(limit);
    }

    let reach = match ReachabilityGraph::explore_from(&net, net.initial_marking(), &explore) {
        Ok(graph) => graph,
        Err(ExploreError::ReachabilityLimit { limit, partial }) => {
            log::warn!("reachability capped at {limit} states; output is incomplete");
            *partial
        }
        Err(other) => return Err(other.into()),
    };
    let system = match transition_system(&net, &explore) {
        Ok(system) => system,
        Err(ExploreError::StateSpaceLimit { limit, partial }) => {
            log::warn!("state space capped at {limit} states; output is incomplete");
            *partial
        }
        Err(other) => return Err(other.into()),
    };

    if matches.get_flag("dot") {
        print!("{}", dot::net_dot(&net));
        print!("{}", dot::reachability_dot(&net, &reach));
        print!("{}", dot::transition_system_dot(&net, &system));
    } else {
        print_definition(&net);
        print_reachability(&net, &reach);
        print_transition_system(&net, &system);
    }
    Ok(())
}

fn print_definition(net: &Net) {
    println!("Definition of the given Petri net:");
    println!("P = {{{}}}", net.places().iter().map(|p| &p.name).join(", "));
    println!(
        "T = {{{}}}",
        net.transitions().iter().map(|t| &t.name).join(", ")
    );
    let arcs = net
        .arcs()
        .iter()
        .map(|arc| {
            let place = &net.places()[arc.place].name;
            let transition = &net.transitions()[arc.transition].name;
            match arc.kind {
                ArcKind::Input => format!("({place}, {transition})"),
                ArcKind::Output => format!("({transition}, {place})"),
            }
        })
        .join(", ");
    println!("F = {{{arcs}}}");
    println!(
        "Initial Marking = {}",
        net.format_marking(&net.initial_marking())
    );
}

fn print_reachability(net: &Net, reach: &ReachabilityGraph) {
    println!(
        "\nReachability from {}:",
        net.format_marking(&net.initial_marking())
    );
    for firing in reach.firings() {
        let name = &net.transitions()[firing.transition].name;
        println!("{}---{}--->{}", firing.source, name, firing.target);
    }
    let stats = reach.stats();
    println!(
        "{} states, {} edges, {} deadlocks",
        stats.state_count, stats.edge_count, stats.deadlock_count
    );
}

fn print_transition_system(net: &Net, system: &TransitionSystem) {
    println!("\nS = {} states (full bounded space)", system.states.len());
    let relation = system
        .relation
        .iter()
        .map(|firing| {
            let name = &net.transitions()[firing.transition].name;
            format!("({},{},{})", firing.source, name, firing.target)
        })
        .join(", ");
    println!("TR = {{{relation}}}");
    println!(
        "Silent markings: {{{}}}",
        system.silent.iter().map(ToString::to_string).join(", ")
    );
}
