//! Structural union of two nets keyed by transition name identity.
use rustc_hash::FxHashSet;

use crate::net::core::{Net, NetError};
use crate::net::ids::{PlaceId, TransitionId};
use crate::net::structure::ArcKind;

/// Merges `a` and `b` into a brand-new net, leaving both inputs untouched.
///
/// Transitions are matched by name: a name present in both nets becomes one
/// merged transition carrying the union of both arc sets; a name present in
/// only one net is copied as-is. Places are deduplicated by name, so every
/// arc that mentions "the same" place converges on a single place in the
/// merged net. Identical arcs (same place, transition and direction) are
/// kept once, which makes the merge idempotent.
///
/// No compatibility check is run when a shared transition name carries
/// different arc structures in the two nets; "union of arcs" is the whole
/// conflict policy. The merged net takes `a`'s bound and starts with the
/// all-zero marking; the caller sets the marking it wants.
pub fn merge(a: &Net, b: &Net) -> Result<Net, NetError> {
    let mut merged = Net::new(a.bound());
    let mut arc_seen: FxHashSet<(PlaceId, TransitionId, ArcKind)> = FxHashSet::default();

    for transition in a.transitions().iter() {
        merged.add_transition(transition.name.clone())?;
        copy_transition_arcs(&mut merged, &mut arc_seen, a, &transition.name)?;
        if b.transition_id(&transition.name).is_some() {
            copy_transition_arcs(&mut merged, &mut arc_seen, b, &transition.name)?;
        }
    }
    for transition in b.transitions().iter() {
        if a.transition_id(&transition.name).is_some() {
            continue;
        }
        merged.add_transition(transition.name.clone())?;
        copy_transition_arcs(&mut merged, &mut arc_seen, b, &transition.name)?;
    }

    log::debug!(
        "merged nets: {} places, {} transitions, {} arcs",
        merged.places_len(),
        merged.transitions_len(),
        merged.arcs().len()
    );
    Ok(merged)
}

/// Copies the arcs of `transition` (looked up by name in `source`) onto the
/// same-named transition of `merged`, reusing merged places by name.
fn copy_transition_arcs(
    merged: &mut Net,
    arc_seen: &mut FxHashSet<(PlaceId, TransitionId, ArcKind)>,
    source: &Net,
    transition: &str,
) -> Result<(), NetError> {
    let source_id = source
        .transition_id(transition)
        .ok_or_else(|| NetError::UnknownTransition(transition.to_owned()))?;
    let merged_id = merged
        .transition_id(transition)
        .ok_or_else(|| NetError::UnknownTransition(transition.to_owned()))?;
    let endpoints = &source.transitions()[source_id];
    for (kind, places) in [
        (ArcKind::Input, &endpoints.inputs),
        (ArcKind::Output, &endpoints.outputs),
    ] {
        for &place in places {
            let name = source.places()[place].name.as_str();
            let merged_place = match merged.place_id(name) {
                Some(existing) => existing,
                None => merged.add_place(name.to_owned())?,
            };
            if arc_seen.insert((merged_place, merged_id, kind)) {
                merged.add_arc(name, transition, kind)?;
            }
        }
    }
    Ok(())
}
