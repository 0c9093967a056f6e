//! Collision resolution through perfectly inelastic mergers
//!
//! When two bodies overlap they merge into a single new body that conserves:
//! - total mass
//! - total momentum
//! - the mass-weighted hue (see [`mix_hues`])
//!
//! The radius of the merged body follows from its mass, so constant density
//! is preserved without tracking volume separately.

use log::{debug, trace};

use crate::simulation::hue::{mix_hues, WeightedHue};
use crate::simulation::states::Body;

/// Merge two bodies into a new one, conserving mass and momentum
pub fn merge_bodies(a: &Body, b: &Body) -> Body {
    let total_mass = a.mass() + b.mass();

    // Center of mass position
    let position = (a.position() * a.mass() + b.position() * b.mass()) / total_mass;

    // Momentum-conserving velocity
    let velocity = (a.velocity() * a.mass() + b.velocity() * b.mass()) / total_mass;

    let hue = mix_hues(
        WeightedHue::new(a.hue(), a.mass()),
        WeightedHue::new(b.hue(), b.mass()),
    );

    Body::new(position, velocity, total_mass, hue)
}

/// One sweep over every unordered pair of bodies.
///
/// Each body takes part in at most one merge per sweep: once `i` has merged
/// the inner loop stops, and bodies already consumed are skipped. Consumed
/// bodies are dropped and the merged ones appended at the end.
///
/// Returns the number of merges performed.
pub fn merge_pass(bodies: &mut Vec<Body>) -> usize {
    let n = bodies.len();
    let mut consumed = vec![false; n];
    let mut merged = Vec::new();

    for i in 0..n {
        if consumed[i] {
            continue;
        }
        for j in (i + 1)..n {
            if consumed[j] {
                continue;
            }
            if bodies[i].overlaps(&bodies[j]) {
                trace!(
                    "merging bodies {i} (m = {:.4}) and {j} (m = {:.4})",
                    bodies[i].mass(),
                    bodies[j].mass()
                );
                merged.push(merge_bodies(&bodies[i], &bodies[j]));
                consumed[i] = true;
                consumed[j] = true;
                break;
            }
        }
    }

    let merges = merged.len();
    if merges > 0 {
        let mut flags = consumed.iter();
        bodies.retain(|_| !flags.next().copied().unwrap_or(false));
        bodies.extend(merged);
    }
    merges
}

/// Repeat [`merge_pass`] until a sweep merges nothing.
///
/// A merged body is larger than either parent and can reach a third body
/// that neither parent touched, so a single sweep is not enough.
///
/// Returns the total number of merges.
pub fn resolve_collisions(bodies: &mut Vec<Body>) -> usize {
    let mut total = 0;
    let mut round = 0;
    loop {
        let merges = merge_pass(bodies);
        if merges == 0 {
            break;
        }
        round += 1;
        total += merges;
        debug!("merge round {round}: {merges} merges, {} bodies left", bodies.len());
    }
    total
}
