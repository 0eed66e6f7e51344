//! Nearest-target selection.
//!
//! An agent may pursue any collectible that nobody is carrying and that is
//! not already banked in its own base. That includes free collectibles and
//! collectibles sitting in the enemy's base. The scan is a single ordered
//! pass with a strict `<` comparison, so the first collectible found at the
//! minimum distance wins and repeated calls against the same slots always
//! return the same pick.

use capture_types::{Collectible, TargetId, TeamId, Vec3};

/// The collectible chosen by [`nearest_target`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPick {
    /// Index of the slot in the snapshot's target list.
    pub slot: usize,
    /// The collectible's id.
    pub id: TargetId,
    /// The collectible's position.
    pub position: Vec3,
    /// Horizontal distance from the searching agent.
    pub distance: f32,
}

/// Whether `team` is allowed to pursue `target`.
pub fn is_pursuable(target: &Collectible, team: TeamId) -> bool {
    target.is_uncarried() && target.in_base != Some(team)
}

/// Find the nearest pursuable collectible within `radius` of `from`.
///
/// Destroyed slots and collectibles with non-finite positions are skipped.
/// Collectibles at exactly `radius` or farther are never selected.
pub fn nearest_target(
    targets: &[Option<Collectible>],
    from: Vec3,
    team: TeamId,
    radius: f32,
) -> Option<TargetPick> {
    let mut best_distance = radius;
    let mut best: Option<TargetPick> = None;

    for (slot, target) in targets.iter().enumerate() {
        let Some(target) = target else {
            continue;
        };
        if !target.position.is_finite() || !is_pursuable(target, team) {
            continue;
        }
        let distance = from.horizontal_distance(target.position);
        if distance < best_distance {
            best_distance = distance;
            best = Some(TargetPick {
                slot,
                id: target.id,
                position: target.position,
                distance,
            });
        }
    }

    best
}
