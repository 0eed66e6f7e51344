//! Observation assembly.
//!
//! Builds the flat [`Observation`] an agent's action source sees each tick.
//! The layout is fixed (see [`capture_types::perception`]) and the length
//! depends only on the number of target slots, so a missing agent, a missing
//! base or a destroyed collectible is encoded as zeros rather than shortening
//! the vector.

use capture_types::geometry::yaw_quaternion_y;
use capture_types::{AgentId, Collectible, Observation, TeamId, Vec3, WorldSnapshot};

/// Encode an optional team as an observation value (team number or 0).
fn team_value(team: Option<TeamId>) -> f32 {
    f32::from(TeamId::to_wire(team))
}

fn push_vec(values: &mut Vec<f32>, v: Vec3) {
    values.extend([v.x, v.y, v.z]);
}

fn push_target(values: &mut Vec<f32>, target: Option<&Collectible>) {
    match target {
        Some(t) => {
            push_vec(values, t.position);
            values.push(team_value(t.carried_by));
            values.push(team_value(t.in_base));
        }
        None => values.extend([0.0; 5]),
    }
}

/// Build the observation for `agent_id`.
///
/// An agent absent from the snapshot gets an all-zero observation of the
/// correct length.
pub fn observe(world: &WorldSnapshot, agent_id: AgentId) -> Observation {
    let slots = world.targets.len();
    let Some(agent) = world.agent(agent_id) else {
        return Observation::zeroed(slots);
    };

    let mut values = Vec::with_capacity(Observation::expected_len(slots));

    let local_velocity = agent.velocity.to_local(agent.yaw);
    values.push(local_velocity.x);
    values.push(local_velocity.z);
    values.push(world.remaining_time.max(0.0));
    values.push(yaw_quaternion_y(agent.yaw));

    push_vec(&mut values, agent.position);
    let base = world.base_of(agent.team).map_or(Vec3::ZERO, |b| b.position);
    push_vec(&mut values, base);

    for slot in &world.targets {
        push_target(&mut values, slot.as_ref());
    }

    values.push(if agent.frozen { 1.0 } else { 0.0 });

    Observation { values }
}
