//! Seeded kinematic arena.
//!
//! A small stand-in for a physics engine: agents slide on a flat
//! square floor at a fixed speed, turn at a fixed rate and stop at the walls.
//! Collectibles are picked up on contact and banked on entering the carrier's
//! own base. A laser freezes the first enemy inside its cone and makes it
//! drop everything it carries.
//!
//! Contacts are edge-triggered: an event is raised on the step an agent
//! starts touching something, not while it keeps touching it.

use std::collections::BTreeSet;

use capture_agents::reward::table::count_as_f32;
use capture_core::clock::EpisodeTimer;
use capture_core::config::ArenaConfig;
use capture_core::controller::{PhysicsSink, WorldSource};
use capture_core::runner::Arena;
use capture_types::geometry::{normalize_degrees, signed_yaw};
use capture_types::{
    AgentId, AgentState, ArenaEvent, Collectible, CombatEvent, ContactEvent, ContactReport,
    HomeBase, MotionIntent, RotateAxis, TargetId, TeamId, Vec3, WorldSnapshot,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::EngineError;

/// Fraction of the half extent at which the bases sit.
const BASE_OFFSET: f32 = 0.75;

/// Spacing between teammates at spawn.
const SPAWN_SPACING: f32 = 6.0;

#[derive(Debug, Clone)]
struct Body {
    state: AgentState,
    intent: MotionIntent,
    freeze_left: f32,
    laser_on: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Touch {
    Wall,
    Target(TargetId),
    Base(TeamId),
    Agent(AgentId),
}

/// The sandbox arena.
#[derive(Debug, Clone)]
pub struct SandboxArena {
    config: ArenaConfig,
    bodies: Vec<Body>,
    targets: Vec<Option<Collectible>>,
    carriers: Vec<Option<AgentId>>,
    bases: Vec<HomeBase>,
    touching: BTreeSet<(AgentId, Touch)>,
}

impl SandboxArena {
    /// Build a two-team arena and lay it out from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the arena configuration is out of
    /// range.
    pub fn new(config: &ArenaConfig, seed: u64) -> Result<Self, EngineError> {
        config.validate()?;
        let teams = [TeamId::new(1), TeamId::new(2)];
        let mut bodies = Vec::new();
        let mut bases = Vec::new();
        for team in teams.into_iter().flatten() {
            bases.push(HomeBase {
                team,
                position: Vec3::ZERO,
                captured: 0,
            });
            for _ in 0..config.agents_per_team {
                bodies.push(Body {
                    state: AgentState::new(AgentId::new(), team, Vec3::ZERO, 0.0),
                    intent: MotionIntent::hold(),
                    freeze_left: 0.0,
                    laser_on: false,
                });
            }
        }
        if bases.len() != teams.len() {
            return Err(EngineError::Arena {
                message: String::from("could not allocate team ids"),
            });
        }

        let mut arena = Self {
            config: config.clone(),
            bodies,
            targets: Vec::new(),
            carriers: Vec::new(),
            bases,
            touching: BTreeSet::new(),
        };
        arena.layout(seed);
        Ok(arena)
    }

    /// Every agent with its team, in spawn order.
    pub fn roster(&self) -> Vec<(AgentId, TeamId)> {
        self.bodies
            .iter()
            .map(|b| (b.state.id, b.state.team))
            .collect()
    }

    fn layout(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let h = self.config.half_extent;

        for base in &mut self.bases {
            let side = if base.team.get() == 1 { -1.0 } else { 1.0 };
            base.position = Vec3::flat(side * BASE_OFFSET * h, 0.0);
            base.captured = 0;
        }

        let (mut first_rank, mut second_rank) = (0_u32, 0_u32);
        for body in &mut self.bodies {
            let first_team = body.state.team.get() == 1;
            let side = if first_team { -1.0 } else { 1.0 };
            let counter = if first_team {
                &mut first_rank
            } else {
                &mut second_rank
            };
            let rank = count_as_f32(*counter);
            *counter = counter.saturating_add(1);

            let x = side * (BASE_OFFSET * h - self.config.base_radius * 2.0);
            body.state.position = Vec3::flat(x, rank * SPAWN_SPACING);
            body.state.yaw = if first_team { 90.0 } else { -90.0 };
            body.state.velocity = Vec3::ZERO;
            body.state.carried = 0;
            body.state.frozen = false;
            body.intent = MotionIntent::hold();
            body.freeze_left = 0.0;
            body.laser_on = false;
        }

        let spread_x = 0.5 * h;
        let spread_z = 0.9 * h;
        self.targets = (0..self.config.target_count)
            .map(|_| {
                let x = rng.random_range(-spread_x..spread_x);
                let z = rng.random_range(-spread_z..spread_z);
                Some(Collectible::free(TargetId::new(), Vec3::flat(x, z)))
            })
            .collect();
        self.carriers = vec![None; self.targets.len()];
        self.touching.clear();
    }

    // -----------------------------------------------------------------------
    // Step phases
    // -----------------------------------------------------------------------

    fn move_bodies(&mut self, dt: f32, touching: &mut BTreeSet<(AgentId, Touch)>) {
        let config = &self.config;
        let h = config.half_extent;
        for body in &mut self.bodies {
            if body.state.frozen {
                body.freeze_left -= dt;
                if body.freeze_left <= 0.0 {
                    body.freeze_left = 0.0;
                    body.state.frozen = false;
                }
                body.state.velocity = Vec3::ZERO;
            } else {
                let turn = match body.intent.rotate {
                    RotateAxis::Hold => 0.0,
                    RotateAxis::Right => 1.0,
                    RotateAxis::Left => -1.0,
                };
                body.state.yaw =
                    normalize_degrees((turn * config.turn_rate).mul_add(dt, body.state.yaw));
                let velocity = body
                    .intent
                    .direction(body.state.yaw)
                    .scaled(config.move_speed);
                let next = body.state.position.offset(velocity, dt);
                body.state.position = Vec3::new(next.x.clamp(-h, h), next.y, next.z.clamp(-h, h));
                body.state.velocity = velocity;
            }
            let p = body.state.position;
            if p.x.abs() >= h || p.z.abs() >= h {
                touching.insert((body.state.id, Touch::Wall));
            }
        }
    }

    fn fire_lasers(&mut self, events: &mut Vec<ArenaEvent>) {
        let config = &self.config;
        let mut hits = Vec::new();
        for shooter in &self.bodies {
            let firing = shooter.intent.laser && !shooter.state.frozen;
            if !firing {
                continue;
            }
            if !shooter.laser_on {
                events.push(ArenaEvent::Combat {
                    agent: shooter.state.id,
                    event: CombatEvent::LaserFired,
                });
            }
            let target = self
                .bodies
                .iter()
                .filter(|v| v.state.team != shooter.state.team && !v.state.frozen)
                .filter(|v| {
                    shooter.state.position.horizontal_distance(v.state.position)
                        <= config.laser_range
                })
                .find(|v| {
                    signed_yaw(shooter.state.position, shooter.state.yaw, v.state.position).abs()
                        <= config.laser_half_angle
                });
            if let Some(victim) = target {
                hits.push((shooter.state.id, victim.state.id));
            }
        }

        for body in &mut self.bodies {
            body.laser_on = body.intent.laser && !body.state.frozen;
        }

        for (shooter, victim) in hits {
            self.freeze(shooter, victim, events);
        }
    }

    fn freeze(&mut self, shooter: AgentId, victim: AgentId, events: &mut Vec<ArenaEvent>) {
        let freeze_seconds = self.config.freeze_seconds;
        let Some(body) = self.bodies.iter_mut().find(|b| b.state.id == victim) else {
            return;
        };
        if body.state.frozen {
            return;
        }
        body.state.frozen = true;
        body.freeze_left = freeze_seconds;
        body.state.velocity = Vec3::ZERO;
        let dropped = body.state.carried;
        body.state.carried = 0;
        let drop_at = body.state.position;

        events.push(ArenaEvent::Combat {
            agent: shooter,
            event: CombatEvent::HitEnemy,
        });
        events.push(ArenaEvent::Combat {
            agent: victim,
            event: CombatEvent::Frozen,
        });

        if dropped > 0 {
            for (slot, carrier) in self.targets.iter_mut().zip(self.carriers.iter_mut()) {
                if *carrier == Some(victim) {
                    *carrier = None;
                    if let Some(target) = slot {
                        target.carried_by = None;
                        target.position = drop_at;
                    }
                }
            }
            events.push(ArenaEvent::Combat {
                agent: victim,
                event: CombatEvent::Dropped { count: dropped },
            });
        }
        debug!(%shooter, %victim, dropped, "laser hit");
    }

    fn carry_targets(&mut self) {
        for (slot, carrier) in self.targets.iter_mut().zip(&self.carriers) {
            let (Some(target), Some(carrier)) = (slot, carrier) else {
                continue;
            };
            if let Some(body) = self.bodies.iter().find(|b| b.state.id == *carrier) {
                target.position = body.state.position;
            }
        }
    }

    fn collect_touches(&self, touching: &mut BTreeSet<(AgentId, Touch)>) {
        let config = &self.config;
        for body in &self.bodies {
            let id = body.state.id;
            let at = body.state.position;

            for (slot, carrier) in self.targets.iter().zip(&self.carriers) {
                let Some(target) = slot else {
                    continue;
                };
                if *carrier == Some(id) {
                    continue;
                }
                if at.horizontal_distance(target.position) <= config.contact_radius {
                    touching.insert((id, Touch::Target(target.id)));
                }
            }

            for base in &self.bases {
                if at.horizontal_distance(base.position) <= config.base_radius {
                    touching.insert((id, Touch::Base(base.team)));
                }
            }

            for other in &self.bodies {
                if other.state.team != body.state.team
                    && at.horizontal_distance(other.state.position) <= config.contact_radius * 2.0
                {
                    touching.insert((id, Touch::Agent(other.state.id)));
                }
            }
        }
    }

    fn enter(&mut self, agent: AgentId, touch: Touch, events: &mut Vec<ArenaEvent>) {
        let Some(body) = self.bodies.iter().find(|b| b.state.id == agent) else {
            return;
        };
        let team = body.state.team;
        let carried = body.state.carried;
        let frozen = body.state.frozen;
        let report = |event| {
            ArenaEvent::Contact(ContactReport {
                agent,
                carried,
                frozen,
                event,
            })
        };

        match touch {
            Touch::Wall => events.push(report(ContactEvent::Wall)),
            Touch::Agent(other) => {
                if let Some(enemy) = self.bodies.iter().find(|b| b.state.id == other) {
                    events.push(report(ContactEvent::Enemy {
                        team: enemy.state.team,
                    }));
                }
            }
            Touch::Target(id) => {
                let Some(target) = self.targets.iter().flatten().find(|t| t.id == id) else {
                    return;
                };
                events.push(report(ContactEvent::Target {
                    carried_by: target.carried_by,
                    in_base: target.in_base,
                }));
                if !frozen {
                    self.pick_up(agent, team, id);
                }
            }
            Touch::Base(base_team) => {
                events.push(report(ContactEvent::Base { team: base_team }));
                if base_team == team && carried > 0 {
                    self.deposit(agent, team);
                }
            }
        }
    }

    fn pick_up(&mut self, agent: AgentId, team: TeamId, id: TargetId) {
        let slots = self.targets.iter_mut().zip(self.carriers.iter_mut());
        let Some((target, carrier)) = slots
            .filter_map(|(slot, carrier)| slot.as_mut().map(|t| (t, carrier)))
            .find(|(t, _)| t.id == id)
        else {
            return;
        };
        if target.carried_by.is_some() || target.in_base == Some(team) {
            return;
        }
        if let Some(owner) = target.in_base.take() {
            if let Some(base) = self.bases.iter_mut().find(|b| b.team == owner) {
                base.captured = base.captured.saturating_sub(1);
            }
        }
        target.carried_by = Some(team);
        *carrier = Some(agent);
        if let Some(body) = self.bodies.iter_mut().find(|b| b.state.id == agent) {
            body.state.carried = body.state.carried.saturating_add(1);
        }
    }

    fn deposit(&mut self, agent: AgentId, team: TeamId) {
        let Some(base) = self.bases.iter_mut().find(|b| b.team == team) else {
            return;
        };
        let mut banked = 0_u32;
        for (slot, carrier) in self.targets.iter_mut().zip(self.carriers.iter_mut()) {
            if *carrier != Some(agent) {
                continue;
            }
            *carrier = None;
            if let Some(target) = slot {
                target.carried_by = None;
                target.in_base = Some(team);
                target.position = base.position;
                banked = banked.saturating_add(1);
            }
        }
        base.captured = base.captured.saturating_add(banked);
        if let Some(body) = self.bodies.iter_mut().find(|b| b.state.id == agent) {
            body.state.carried = 0;
        }
        debug!(%agent, %team, banked, captured = base.captured, "targets deposited");
    }
}

impl WorldSource for SandboxArena {
    fn snapshot(&self, timer: &dyn EpisodeTimer) -> WorldSnapshot {
        WorldSnapshot {
            remaining_time: timer.remaining(),
            agents: self.bodies.iter().map(|b| b.state.clone()).collect(),
            targets: self.targets.clone(),
            bases: self.bases.clone(),
        }
    }
}

impl PhysicsSink for SandboxArena {
    fn submit(&mut self, agent: AgentId, intent: &MotionIntent) {
        if let Some(body) = self.bodies.iter_mut().find(|b| b.state.id == agent) {
            body.intent = *intent;
        }
    }
}

impl Arena for SandboxArena {
    fn step(&mut self, dt: f32) -> Vec<ArenaEvent> {
        let mut events = Vec::new();
        let mut touching = BTreeSet::new();

        self.move_bodies(dt, &mut touching);
        self.fire_lasers(&mut events);
        self.carry_targets();
        self.collect_touches(&mut touching);

        let entered: Vec<(AgentId, Touch)> =
            touching.difference(&self.touching).copied().collect();
        for (agent, touch) in entered {
            self.enter(agent, touch, &mut events);
        }
        self.touching = touching;
        events
    }

    fn reset(&mut self, seed: u64) {
        self.layout(seed);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use capture_core::clock::FixedTimer;
    use capture_core::config::CaptureConfig;
    use capture_core::controller::AgentController;
    use capture_core::decision::StubActionSource;
    use capture_core::runner::{self, EpisodeAgent, NoOpCallback};
    use capture_types::{ForwardAxis, RewardKind};

    use super::*;

    fn arena() -> SandboxArena {
        SandboxArena::new(&ArenaConfig::default(), 7).unwrap()
    }

    fn advance() -> MotionIntent {
        MotionIntent {
            forward: ForwardAxis::Advance,
            ..MotionIntent::hold()
        }
    }

    fn contacts(events: &[ArenaEvent], agent: AgentId) -> Vec<ContactEvent> {
        events
            .iter()
            .filter_map(|e| match e {
                ArenaEvent::Contact(r) if r.agent == agent => Some(r.event),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn layout_is_seeded() {
        let a = SandboxArena::new(&ArenaConfig::default(), 3).unwrap();
        let b = SandboxArena::new(&ArenaConfig::default(), 3).unwrap();
        let pa: Vec<Vec3> = a.targets.iter().flatten().map(|t| t.position).collect();
        let pb: Vec<Vec3> = b.targets.iter().flatten().map(|t| t.position).collect();
        assert_eq!(pa, pb);
        assert_eq!(pa.len(), 8);
        let h = ArenaConfig::default().half_extent;
        assert!(pa.iter().all(|p| p.x.abs() < h && p.z.abs() < h));
    }

    #[test]
    fn roster_has_two_teams() {
        let arena = arena();
        let roster = arena.roster();
        assert_eq!(roster.len(), 2);
        assert_ne!(roster[0].1, roster[1].1);
    }

    #[test]
    fn wall_contact_fires_once_while_pressed() {
        let mut arena = arena();
        let (me, _) = arena.roster()[0];
        arena.targets.clear();
        arena.carriers.clear();
        // Face the nearest (-x) wall and drive into it.
        arena.bodies[0].state.yaw = -90.0;
        arena.submit(me, &advance());
        let mut walls = 0;
        for _ in 0..200 {
            let events = arena.step(0.1);
            walls += contacts(&events, me)
                .iter()
                .filter(|e| matches!(e, ContactEvent::Wall))
                .count();
        }
        assert_eq!(walls, 1);
        assert!(arena.bodies[0].state.position.x >= -arena.config.half_extent);
    }

    #[test]
    fn pickup_then_deposit_keeps_base_counts_consistent() {
        let mut arena = arena();
        let (me, team) = arena.roster()[0];
        let spot = arena.bodies[0].state.position.offset(Vec3::flat(1.0, 0.0), 1.0);
        arena.targets = vec![Some(Collectible::free(TargetId::new(), spot))];
        arena.carriers = vec![None];

        let events = arena.step(0.05);
        assert!(contacts(&events, me)
            .iter()
            .any(|e| matches!(e, ContactEvent::Target { carried_by: None, in_base: None })));
        assert_eq!(arena.bodies[0].state.carried, 1);

        // Teleport into the home base.
        let base = arena.bases.iter().find(|b| b.team == team).unwrap().position;
        arena.bodies[0].state.position = base;
        let events = arena.step(0.05);
        let report = events
            .iter()
            .find_map(|e| match e {
                ArenaEvent::Contact(r) if matches!(r.event, ContactEvent::Base { .. }) => Some(*r),
                _ => None,
            })
            .unwrap();
        assert_eq!(report.carried, 1);
        assert_eq!(arena.bodies[0].state.carried, 0);

        let snap = arena.snapshot(&FixedTimer(10.0));
        assert_eq!(snap.friendly_captured(team), 1);
        assert!(snap.base_counts_consistent());
    }

    #[test]
    fn laser_hit_freezes_and_drops() {
        let mut arena = arena();
        let roster = arena.roster();
        let (shooter, _) = roster[0];
        let (victim, enemy_team) = roster[1];
        arena.targets = vec![Some(Collectible {
            carried_by: Some(enemy_team),
            ..Collectible::free(TargetId::new(), Vec3::ZERO)
        })];
        arena.carriers = vec![Some(victim)];
        arena.bodies[1].state.carried = 1;
        // Victim straight ahead of the shooter, inside laser range.
        arena.bodies[0].state.position = Vec3::ZERO;
        arena.bodies[0].state.yaw = 90.0;
        arena.bodies[1].state.position = Vec3::flat(10.0, 0.0);

        arena.submit(shooter, &MotionIntent { laser: true, ..MotionIntent::hold() });
        let events = arena.step(0.05);

        let combat: Vec<(AgentId, CombatEvent)> = events
            .iter()
            .filter_map(|e| match e {
                ArenaEvent::Combat { agent, event } => Some((*agent, *event)),
                ArenaEvent::Contact(_) => None,
            })
            .collect();
        assert!(combat.contains(&(shooter, CombatEvent::LaserFired)));
        assert!(combat.contains(&(shooter, CombatEvent::HitEnemy)));
        assert!(combat.contains(&(victim, CombatEvent::Frozen)));
        assert!(combat.contains(&(victim, CombatEvent::Dropped { count: 1 })));
        assert!(arena.bodies[1].state.frozen);
        assert_eq!(arena.bodies[1].state.carried, 0);
        assert!(arena.targets[0].as_ref().unwrap().carried_by.is_none());

        // Holding the trigger does not refire.
        let events = arena.step(0.05);
        assert!(!events.iter().any(|e| matches!(
            e,
            ArenaEvent::Combat { event: CombatEvent::LaserFired, .. }
        )));
    }

    #[test]
    fn frozen_agent_thaws() {
        let mut arena = arena();
        arena.bodies[0].state.frozen = true;
        arena.bodies[0].freeze_left = 0.25;
        for _ in 0..3 {
            arena.step(0.1);
        }
        assert!(!arena.bodies[0].state.frozen);
    }

    #[test]
    fn default_episode_collects_targets() {
        let config = CaptureConfig::default();
        let mut arena = SandboxArena::new(&config.arena, config.episode.seed).unwrap();
        let mut clock = config.episode.clock().unwrap();
        let mut agents: Vec<EpisodeAgent> = arena
            .roster()
            .into_iter()
            .map(|(agent, team)| EpisodeAgent {
                controller: AgentController::new(
                    agent,
                    team,
                    config.policy_config(),
                    config.reward_table().unwrap(),
                ),
                source: Box::new(StubActionSource::new()),
            })
            .collect();

        let summary =
            runner::run_episode(&mut arena, &mut clock, &mut agents, &mut NoOpCallback).unwrap();

        let touched: u32 = summary
            .agents
            .iter()
            .filter_map(|a| a.episode_return.counts.get(&RewardKind::TargetContact))
            .sum();
        let banked: u32 = summary.captured.values().sum();
        assert!(touched.saturating_add(banked) > 0, "touched {touched}, banked {banked}");
        let carrying = arena
            .snapshot(&FixedTimer(0.0))
            .targets
            .iter()
            .flatten()
            .any(|t| t.carried_by.is_some() || t.in_base.is_some());
        assert!(carrying);
    }

    #[test]
    fn reset_restores_layout() {
        let mut arena = arena();
        let (me, _) = arena.roster()[0];
        let start = arena.bodies[0].state.position;
        arena.submit(me, &advance());
        for _ in 0..10 {
            arena.step(0.1);
        }
        assert_ne!(arena.bodies[0].state.position, start);
        arena.reset(7);
        assert_eq!(arena.bodies[0].state.position, start);
        assert_eq!(arena.bodies[0].intent, MotionIntent::hold());
    }
}
