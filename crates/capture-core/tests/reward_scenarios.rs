//! End-to-end reward scenarios for a single controller.
//!
//! Each test builds a small arena snapshot by hand, drives an
//! [`AgentController`] through one or more ticks against a [`MotionBuffer`]
//! and checks the recorded rewards and submitted motion.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::indexing_slicing
)]

use capture_agents::{PolicyConfig, RewardTable};
use capture_core::clock::{EpisodeTimer, FixedTimer};
use capture_core::config::CaptureConfig;
use capture_core::controller::{AgentController, MotionBuffer};
use capture_types::{
    ActionVector, AgentId, AgentState, Collectible, CombatEvent, ContactEvent, ContactReport,
    ForwardAxis, HomeBase, Phase, RewardKind, RotateAxis, TargetId, TeamId, Vec3, WorldSnapshot,
};

const EPS: f32 = 1e-4;

fn team(raw: u8) -> TeamId {
    TeamId::new(raw).expect("non-zero team")
}

fn approx(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

/// Home team agent at the origin facing `+z`; the home base lies behind it,
/// a free target lies ahead, the enemy sits `enemy_distance` to the right.
struct Scenario {
    me: AgentId,
    world: WorldSnapshot,
}

impl Scenario {
    fn new(remaining: f32, carried: u32, enemy_distance: f32) -> Self {
        let me = AgentId::new();
        let mut agent = AgentState::new(me, team(1), Vec3::ZERO, 0.0);
        agent.carried = carried;
        let enemy = AgentState::new(
            AgentId::new(),
            team(2),
            Vec3::flat(enemy_distance, 0.0),
            180.0,
        );
        let timer = FixedTimer(remaining);
        Self {
            me,
            world: WorldSnapshot {
                remaining_time: timer.remaining(),
                agents: vec![agent, enemy],
                targets: vec![
                    Some(Collectible::free(TargetId::new(), Vec3::flat(0.0, 25.0))),
                    Some(Collectible::free(TargetId::new(), Vec3::flat(-40.0, 60.0))),
                ],
                bases: vec![
                    HomeBase {
                        team: team(1),
                        position: Vec3::flat(0.0, -70.0),
                        captured: 0,
                    },
                    HomeBase {
                        team: team(2),
                        position: Vec3::flat(0.0, 140.0),
                        captured: 0,
                    },
                ],
            },
        }
    }

    fn controller(&self) -> AgentController {
        AgentController::new(
            self.me,
            team(1),
            PolicyConfig::default(),
            RewardTable::default(),
        )
    }
}

#[test]
fn early_phase_empty_handed_seeks_nearest_target() {
    let s = Scenario::new(90.0, 0, 100.0);
    let mut ctl = s.controller();
    let mut physics = MotionBuffer::new();

    let report = ctl.tick(&s.world, &ActionVector::hold(), &mut physics);

    assert_eq!(report.phase, Some(Phase::Early));
    assert_eq!(report.target.map(|t| t.slot), Some(0));
    assert_eq!(report.intent.forward, ForwardAxis::Advance);
    assert!(!report.rewards.iter().any(|r| r.kind == RewardKind::GreedyCarry));
    assert!(!report.rewards.iter().any(|r| r.kind == RewardKind::CarryPerTarget));
    approx(report.reward, -0.1);
}

#[test]
fn early_phase_greedy_agent_is_penalised_and_heads_home() {
    let s = Scenario::new(90.0, 3, 100.0);
    let mut ctl = s.controller();
    let mut physics = MotionBuffer::new();

    let report = ctl.tick(&s.world, &ActionVector::hold(), &mut physics);

    approx(report.reward, -5.0 + 3.0 - 0.1);
    // Base is straight behind: turn in place.
    assert_eq!(report.intent.forward, ForwardAxis::Hold);
    assert_eq!(report.intent.rotate, RotateAxis::Right);
    assert_eq!(physics.last_for(s.me), Some(report.intent));
}

#[test]
fn late_phase_distant_enemy_skips_greedy_penalty() {
    let s = Scenario::new(30.0, 3, 50.0);
    let mut ctl = s.controller();
    let mut physics = MotionBuffer::new();

    let report = ctl.tick(&s.world, &ActionVector::hold(), &mut physics);

    assert_eq!(report.phase, Some(Phase::Late));
    approx(report.reward, 3.0 - 0.1);
    assert_eq!(report.intent.rotate, RotateAxis::Right);
}

#[test]
fn late_phase_close_enemy_applies_greedy_penalty() {
    let s = Scenario::new(30.0, 3, 25.0);
    let mut ctl = s.controller();
    let mut physics = MotionBuffer::new();

    let report = ctl.tick(&s.world, &ActionVector::hold(), &mut physics);

    approx(report.reward, -5.0 + 3.0 - 0.1);
}

#[test]
fn wall_contact_costs_one_in_any_state() {
    for (carried, frozen) in [(0, false), (3, false), (0, true), (5, true)] {
        let s = Scenario::new(45.0, carried, 100.0);
        let mut ctl = s.controller();
        let reward = ctl
            .on_contact(&ContactReport {
                agent: s.me,
                carried,
                frozen,
                event: ContactEvent::Wall,
            })
            .expect("wall always scores");
        approx(reward.magnitude, -1.0);
        approx(ctl.cumulative_reward(), -1.0);
    }
}

#[test]
fn linear_carry_reward_across_counts() {
    for carried in 1..=2_u32 {
        let s = Scenario::new(90.0, carried, 100.0);
        let mut ctl = s.controller();
        let mut physics = MotionBuffer::new();
        let report = ctl.tick(&s.world, &ActionVector::hold(), &mut physics);
        let carry: f32 = report
            .rewards
            .iter()
            .filter(|r| r.kind == RewardKind::CarryPerTarget)
            .map(|r| r.magnitude)
            .sum();
        approx(carry, f32::from(u8::try_from(carried).unwrap()));
    }
}

#[test]
fn team_lead_flips_the_standing_reward() {
    let mut s = Scenario::new(90.0, 0, 100.0);
    let mut banked = Collectible::free(TargetId::new(), Vec3::flat(0.0, -70.0));
    banked.in_base = Some(team(1));
    s.world.targets.push(Some(banked));
    s.world.bases[0].captured = 1;

    let mut ctl = s.controller();
    let mut physics = MotionBuffer::new();
    let report = ctl.tick(&s.world, &ActionVector::hold(), &mut physics);

    assert!(report.rewards.iter().any(|r| r.kind == RewardKind::TeamLeading));
    approx(report.reward, 0.5);
}

#[test]
fn steals_from_enemy_base_are_pursued() {
    let mut s = Scenario::new(30.0, 0, 100.0);
    // Only collectible left sits in the enemy base.
    let mut stolen = Collectible::free(TargetId::new(), Vec3::flat(0.0, 140.0));
    stolen.in_base = Some(team(2));
    s.world.targets = vec![Some(stolen)];
    s.world.bases[1].captured = 1;

    let mut ctl = s.controller();
    let mut physics = MotionBuffer::new();
    let report = ctl.tick(&s.world, &ActionVector::hold(), &mut physics);

    assert_eq!(report.target.map(|t| t.slot), Some(0));
    assert_eq!(report.intent.forward, ForwardAxis::Advance);
    assert!(report.rewards.iter().any(|r| r.kind == RewardKind::TeamTrailing));
}

#[test]
fn deposit_then_visit_empty() {
    let s = Scenario::new(70.0, 2, 100.0);
    let mut ctl = s.controller();

    let deposit = ctl
        .on_contact(&ContactReport {
            agent: s.me,
            carried: 2,
            frozen: false,
            event: ContactEvent::Base { team: team(1) },
        })
        .unwrap();
    assert_eq!(deposit.kind, RewardKind::BaseDeposit);

    let visit = ctl
        .on_contact(&ContactReport {
            agent: s.me,
            carried: 0,
            frozen: false,
            event: ContactEvent::Base { team: team(1) },
        })
        .unwrap();
    assert_eq!(visit.kind, RewardKind::EmptyBaseVisit);
    approx(ctl.cumulative_reward(), 1.0 - 0.1);
}

#[test]
fn combat_outcomes_use_configured_table() {
    let config = CaptureConfig::parse("rewards:\n  frozen: -2.0\n  hit_enemy: 0.5\n").unwrap();
    let me = AgentId::new();
    let mut ctl = AgentController::new(
        me,
        team(1),
        config.policy_config(),
        config.reward_table().unwrap(),
    );
    approx(ctl.on_combat(&CombatEvent::Frozen).unwrap().magnitude, -2.0);
    approx(ctl.on_combat(&CombatEvent::HitEnemy).unwrap().magnitude, 0.5);
    approx(ctl.on_combat(&CombatEvent::LaserFired).unwrap().magnitude, -1.0);
    approx(ctl.cumulative_reward(), -2.5);
}

#[test]
fn episode_return_breakdown_serialises() {
    let s = Scenario::new(90.0, 3, 100.0);
    let mut ctl = s.controller();
    let mut physics = MotionBuffer::new();
    ctl.tick(&s.world, &ActionVector::hold(), &mut physics);
    ctl.tick(&s.world, &ActionVector::hold(), &mut physics);

    let ret = ctl.end_episode();
    approx(ret.cumulative, 2.0 * (-5.0 + 3.0 - 0.1));
    assert_eq!(ret.counts.get(&RewardKind::GreedyCarry), Some(&2));

    let json = serde_json::to_value(&ret).unwrap();
    assert!(json["totals"]["greedy_carry"].is_number());
    assert_eq!(json["counts"]["carry_per_target"], 2);

    // Nothing leaks into the next episode.
    approx(ctl.cumulative_reward(), 0.0);
    assert_eq!(ctl.ticks(), 0);
}
