use crate::engine::SimulationEngine;
use marsdefense_core::commands::{FrameInput, PlayerCommand, ThrustInput};
use marsdefense_core::components::{EnemyBrain, Kinematics, Vitals};
use marsdefense_core::config::SimConfig;
use marsdefense_core::enums::*;
use marsdefense_core::events::{AudioEvent, CombatEvent};
use marsdefense_core::types::Vec2;

const DT: f64 = 1.0 / 60.0;

fn engine_with_seed(seed: u64) -> SimulationEngine {
    SimulationEngine::new(SimConfig {
        seed,
        ..Default::default()
    })
}

/// Scripted input: strafe left and right, cannon always, bombs every 30 frames.
fn scripted_input(frame: u64) -> FrameInput {
    let mut fire = vec![WeaponSlot::Cannon];
    if frame % 30 == 0 {
        fire.push(WeaponSlot::BreachBomb);
    }
    FrameInput {
        thrust: ThrustInput {
            left: (frame / 90) % 2 == 0,
            right: (frame / 90) % 2 == 1,
            ..Default::default()
        },
        fire,
    }
}

fn player_position(engine: &mut SimulationEngine) -> Vec2 {
    engine
        .snapshot()
        .player
        .map(|p| p.position)
        .unwrap_or_default()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut a = engine_with_seed(12345);
    let mut b = engine_with_seed(12345);

    for frame in 0..900 {
        let input = scripted_input(frame);
        let snap_a = a.tick(&input, DT);
        let snap_b = b.tick(&input, DT);

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged at frame {frame}");
    }
}

#[test]
fn test_different_seeds_diverge() {
    let mut a = engine_with_seed(1);
    let mut b = engine_with_seed(2);

    let mut diverged = false;
    for frame in 0..600 {
        let input = scripted_input(frame);
        let json_a = serde_json::to_string(&a.tick(&input, DT)).unwrap();
        let json_b = serde_json::to_string(&b.tick(&input, DT)).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce different runs");
}

// ---- Frame stepping ----

#[test]
fn test_first_frame_opens_wave_one() {
    let mut engine = engine_with_seed(7);
    let snap = engine.tick(&FrameInput::default(), DT);

    assert_eq!(snap.wave.wave, 1);
    assert_eq!(snap.wave.state, WaveState::Spawning);
    assert!(snap
        .audio_events
        .contains(&AudioEvent::WaveStarted { wave: 1 }));
    assert_eq!(snap.weapons.len(), 5);
    assert!(snap.player.is_some());
    assert_eq!(snap.time.tick, 1);
}

#[test]
fn test_non_positive_dt_does_not_advance() {
    let mut engine = engine_with_seed(7);
    engine.tick(&FrameInput::default(), DT);
    let before = engine.time();

    engine.tick(&FrameInput::default(), 0.0);
    engine.tick(&FrameInput::default(), -0.5);
    engine.tick(&FrameInput::default(), f64::NAN);

    assert_eq!(engine.time(), before);
}

#[test]
fn test_time_scale_stretches_dt() {
    let mut engine = SimulationEngine::new(SimConfig {
        time_scale: 2.0,
        ..Default::default()
    });
    engine.tick(&FrameInput::default(), 0.1);
    assert!((engine.time().elapsed_secs - 0.2).abs() < 1e-12);
}

#[test]
fn test_events_drain_each_frame() {
    let mut engine = engine_with_seed(7);
    let first = engine.tick(&FrameInput::firing(&[WeaponSlot::Cannon]), DT);
    assert!(!first.audio_events.is_empty());

    let second = engine.tick(&FrameInput::default(), DT);
    assert!(!second
        .audio_events
        .contains(&AudioEvent::WaveStarted { wave: 1 }));
    assert!(!second
        .audio_events
        .contains(&AudioEvent::WeaponFired { slot: WeaponSlot::Cannon }));
}

// ---- Phases ----

#[test]
fn test_pause_and_resume() {
    let mut engine = engine_with_seed(7);
    engine.tick(&FrameInput::default(), DT);

    engine.queue_command(PlayerCommand::Pause);
    let snap = engine.tick(&FrameInput::default(), DT);
    assert_eq!(snap.phase, GamePhase::Paused);
    let paused_at = engine.time();

    for _ in 0..10 {
        engine.tick(&FrameInput::firing(&[WeaponSlot::Cannon]), DT);
    }
    assert_eq!(engine.time(), paused_at);
    assert_eq!(engine.projectiles().projectile_count(), 0);

    engine.queue_command(PlayerCommand::Resume);
    let snap = engine.tick(&FrameInput::default(), DT);
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(engine.time().tick, paused_at.tick + 1);
}

#[test]
fn test_player_death_ends_game() {
    let mut engine = engine_with_seed(7);
    engine.tick(&FrameInput::default(), DT);

    let player = engine.player();
    {
        let mut vitals = engine.world_mut().get::<&mut Vitals>(player).unwrap();
        vitals.hp = 0.0;
        vitals.alive = false;
    }

    let snap = engine.tick(&FrameInput::default(), DT);
    assert_eq!(snap.phase, GamePhase::GameOver);

    let finished_at = engine.time();
    engine.queue_command(PlayerCommand::Resume);
    let snap = engine.tick(&FrameInput::firing(&[WeaponSlot::Cannon]), DT);
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert_eq!(engine.time(), finished_at);
}

// ---- Waves ----

#[test]
fn test_cleared_wave_leads_to_next() {
    let mut engine = engine_with_seed(7);
    engine.tick(&FrameInput::default(), DT);
    engine.clear_wave();

    let snap = engine.tick(&FrameInput::default(), DT);
    assert_eq!(snap.wave.state, WaveState::Complete);
    assert!(snap.enemies.is_empty());

    let mut frames = 0;
    while engine.waves().wave < 2 && frames < 400 {
        engine.tick(&FrameInput::default(), DT);
        frames += 1;
    }
    assert_eq!(engine.waves().wave, 2);
    assert_eq!(engine.waves().state, WaveState::Spawning);
    // Three seconds at 60 frames per second, give or take a frame.
    assert!((179..=181).contains(&frames), "took {frames} frames");
}

#[test]
fn test_enemies_spawn_over_time() {
    let mut engine = engine_with_seed(7);
    let mut seen = 0;
    for _ in 0..300 {
        let snap = engine.tick(&FrameInput::default(), DT);
        seen = seen.max(snap.enemies.len());
    }
    assert!(seen >= 2, "expected several enemies, saw {seen}");
}

// ---- Combat ----

#[test]
fn test_bombs_kill_enemy_and_award_experience() {
    let mut engine = engine_with_seed(7);
    engine.tick(&FrameInput::default(), DT);
    engine.clear_wave();

    let ship = player_position(&mut engine);
    engine.spawn_test_enemy(EnemyType::Fighter, 1, Vec2::new(ship.x, ship.y - 250.0));

    let mut kill_seen = false;
    for _ in 0..600 {
        let snap = engine.tick(
            &FrameInput::firing(&[WeaponSlot::Cannon, WeaponSlot::BreachBomb]),
            DT,
        );
        if snap
            .combat_events
            .iter()
            .any(|e| matches!(e, CombatEvent::Kill { enemy_type: EnemyType::Fighter, .. }))
        {
            kill_seen = true;
            break;
        }
    }

    assert!(kill_seen, "the fighter should have been destroyed");
    let progression = engine.progression();
    assert!(progression.kills >= 1);
    assert!(progression.exp > 0 || progression.level > 1);
}

#[test]
fn test_enemy_fire_drains_shield_before_hull() {
    let mut engine = engine_with_seed(21);
    let first = engine.tick(&FrameInput::default(), DT);
    engine.clear_wave();
    let ship = first.player.unwrap();

    // A scout hovering above the ship with its fire window open.
    let above = ship.position - Vec2::new(0.0, 150.0);
    let scout = engine.spawn_test_enemy(EnemyType::Scout, 1, above);
    engine.world_mut().get::<&mut Kinematics>(scout).unwrap().velocity = Vec2::ZERO;
    engine.world_mut().get::<&mut EnemyBrain>(scout).unwrap().fire_timer = 0.0;

    let mut hit = None;
    for _ in 0..300 {
        let snap = engine.tick(&FrameInput::default(), DT);
        let player = snap.player.unwrap();
        if player.shield < player.max_shield {
            hit = Some((player, snap.combat_events));
            break;
        }
    }

    let (player, events) = hit.expect("the scout should have hit the ship");
    assert_eq!(player.hp, player.max_hp);
    assert!(player.shield > 0.0);
    assert!(events.iter().any(|e| matches!(
        e,
        CombatEvent::Hit {
            on_player: true,
            kind: DamageKind::Kinetic,
            ..
        }
    )));
}

#[test]
fn test_overcharge_sets_buff() {
    let mut engine = engine_with_seed(7);
    let snap = engine.tick(&FrameInput::firing(&[WeaponSlot::Overcharge]), DT);

    let player = snap.player.unwrap();
    assert!((player.overcharge_secs - 5.0).abs() < 1e-9);
    let overcharge = snap
        .weapons
        .iter()
        .find(|w| w.slot == WeaponSlot::Overcharge)
        .unwrap();
    assert_eq!(overcharge.state, WeaponState::Cooling);
}

#[test]
fn test_cannon_builds_heat() {
    let mut engine = engine_with_seed(7);
    let snap = engine.tick(&FrameInput::firing(&[WeaponSlot::Cannon]), DT);

    let cannon = snap
        .weapons
        .iter()
        .find(|w| w.slot == WeaponSlot::Cannon)
        .unwrap();
    assert!(cannon.heat.unwrap() > 0.0);
    assert_eq!(snap.projectiles.len(), 2);
}

// ---- Commands ----

#[test]
fn test_equip_bomb_rejects_unknown_level() {
    let mut engine = engine_with_seed(7);
    engine.queue_command(PlayerCommand::EquipBomb {
        level: 999,
        rarity: Rarity::Common,
    });
    let snap = engine.tick(&FrameInput::default(), DT);
    assert_eq!(snap.progression.bomb_level, 1);

    engine.queue_command(PlayerCommand::EquipBomb {
        level: 3,
        rarity: Rarity::Rare,
    });
    let snap = engine.tick(&FrameInput::default(), DT);
    assert_eq!(snap.progression.bomb_level, 3);
    assert_eq!(snap.progression.bomb_rarity, Rarity::Rare);
}

#[test]
fn test_upgrade_cannon_bounds() {
    let mut engine = engine_with_seed(7);
    engine.queue_command(PlayerCommand::UpgradeCannon {
        level: 0,
        rarity: Rarity::Common,
    });
    engine.queue_command(PlayerCommand::UpgradeCannon {
        level: 5,
        rarity: Rarity::Epic,
    });
    engine.tick(&FrameInput::default(), DT);

    let player = engine.player();
    let loadout = engine
        .world()
        .get::<&crate::weapons::ShipLoadout>(player)
        .unwrap();
    assert_eq!(loadout.cannon.level, 5);
    assert_eq!(loadout.cannon.rarity, Rarity::Epic);
}

#[test]
fn test_shield_allocation_raises_capacity() {
    let mut engine = engine_with_seed(7);
    let snap = engine.tick(&FrameInput::default(), DT);
    assert!((snap.player.unwrap().max_shield - 15_000.0).abs() < 1e-9);

    engine.progression_mut().stat_points = 1;
    engine.queue_command(PlayerCommand::AllocateStat {
        attribute: Attribute::Shield,
    });
    let snap = engine.tick(&FrameInput::default(), DT);
    assert_eq!(snap.progression.shield, 2);
    assert_eq!(snap.progression.stat_points, 0);
    assert!((snap.player.unwrap().max_shield - 15_500.0).abs() < 1e-9);
}

#[test]
fn test_shield_boost_perk() {
    let mut engine = engine_with_seed(7);
    engine.progression_mut().scrap = 40;
    engine.queue_command(PlayerCommand::PurchasePerk {
        perk: Perk::ShieldBoost,
    });
    let snap = engine.tick(&FrameInput::default(), DT);

    assert_eq!(snap.progression.scrap, 0);
    assert_eq!(snap.progression.perks, vec![Perk::ShieldBoost]);
    assert!((snap.player.unwrap().max_shield - 22_500.0).abs() < 1e-9);
}

#[test]
fn test_rejected_command_changes_nothing() {
    let mut engine = engine_with_seed(7);
    engine.queue_command(PlayerCommand::PurchasePerk {
        perk: Perk::RapidReload,
    });
    engine.queue_command(PlayerCommand::AllocateStat {
        attribute: Attribute::Attack,
    });
    let snap = engine.tick(&FrameInput::default(), DT);

    assert!(snap.progression.perks.is_empty());
    assert_eq!(snap.progression.attack, 1);
    assert_eq!(snap.phase, GamePhase::Active);
}
