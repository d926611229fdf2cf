//! Weapon instances, player loadout and enemy arsenals.
//!
//! Every weapon is a [`WeaponInstance`]: a Ready ⇄ Cooling state machine
//! driven by `now` and the owner's fire-rate multiplier, with optional heat
//! and ammunition gates. Loadouts translate a successful fire into launch
//! parameters and hand projectiles to the [`ProjectileSystem`].

use rand::Rng;

use marsdefense_core::components::StatModifiers;
use marsdefense_core::constants::*;
use marsdefense_core::enums::{EnemyType, Rarity, WeaponSlot, WeaponState};
use marsdefense_core::state::WeaponView;
use marsdefense_core::types::{direction, Vec2};
use marsdefense_core::weapons_db::{
    energy_weapon, kinetic_round, BombStats, EnergyWeaponSpec, EnergyWeaponType, KineticRound,
    KineticRoundType,
};

use marsdefense_enemy_ai::profiles::{loadout, EnemyWeaponSpec};

use crate::damage_model::Warhead;
use crate::projectiles::{BeamSpec, ProjectileSystem, ShotSpec};

/// Why a weapon refused to fire. Expected control flow, not a failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireRejection {
    Cooling { remaining: f64 },
    Overheated,
    OutOfAmmo,
}

/// Heat accumulation for rapid-fire weapons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatGauge {
    pub heat: f64,
    pub max_heat: f64,
    pub per_shot: f64,
    /// Heat shed per second.
    pub cooling_rate: f64,
}

impl HeatGauge {
    pub fn overheated(&self) -> bool {
        self.heat >= self.max_heat
    }
}

/// Cooldown-gated firing state owned by an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponInstance {
    /// Seconds between shots at a fire-rate multiplier of 1.
    pub fire_interval: f64,
    /// `None` until the first shot.
    pub last_fire_time: Option<f64>,
    pub heat: Option<HeatGauge>,
    /// `None` for unlimited ammunition.
    pub ammo: Option<u32>,
}

impl WeaponInstance {
    pub fn new(fire_interval: f64) -> Self {
        assert!(
            fire_interval.is_finite() && fire_interval >= 0.0,
            "fire interval must be non-negative, got {fire_interval}"
        );
        Self {
            fire_interval,
            last_fire_time: None,
            heat: None,
            ammo: None,
        }
    }

    pub fn with_heat(mut self, per_shot: f64, cooling_rate: f64, max_heat: f64) -> Self {
        self.heat = Some(HeatGauge {
            heat: 0.0,
            max_heat,
            per_shot,
            cooling_rate,
        });
        self
    }

    pub fn with_ammo(mut self, rounds: u32) -> Self {
        self.ammo = Some(rounds);
        self
    }

    /// Interval after applying the fire-rate multiplier.
    pub fn effective_interval(&self, cooldown_mult: f64) -> f64 {
        if cooldown_mult > 0.0 {
            self.fire_interval / cooldown_mult
        } else {
            self.fire_interval
        }
    }

    /// Seconds until the interval gate opens (0 when open).
    pub fn cooldown_remaining(&self, now: f64, cooldown_mult: f64) -> f64 {
        match self.last_fire_time {
            Some(last) => (self.effective_interval(cooldown_mult) - (now - last)).max(0.0),
            None => 0.0,
        }
    }

    /// Check every gate without changing state.
    pub fn check(&self, now: f64, cooldown_mult: f64) -> Result<(), FireRejection> {
        if self.ammo == Some(0) {
            return Err(FireRejection::OutOfAmmo);
        }
        if self.heat.is_some_and(|h| h.overheated()) {
            return Err(FireRejection::Overheated);
        }
        if let Some(last) = self.last_fire_time {
            let interval = self.effective_interval(cooldown_mult);
            if now - last < interval {
                return Err(FireRejection::Cooling {
                    remaining: interval - (now - last),
                });
            }
        }
        Ok(())
    }

    /// Fire if every gate is open: stamps the time, adds heat, spends a round.
    pub fn try_fire(&mut self, now: f64, cooldown_mult: f64) -> Result<(), FireRejection> {
        self.check(now, cooldown_mult)?;
        self.last_fire_time = Some(now);
        if let Some(gauge) = self.heat.as_mut() {
            gauge.heat += gauge.per_shot;
        }
        if let Some(ammo) = self.ammo.as_mut() {
            *ammo -= 1;
        }
        Ok(())
    }

    /// Per-frame heat decay.
    pub fn update(&mut self, dt: f64) {
        if let Some(gauge) = self.heat.as_mut() {
            gauge.heat = (gauge.heat - gauge.cooling_rate * dt).max(0.0);
        }
    }

    pub fn state(&self, now: f64, cooldown_mult: f64) -> WeaponState {
        match self.check(now, cooldown_mult) {
            Ok(()) => WeaponState::Ready,
            Err(FireRejection::Cooling { .. }) => WeaponState::Cooling,
            Err(FireRejection::Overheated) => WeaponState::Overheated,
            Err(FireRejection::OutOfAmmo) => WeaponState::Empty,
        }
    }

    pub fn view(&self, slot: WeaponSlot, now: f64, cooldown_mult: f64) -> WeaponView {
        WeaponView {
            slot,
            state: self.state(now, cooldown_mult),
            cooldown_remaining: self.cooldown_remaining(now, cooldown_mult),
            heat: self.heat.map(|h| h.heat),
            max_heat: self.heat.map(|h| h.max_heat),
            ammo: self.ammo,
        }
    }
}

// --- Universal cannon ---

/// Twin-barrel rapid-fire kinetic cannon.
#[derive(Debug, Clone, PartialEq)]
pub struct UniversalCannon {
    pub weapon: WeaponInstance,
    pub level: u32,
    pub rarity: Rarity,
    /// Level × rarity multiplier on each round's kinetic energy.
    pub damage_mult: f64,
    pub projectile_speed: f64,
    /// Half-angle of the random spread.
    pub spread: f64,
    pub round: KineticRound,
}

impl Default for UniversalCannon {
    fn default() -> Self {
        Self::rated(1, Rarity::Common)
    }
}

fn cannon_rarity_multiplier(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Common => 1.0,
        Rarity::Uncommon => 1.1,
        Rarity::Rare => 1.25,
        Rarity::Epic => 1.4,
        Rarity::Legendary | Rarity::Mythic | Rarity::Relic => 1.6,
    }
}

impl UniversalCannon {
    /// Cannon stats for an upgrade level and rarity.
    pub fn rated(level: u32, rarity: Rarity) -> Self {
        let steps = level.max(1) as f64 - 1.0;
        let fire_rate = CANNON_FIRE_RATE + steps * 0.2;
        Self {
            weapon: WeaponInstance::new(1.0 / fire_rate).with_heat(
                CANNON_HEAT_PER_SHOT,
                CANNON_COOLING_RATE,
                CANNON_MAX_HEAT,
            ),
            level: level.max(1),
            rarity,
            damage_mult: (1.0 + steps * 0.1) * cannon_rarity_multiplier(rarity),
            projectile_speed: CANNON_PROJECTILE_SPEED * (1.0 + steps * 0.05),
            spread: (CANNON_SPREAD * (1.0 - steps * 0.1)).max(0.0),
            round: kinetic_round(KineticRoundType::ArmorPiercing),
        }
    }

    /// Rated per-shot damage shown to the player.
    pub fn rated_damage(&self) -> f64 {
        CANNON_BASE_DAMAGE * self.damage_mult
    }

    /// Re-rate in place, keeping the current heat and timing.
    pub fn upgrade(&mut self, level: u32, rarity: Rarity) {
        let mut rated = Self::rated(level, rarity);
        rated.weapon.last_fire_time = self.weapon.last_fire_time;
        if let (Some(new), Some(old)) = (rated.weapon.heat.as_mut(), self.weapon.heat) {
            new.heat = old.heat;
        }
        *self = rated;
    }

    /// Fire both barrels straight up from `ship`.
    pub fn fire(
        &mut self,
        ship: Vec2,
        now: f64,
        modifiers: &StatModifiers,
        projectiles: &mut ProjectileSystem,
        rng: &mut impl Rng,
    ) -> Result<u32, FireRejection> {
        self.weapon.try_fire(now, modifiers.cooldown_mult)?;

        let base_angle = -std::f64::consts::FRAC_PI_2;
        let across = direction(base_angle + std::f64::consts::FRAC_PI_2);
        for barrel in 0..CANNON_BARREL_COUNT {
            let offset = (barrel as f64 - 0.5) * CANNON_BARREL_SPACING;
            let start = ship + across * offset - Vec2::new(0.0, CANNON_MUZZLE_OFFSET);
            let jitter = if self.spread > 0.0 {
                rng.gen_range(-self.spread..=self.spread)
            } else {
                0.0
            };
            projectiles.spawn_kinetic_shot(ShotSpec {
                position: start,
                velocity: direction(base_angle + jitter) * self.projectile_speed,
                mass_kg: self.round.mass_kg,
                damage_mult: self.damage_mult,
                owner_is_player: true,
            });
        }
        Ok(CANNON_BARREL_COUNT as u32)
    }
}

// --- Warhead assembly ---

/// Build the warhead a player bomb carries.
///
/// Multipliers apply in a fixed order: the record's rarity multiplier, the
/// attack bonus (extra shrapnel, damage scaled by the added share), the perk
/// multiplier, then overcharge. `extra_mult` is the ordnance's own factor.
pub fn build_warhead(
    bomb: &BombStats,
    modifiers: &StatModifiers,
    overcharged: bool,
    velocity_factor: f64,
    extra_mult: f64,
) -> Warhead {
    let bonus = modifiers.explosive_bonus_kg.max(0.0);
    let shrapnel = bomb.shrapnel_kg + bonus;

    let mut warhead = Warhead::from_masses(
        bomb.mass_kg + bonus,
        shrapnel,
        bomb.velocity_kmh * velocity_factor,
        bomb.diameter_mm,
        bomb.length_mm,
    );

    let mut mult = bomb.damage_mult;
    if bonus > 0.0 && shrapnel > 0.0 {
        mult *= 1.0 + bonus / shrapnel;
    }
    mult *= modifiers.explosive_damage_mult;
    if overcharged {
        mult *= OVERCHARGE_DAMAGE_MULT;
    }
    warhead.damage_mult = mult * extra_mult;
    warhead
}

// --- Player loadout ---

/// Inputs shared by every player weapon discharge.
pub struct LaunchContext<'a> {
    pub ship: Vec2,
    pub now: f64,
    pub modifiers: &'a StatModifiers,
    pub overcharged: bool,
}

/// The player ship's weapons, fixed at construction.
#[derive(Debug, Clone)]
pub struct ShipLoadout {
    pub cannon: UniversalCannon,
    pub breach_bomb: WeaponInstance,
    pub cluster_strike: WeaponInstance,
    pub overcharge: WeaponInstance,
    pub pulse_lance: WeaponInstance,
    /// Equipped standard bomb for breach and cluster volleys.
    pub bomb: BombStats,
    pub lance: EnergyWeaponSpec,
    next_group_id: u32,
}

impl ShipLoadout {
    pub fn new(bomb: BombStats) -> Self {
        Self {
            cannon: UniversalCannon::default(),
            breach_bomb: WeaponInstance::new(BREACH_BOMB_INTERVAL_SECS),
            cluster_strike: WeaponInstance::new(CLUSTER_STRIKE_INTERVAL_SECS),
            overcharge: WeaponInstance::new(OVERCHARGE_INTERVAL_SECS),
            pulse_lance: WeaponInstance::new(PULSE_LANCE_INTERVAL_SECS),
            bomb,
            lance: energy_weapon(EnergyWeaponType::PulseLaser),
            next_group_id: 0,
        }
    }

    pub fn instance(&self, slot: WeaponSlot) -> &WeaponInstance {
        match slot {
            WeaponSlot::Cannon => &self.cannon.weapon,
            WeaponSlot::BreachBomb => &self.breach_bomb,
            WeaponSlot::ClusterStrike => &self.cluster_strike,
            WeaponSlot::Overcharge => &self.overcharge,
            WeaponSlot::PulseLance => &self.pulse_lance,
        }
    }

    /// Heat decay for every weapon.
    pub fn update(&mut self, dt: f64) {
        self.cannon.weapon.update(dt);
        self.breach_bomb.update(dt);
        self.cluster_strike.update(dt);
        self.overcharge.update(dt);
        self.pulse_lance.update(dt);
    }

    fn next_group(&mut self) -> u32 {
        self.next_group_id = self.next_group_id.wrapping_add(1);
        self.next_group_id
    }

    /// Fire a slot. Returns the number of projectiles launched; overcharge
    /// launches none and is activated by the caller on `Ok`.
    pub fn fire(
        &mut self,
        slot: WeaponSlot,
        ctx: &LaunchContext<'_>,
        projectiles: &mut ProjectileSystem,
        rng: &mut impl Rng,
    ) -> Result<u32, FireRejection> {
        let rate = ctx.modifiers.cooldown_mult;
        match slot {
            WeaponSlot::Cannon => {
                self.cannon
                    .fire(ctx.ship, ctx.now, ctx.modifiers, projectiles, rng)
            }
            WeaponSlot::BreachBomb => {
                self.breach_bomb.try_fire(ctx.now, rate)?;
                let warhead = build_warhead(&self.bomb, ctx.modifiers, ctx.overcharged, 1.0, 1.0);
                let group = self.next_group();
                let origin = ctx.ship - Vec2::new(0.0, BREACH_BOMB_LAUNCH_OFFSET);
                let step = std::f64::consts::PI / 24.0;
                let offsets = [0.0, -step, step, -2.0 * step, 2.0 * step];
                for offset in offsets {
                    let angle = -std::f64::consts::FRAC_PI_2 + offset;
                    projectiles.spawn_bomb(
                        origin,
                        direction(angle) * warhead.muzzle_velocity_m_s,
                        warhead,
                        group,
                    );
                }
                Ok(offsets.len() as u32)
            }
            WeaponSlot::ClusterStrike => {
                self.cluster_strike.try_fire(ctx.now, rate)?;
                let warhead = build_warhead(
                    &self.bomb,
                    ctx.modifiers,
                    ctx.overcharged,
                    CLUSTER_STRIKE_VELOCITY_FACTOR,
                    CLUSTER_STRIKE_DAMAGE_FACTOR,
                );
                let group = self.next_group();
                let origin = ctx.ship - Vec2::new(0.0, BREACH_BOMB_LAUNCH_OFFSET);
                // The warhead already carries the faster cluster round; the
                // launch adds the same factor again on top.
                let velocity = Vec2::new(
                    0.0,
                    -CLUSTER_STRIKE_VELOCITY_FACTOR * warhead.muzzle_velocity_m_s,
                );
                let mut launched = 0;
                for i in -3i32..=3 {
                    let position = origin + Vec2::new(i as f64 * CLUSTER_STRIKE_SPACING, 0.0);
                    projectiles.spawn_bomb(position, velocity, warhead, group);
                    launched += 1;
                }
                Ok(launched)
            }
            WeaponSlot::Overcharge => {
                self.overcharge.try_fire(ctx.now, rate)?;
                Ok(0)
            }
            WeaponSlot::PulseLance => {
                self.pulse_lance.try_fire(ctx.now, rate)?;
                let start = ctx.ship - Vec2::new(0.0, CANNON_MUZZLE_OFFSET);
                projectiles.spawn_beam(BeamSpec {
                    start,
                    end: start - Vec2::new(0.0, PULSE_LANCE_LENGTH),
                    weapon: self.lance,
                    duration_secs: PULSE_LANCE_DURATION_SECS,
                    owner_is_player: true,
                });
                Ok(1)
            }
        }
    }

    pub fn views(&self, now: f64, cooldown_mult: f64) -> Vec<WeaponView> {
        [
            WeaponSlot::Cannon,
            WeaponSlot::BreachBomb,
            WeaponSlot::ClusterStrike,
            WeaponSlot::Overcharge,
            WeaponSlot::PulseLance,
        ]
        .into_iter()
        .map(|slot| self.instance(slot).view(slot, now, cooldown_mult))
        .collect()
    }
}

// --- Enemy arsenal ---

/// One enemy weapon: its firing characteristics and its gate state.
#[derive(Debug, Clone)]
pub struct EnemyWeapon {
    pub spec: EnemyWeaponSpec,
    pub instance: WeaponInstance,
}

/// Weapons carried by an enemy, primary first.
#[derive(Debug, Clone)]
pub struct EnemyArsenal {
    pub weapons: Vec<EnemyWeapon>,
}

impl EnemyArsenal {
    pub fn for_enemy(enemy_type: EnemyType, level: u32) -> Self {
        let weapons = loadout(enemy_type, level)
            .into_iter()
            .map(|spec| {
                let mut instance = WeaponInstance::new(spec.interval());
                if let Some(rounds) = spec.ammo {
                    instance = instance.with_ammo(rounds);
                }
                EnemyWeapon { spec, instance }
            })
            .collect();
        Self { weapons }
    }
}
