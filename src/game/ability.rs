//! Timed abilities.
//!
//! Every query takes the current simulation time explicitly, so ability
//! state is a pure function of the timestamps passed in. The engine owns
//! the clock.

use std::time::Duration;

use super::config::{BoostConfig, PhaseConfig};

pub const MAX_ENERGY: f32 = 100.0;

/// Common contract of all abilities
pub trait Ability {
    fn name(&self) -> &str;

    /// The effect is currently applied
    fn is_active(&self, now: Duration) -> bool;

    /// The ability may be activated right now
    fn is_ready(&self, now: Duration) -> bool;

    /// Time left until the ability is ready again, zero when ready
    fn cooldown_remaining(&self, now: Duration) -> Duration;

    /// Try to trigger the ability. Returns false and changes nothing while
    /// on cooldown.
    fn activate(&mut self, now: Duration) -> bool;
}

/// Cooldown plus fixed effect duration
#[derive(Debug, Clone, PartialEq)]
pub struct TimedAbility {
    name: String,
    cooldown: Duration,
    duration: Duration,
    last_activation: Option<Duration>,
    active_until: Duration,
}

impl TimedAbility {
    pub fn new(name: impl Into<String>, cooldown: Duration, duration: Duration) -> Self {
        Self {
            name: name.into(),
            cooldown,
            duration,
            last_activation: None,
            active_until: Duration::ZERO,
        }
    }

    /// The phase ability: pass through your own body for a while
    pub fn phase(config: &PhaseConfig) -> Self {
        Self::new(
            "Phase",
            Duration::from_secs_f64(config.cooldown_secs),
            Duration::from_secs_f64(config.duration_secs),
        )
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn last_activation(&self) -> Option<Duration> {
        self.last_activation
    }

    fn ready_at(&self) -> Option<Duration> {
        self.last_activation.map(|at| at + self.cooldown)
    }
}

impl Ability for TimedAbility {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self, now: Duration) -> bool {
        now < self.active_until
    }

    /// Strictly after `last_activation + cooldown`; at the boundary itself
    /// `cooldown_remaining` is already zero but the ability is not yet ready.
    fn is_ready(&self, now: Duration) -> bool {
        self.ready_at().is_none_or(|ready_at| now > ready_at)
    }

    fn cooldown_remaining(&self, now: Duration) -> Duration {
        self.ready_at()
            .map_or(Duration::ZERO, |ready_at| ready_at.saturating_sub(now))
    }

    fn activate(&mut self, now: Duration) -> bool {
        if !self.is_ready(now) {
            return false;
        }

        self.last_activation = Some(now);
        self.active_until = now + self.duration;
        true
    }
}

/// Speed boost limited by an energy meter instead of a cooldown.
///
/// While held, a short burst is re-armed on every update and energy drains;
/// otherwise energy recharges. Running dry ends the boost even while held.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostAbility {
    burst: TimedAbility,
    energy: f32,
    consumption_rate: f32,
    recharge_rate: f32,
}

impl BoostAbility {
    pub fn new(config: &BoostConfig) -> Self {
        Self {
            burst: TimedAbility::new(
                "Boost",
                Duration::ZERO,
                Duration::from_secs_f64(config.burst_secs),
            ),
            energy: MAX_ENERGY,
            consumption_rate: config.consumption_rate,
            recharge_rate: config.recharge_rate,
        }
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    /// Advance the energy model by `dt` ending at `now`
    pub fn update(&mut self, dt: Duration, held: bool, now: Duration) {
        let secs = dt.as_secs_f32();

        if held && self.energy > 0.0 {
            self.energy = (self.energy - self.consumption_rate * secs).max(0.0);
            self.burst.activate(now);
        } else {
            self.energy = (self.energy + self.recharge_rate * secs).min(MAX_ENERGY);
        }
    }
}

impl Ability for BoostAbility {
    fn name(&self) -> &str {
        self.burst.name()
    }

    fn is_active(&self, now: Duration) -> bool {
        self.burst.is_active(now) && self.energy > 0.0
    }

    fn is_ready(&self, now: Duration) -> bool {
        self.burst.is_ready(now) && self.energy > 0.0
    }

    fn cooldown_remaining(&self, now: Duration) -> Duration {
        self.burst.cooldown_remaining(now)
    }

    fn activate(&mut self, now: Duration) -> bool {
        self.energy > 0.0 && self.burst.activate(now)
    }
}
