//! Gameplay tuning knobs.
//!
//! Every magic number from the original games lives here with its shipped
//! default, so the hosting page can retune feel (hit forgiveness, spawn
//! cadence, particle decay) without a rebuild. `configure()` on the wasm
//! boundary accepts a partial JSON override; unknown fields are rejected,
//! missing fields keep their defaults.

use serde::Deserialize;

/// Reflex zone (aim game) tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AimConfig {
    /// Countdown length in frame ticks (~30 s at 60 fps).
    pub duration_ticks: i32,
    /// A target spawns whenever the countdown is an exact multiple of this.
    pub spawn_interval: i32,
    /// Initial target radius in logical pixels.
    pub target_radius: f64,
    /// Radius lost per tick.
    pub shrink_rate: f64,
    /// Extra hit radius in logical pixels, for touch imprecision and
    /// nearly-gone targets.
    pub hit_tolerance: f64,
    /// Score awarded per hit.
    pub hit_reward: u32,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            duration_ticks: 1800,
            spawn_interval: 40,
            target_radius: 40.0,
            shrink_rate: 0.2,
            hit_tolerance: 15.0,
            hit_reward: 10,
        }
    }
}

/// Mind zone (memory game) tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryConfig {
    /// Delay before a pending pair is resolved, in milliseconds. Long enough
    /// for the player to see both faces.
    pub resolve_delay_ms: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { resolve_delay_ms: 800 }
    }
}

/// Zen zone (particle toy) tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticleConfig {
    /// Particles spawned per movement event.
    pub burst_size: usize,
    /// Size lost per tick.
    pub size_decay: f64,
    /// A particle at or below this size is removed.
    pub min_size: f64,
    /// Global hue advance per tick, degrees.
    pub hue_step: f64,
    /// Opacity of the per-frame overlay that produces the fading trail.
    pub trail_alpha: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            burst_size: 3,
            size_decay: 0.1,
            min_size: 0.3,
            hue_step: 2.0,
            trail_alpha: 0.1,
        }
    }
}

/// All tuning for the three zones.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub aim: AimConfig,
    pub memory: MemoryConfig,
    pub particle: ParticleConfig,
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override. Rejects values that would
    /// stall or fault the frame loop.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| format!("Invalid game config JSON: {}", e))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range checks for every tunable. The spawn cadence is a remainder
    /// divisor and the decays drive countdowns, so zero or negative values
    /// must never reach the games.
    pub fn validate(&self) -> Result<(), String> {
        fn positive(name: &str, value: f64) -> Result<(), String> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(format!("{} must be positive, got {}", name, value))
            }
        }
        fn non_negative(name: &str, value: f64) -> Result<(), String> {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(format!("{} must not be negative, got {}", name, value))
            }
        }

        if self.aim.duration_ticks <= 0 {
            return Err(format!(
                "aim.duration_ticks must be positive, got {}",
                self.aim.duration_ticks
            ));
        }
        if self.aim.spawn_interval <= 0 {
            return Err(format!(
                "aim.spawn_interval must be positive, got {}",
                self.aim.spawn_interval
            ));
        }
        positive("aim.target_radius", self.aim.target_radius)?;
        positive("aim.shrink_rate", self.aim.shrink_rate)?;
        non_negative("aim.hit_tolerance", self.aim.hit_tolerance)?;

        if self.memory.resolve_delay_ms > i32::MAX as u32 {
            return Err(format!(
                "memory.resolve_delay_ms must fit a browser timeout, got {}",
                self.memory.resolve_delay_ms
            ));
        }

        if self.particle.burst_size == 0 {
            return Err("particle.burst_size must be at least 1".to_string());
        }
        positive("particle.size_decay", self.particle.size_decay)?;
        positive("particle.hue_step", self.particle.hue_step)?;
        non_negative("particle.min_size", self.particle.min_size)?;
        non_negative("particle.trail_alpha", self.particle.trail_alpha)?;
        if self.particle.trail_alpha > 1.0 {
            return Err(format!(
                "particle.trail_alpha must be at most 1, got {}",
                self.particle.trail_alpha
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_constants() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.aim.duration_ticks, 1800);
        assert_eq!(cfg.aim.spawn_interval, 40);
        assert_eq!(cfg.aim.target_radius, 40.0);
        assert_eq!(cfg.aim.shrink_rate, 0.2);
        assert_eq!(cfg.aim.hit_tolerance, 15.0);
        assert_eq!(cfg.aim.hit_reward, 10);
        assert_eq!(cfg.memory.resolve_delay_ms, 800);
        assert_eq!(cfg.particle.burst_size, 3);
        assert_eq!(cfg.particle.size_decay, 0.1);
        assert_eq!(cfg.particle.min_size, 0.3);
        assert_eq!(cfg.particle.hue_step, 2.0);
        assert_eq!(cfg.particle.trail_alpha, 0.1);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = GameConfig::from_json(r#"{"aim":{"hit_tolerance":25.0}}"#).unwrap();
        assert_eq!(cfg.aim.hit_tolerance, 25.0);
        assert_eq!(cfg.aim.spawn_interval, 40);
        assert_eq!(cfg.memory.resolve_delay_ms, 800);
    }

    #[test]
    fn empty_object_is_all_defaults() {
        let cfg = GameConfig::from_json("{}").unwrap();
        assert_eq!(cfg.particle.burst_size, 3);
    }

    #[test]
    fn invalid_json_returns_error() {
        assert!(GameConfig::from_json("not json {{{").is_err());
    }

    #[test]
    fn defaults_pass_validation() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_spawn_interval_is_rejected() {
        // A zero cadence would be a remainder-by-zero on the countdown.
        assert!(GameConfig::from_json(r#"{"aim":{"spawn_interval":0}}"#).is_err());
        assert!(GameConfig::from_json(r#"{"aim":{"spawn_interval":-40}}"#).is_err());
    }

    #[test]
    fn non_positive_rates_are_rejected() {
        assert!(GameConfig::from_json(r#"{"aim":{"duration_ticks":0}}"#).is_err());
        assert!(GameConfig::from_json(r#"{"aim":{"target_radius":0.0}}"#).is_err());
        assert!(GameConfig::from_json(r#"{"aim":{"shrink_rate":-0.2}}"#).is_err());
        assert!(GameConfig::from_json(r#"{"aim":{"hit_tolerance":-1.0}}"#).is_err());
        assert!(GameConfig::from_json(r#"{"particle":{"size_decay":0.0}}"#).is_err());
        assert!(GameConfig::from_json(r#"{"particle":{"hue_step":0.0}}"#).is_err());
        assert!(GameConfig::from_json(r#"{"particle":{"burst_size":0}}"#).is_err());
        assert!(GameConfig::from_json(r#"{"particle":{"trail_alpha":1.5}}"#).is_err());
    }

    #[test]
    fn oversized_resolve_delay_is_rejected() {
        assert!(GameConfig::from_json(r#"{"memory":{"resolve_delay_ms":4000000000}}"#).is_err());
        assert!(GameConfig::from_json(r#"{"memory":{"resolve_delay_ms":2000}}"#).is_ok());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(GameConfig::from_json(r#"{"physics":{"gravity":9.8}}"#).is_err());
    }
}
