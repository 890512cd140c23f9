//! Reflex zone — shrinking targets against a countdown.
//!
//! Targets spawn on a fixed cadence, shrink every tick, and score on a
//! press/tap within their (slightly forgiving) radius. The game ends the
//! exact tick the countdown reaches zero.

use rand::Rng;

use crate::config::AimConfig;

/// One live target. Stored last-created-last; hit testing and shrinking scan
/// newest-first so overlapping targets prefer the newest.
#[derive(Debug, Clone)]
pub struct Target {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// HSL hue, degrees. The shell renders `hsl(hue, 70%, 60%)`.
    pub hue: f64,
    shrink: f64,
}

/// Outcome of one frame tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AimTick {
    Running,
    /// Countdown hit zero this tick.
    Ended,
}

#[derive(Debug)]
pub struct AimGame {
    targets: Vec<Target>,
    timer: i32,
    cfg: AimConfig,
}

impl AimGame {
    pub fn new(cfg: AimConfig) -> Self {
        let timer = cfg.duration_ticks;
        Self { targets: Vec::new(), timer, cfg }
    }

    /// Advance one frame: count down, spawn on the cadence, shrink and cull
    /// targets. `width`/`height` are the current logical surface dimensions.
    pub fn tick<R: Rng>(&mut self, width: f64, height: f64, rng: &mut R) -> AimTick {
        self.timer -= 1;

        if self.timer % self.cfg.spawn_interval == 0 {
            self.spawn(width, height, rng);
        }

        // Newest-first so removal indices stay valid while iterating.
        for i in (0..self.targets.len()).rev() {
            self.targets[i].radius -= self.targets[i].shrink;
            if self.targets[i].radius <= 0.0 {
                self.targets.remove(i);
            }
        }

        if self.timer <= 0 { AimTick::Ended } else { AimTick::Running }
    }

    fn spawn<R: Rng>(&mut self, width: f64, height: f64, rng: &mut R) {
        let r = self.cfg.target_radius;
        // Keep the full circle in bounds; a surface smaller than one diameter
        // just centers the target on that axis.
        let x = if width > 2.0 * r { rng.gen_range(r..width - r) } else { width / 2.0 };
        let y = if height > 2.0 * r { rng.gen_range(r..height - r) } else { height / 2.0 };
        self.targets.push(Target {
            x,
            y,
            radius: r,
            hue: rng.gen_range(0.0..360.0),
            shrink: self.cfg.shrink_rate,
        });
    }

    /// Handle a press at logical coordinates. Scans newest-first and removes
    /// the first target whose forgiving radius contains the point; at most
    /// one target is consumed per press. Returns whether anything was hit.
    pub fn press(&mut self, x: f64, y: f64) -> bool {
        for i in (0..self.targets.len()).rev() {
            let t = &self.targets[i];
            let dist = (t.x - x).hypot(t.y - y);
            if dist < t.radius + self.cfg.hit_tolerance {
                self.targets.remove(i);
                return true;
            }
        }
        false
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Remaining-time fraction in [0, 1], for the timer bar.
    pub fn time_fraction(&self) -> f64 {
        self.timer.max(0) as f64 / self.cfg.duration_ticks as f64
    }

    pub fn hit_reward(&self) -> u32 {
        self.cfg.hit_reward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    const W: f64 = 800.0;
    const H: f64 = 600.0;

    fn game() -> (AimGame, SmallRng) {
        (AimGame::new(AimConfig::default()), SmallRng::seed_from_u64(7))
    }

    #[test]
    fn spawns_on_exact_interval_multiples() {
        let (mut g, mut rng) = game();
        // Ticks 1799 down; first multiple of 40 is 1760, i.e. the 40th tick.
        for _ in 0..39 {
            g.tick(W, H, &mut rng);
        }
        assert!(g.targets().is_empty());
        g.tick(W, H, &mut rng);
        assert_eq!(g.targets().len(), 1);
    }

    #[test]
    fn spawned_target_stays_fully_in_bounds() {
        let (mut g, mut rng) = game();
        for _ in 0..400 {
            g.tick(W, H, &mut rng);
        }
        for t in g.targets() {
            assert!(t.x >= t.radius && t.x <= W - t.radius);
            assert!(t.y >= t.radius && t.y <= H - t.radius);
            assert!((0.0..360.0).contains(&t.hue));
        }
    }

    #[test]
    fn radius_shrinks_by_exactly_shrink_rate_per_tick() {
        let (mut g, mut rng) = game();
        for _ in 0..40 {
            g.tick(W, H, &mut rng);
        }
        let r0 = g.targets()[0].radius;
        g.tick(W, H, &mut rng);
        assert_eq!(g.targets()[0].radius, r0 - 0.2);
    }

    #[test]
    fn target_removed_first_tick_radius_reaches_zero() {
        // Cadence long enough that no further spawns interfere.
        let cfg = AimConfig {
            target_radius: 1.0,
            shrink_rate: 0.5,
            spawn_interval: 2000,
            duration_ticks: 2000,
            ..AimConfig::default()
        };
        let mut g = AimGame::new(cfg);
        let mut rng = SmallRng::seed_from_u64(7);
        g.spawn(W, H, &mut rng);
        g.tick(W, H, &mut rng); // 1.0 -> 0.5
        assert_eq!(g.targets().len(), 1);
        g.tick(W, H, &mut rng); // 0.5 -> 0.0 => removed this tick
        assert!(g.targets().is_empty());
    }

    #[test]
    fn ends_exactly_when_timer_reaches_zero() {
        let (mut g, mut rng) = game();
        for i in 1..1800 {
            assert_eq!(g.tick(W, H, &mut rng), AimTick::Running, "tick {}", i);
        }
        assert_eq!(g.tick(W, H, &mut rng), AimTick::Ended);
    }

    #[test]
    fn press_inside_tolerance_hits_once() {
        let (mut g, mut rng) = game();
        for _ in 0..40 {
            g.tick(W, H, &mut rng);
        }
        let t = g.targets()[0].clone();
        // Just inside radius + 15px forgiveness.
        assert!(g.press(t.x + t.radius + 14.9, t.y));
        assert!(g.targets().is_empty());
        // Nothing left to hit.
        assert!(!g.press(t.x, t.y));
    }

    #[test]
    fn press_outside_tolerance_misses() {
        let (mut g, mut rng) = game();
        for _ in 0..40 {
            g.tick(W, H, &mut rng);
        }
        let t = g.targets()[0].clone();
        assert!(!g.press(t.x + t.radius + 15.0, t.y));
        assert_eq!(g.targets().len(), 1);
    }

    #[test]
    fn overlapping_targets_prefer_newest() {
        let cfg = AimConfig { spawn_interval: 1, ..AimConfig::default() };
        let mut g = AimGame::new(cfg);
        let mut rng = SmallRng::seed_from_u64(7);
        g.tick(W, H, &mut rng);
        g.tick(W, H, &mut rng);
        assert_eq!(g.targets().len(), 2);
        let newest = g.targets().last().unwrap().clone();
        assert!(g.press(newest.x, newest.y));
        // The newest is gone even if the older one also covered the point.
        assert!(!g.targets().iter().any(|t| t.x == newest.x && t.y == newest.y));
    }

    #[test]
    fn time_fraction_tracks_countdown() {
        let (mut g, mut rng) = game();
        assert_eq!(g.time_fraction(), 1.0);
        for _ in 0..900 {
            g.tick(W, H, &mut rng);
        }
        assert_eq!(g.time_fraction(), 0.5);
    }
}
