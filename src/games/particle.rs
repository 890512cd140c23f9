//! Zen zone — ambient particles trailing the pointer.
//!
//! No score, no end condition; the zone runs until closed. Each movement
//! event spawns a small burst at the mapped point, and every frame advances
//! positions, fades sizes, and walks the global hue forward.

use rand::Rng;

use crate::config::ParticleConfig;

/// Plain particle data; one update step, no hierarchy.
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    dx: f64,
    dy: f64,
    /// HSL hue, degrees. The shell renders `hsl(hue, 100%, 50%)`.
    pub hue: f64,
}

impl Particle {
    fn step(&mut self, decay: f64) {
        self.x += self.dx;
        self.y += self.dy;
        self.size -= decay;
    }
}

#[derive(Debug)]
pub struct ParticleGame {
    particles: Vec<Particle>,
    /// Particles that expired this tick. They get one final draw at their
    /// post-update size before disappearing, like the original's
    /// draw-then-cull loop.
    dying: Vec<Particle>,
    hue: f64,
    cfg: ParticleConfig,
}

impl ParticleGame {
    pub fn new(cfg: ParticleConfig) -> Self {
        Self { particles: Vec::new(), dying: Vec::new(), hue: 0.0, cfg }
    }

    /// Spawn one burst at logical coordinates, colored by the current hue.
    pub fn spawn_burst<R: Rng>(&mut self, x: f64, y: f64, rng: &mut R) {
        for _ in 0..self.cfg.burst_size {
            self.particles.push(Particle {
                x,
                y,
                size: rng.gen_range(2.0..12.0),
                dx: rng.gen_range(-2.0..2.0),
                dy: rng.gen_range(-2.0..2.0),
                hue: self.hue,
            });
        }
    }

    /// Advance one frame: walk the hue, move and fade every particle, and
    /// move the ones at or below the minimum size into the dying buffer.
    pub fn tick(&mut self) {
        self.hue = (self.hue + self.cfg.hue_step) % 360.0;
        let decay = self.cfg.size_decay;
        let min = self.cfg.min_size;
        for p in &mut self.particles {
            p.step(decay);
        }
        let (live, dead) = self.particles.drain(..).partition(|p| p.size > min);
        self.particles = live;
        self.dying = dead;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Expired this tick; drawn one last time, gone by the next tick.
    pub fn dying(&self) -> &[Particle] {
        &self.dying
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }

    pub fn trail_alpha(&self) -> f64 {
        self.cfg.trail_alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};

    fn game() -> (ParticleGame, SmallRng) {
        (ParticleGame::new(ParticleConfig::default()), SmallRng::seed_from_u64(99))
    }

    #[test]
    fn bursts_of_exactly_three() {
        let (mut g, mut rng) = game();
        g.spawn_burst(10.0, 20.0, &mut rng);
        assert_eq!(g.particles().len(), 3);
        g.spawn_burst(30.0, 40.0, &mut rng);
        assert_eq!(g.particles().len(), 6);
        for p in &g.particles()[..3] {
            assert!((2.0..12.0).contains(&p.size));
        }
    }

    #[test]
    fn hue_advances_by_two_per_tick_mod_360() {
        let (mut g, _) = game();
        g.tick();
        assert_eq!(g.hue(), 2.0);
        for _ in 0..179 {
            g.tick();
        }
        assert_eq!(g.hue(), 0.0); // 180 ticks * 2 degrees wraps
    }

    #[test]
    fn particles_move_by_velocity_and_fade() {
        let (mut g, mut rng) = game();
        g.spawn_burst(100.0, 100.0, &mut rng);
        let before: Vec<Particle> = g.particles().to_vec();
        g.tick();
        for (p, b) in g.particles().iter().zip(&before) {
            assert_eq!(p.x, b.x + b.dx);
            assert_eq!(p.y, b.y + b.dy);
            assert_eq!(p.size, b.size - 0.1);
        }
    }

    #[test]
    fn removed_the_tick_size_reaches_threshold() {
        let (mut g, _) = game();
        g.particles.push(Particle {
            x: 0.0,
            y: 0.0,
            size: 0.45,
            dx: 0.0,
            dy: 0.0,
            hue: 0.0,
        });
        g.tick(); // 0.45 -> 0.35, still above 0.3
        assert_eq!(g.particles().len(), 1);
        assert!(g.dying().is_empty());
        g.tick(); // 0.35 -> 0.25 <= 0.3 => removed
        assert!(g.particles().is_empty());
    }

    #[test]
    fn expired_particle_gets_one_final_frame() {
        let (mut g, _) = game();
        g.particles.push(Particle {
            x: 0.0,
            y: 0.0,
            size: 0.35,
            dx: 1.0,
            dy: 0.0,
            hue: 0.0,
        });
        g.tick(); // 0.35 -> 0.25: out of the live list, into the dying buffer
        assert!(g.particles().is_empty());
        assert_eq!(g.dying().len(), 1);
        // Drawn at its post-update position and size.
        assert_eq!(g.dying()[0].x, 1.0);
        assert_eq!(g.dying()[0].size, 0.35 - 0.1);
        g.tick();
        assert!(g.dying().is_empty());
    }

    #[test]
    fn burst_inherits_current_hue() {
        let (mut g, mut rng) = game();
        g.tick();
        g.tick();
        g.spawn_burst(0.0, 0.0, &mut rng);
        assert!(g.particles().iter().all(|p| p.hue == 4.0));
    }
}
