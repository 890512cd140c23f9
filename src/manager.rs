//! Game lifecycle coordinator.
//!
//! Owns the [`Session`], the tuning config, the RNG, and whichever zone is
//! active. The DOM shell drives it with ticks and mapped input events and
//! applies the returned effects (labels, menu banners, board updates) to the
//! page. Every entry point that can be reached from a scheduled callback
//! takes the epoch it was scheduled under, so a stale frame chain or a
//! resolve timeout from a closed game degrades to a no-op.

use rand::{SeedableRng, rngs::SmallRng};

use crate::config::GameConfig;
use crate::games::aim::{AimGame, AimTick};
use crate::games::memory::{Flip, MemoryGame, Resolution};
use crate::games::particle::ParticleGame;
use crate::session::{EndState, GameKind, Session};

/// The single active zone's state.
pub enum ActiveGame {
    Aim(AimGame),
    Memory(MemoryGame),
    Particle(ParticleGame),
}

/// What a frame tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Stale or inactive chain: nothing was touched, stop scheduling.
    Skip,
    /// State advanced; draw and schedule the next frame.
    Frame,
    /// The game finished this tick; show the menu and stop scheduling.
    Ended(EndState),
}

pub struct Manager {
    pub session: Session,
    config: GameConfig,
    game: Option<ActiveGame>,
    rng: SmallRng,
}

impl Manager {
    pub fn new(config: GameConfig) -> Self {
        Self {
            session: Session::default(),
            config,
            game: None,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Replace the tuning config. Takes effect from the next `start`.
    pub fn set_config(&mut self, config: GameConfig) {
        self.config = config;
    }

    /// Start (or switch to) a zone. Returns the epoch the shell must tag its
    /// frame chain and timeouts with.
    pub fn start(&mut self, kind: GameKind) -> u64 {
        let epoch = self.session.begin(kind);
        self.game = Some(match kind {
            GameKind::Aim => ActiveGame::Aim(AimGame::new(self.config.aim.clone())),
            GameKind::Memory => {
                ActiveGame::Memory(MemoryGame::new(self.config.memory.clone(), &mut self.rng))
            }
            GameKind::Particle => {
                ActiveGame::Particle(ParticleGame::new(self.config.particle.clone()))
            }
        });
        epoch
    }

    /// Re-enter the zone that was last running. No-op when nothing ran yet.
    pub fn restart(&mut self) -> Option<u64> {
        self.session.current().map(|kind| self.start(kind))
    }

    /// Tear the session down. Safe to call when already idle.
    pub fn close(&mut self) {
        self.session.close();
        self.game = None;
    }

    /// Advance the active canvas game one frame. Memory has no frame loop,
    /// so a memory tick is a `Skip` as well.
    pub fn tick(&mut self, epoch: u64) -> Tick {
        let (w, h) = (self.session.logical_width, self.session.logical_height);
        match &mut self.game {
            Some(ActiveGame::Aim(aim)) if self.session.is_live(epoch, GameKind::Aim) => {
                match aim.tick(w, h, &mut self.rng) {
                    AimTick::Running => Tick::Frame,
                    AimTick::Ended => {
                        let end = EndState::final_score(self.session.score());
                        self.session.finish();
                        Tick::Ended(end)
                    }
                }
            }
            Some(ActiveGame::Particle(particle))
                if self.session.is_live(epoch, GameKind::Particle) =>
            {
                particle.tick();
                Tick::Frame
            }
            _ => Tick::Skip,
        }
    }

    /// Press/tap at logical coordinates (aim only). Returns the new score on
    /// a hit so the shell can refresh the label.
    pub fn press(&mut self, epoch: u64, x: f64, y: f64) -> Option<u32> {
        match &mut self.game {
            Some(ActiveGame::Aim(aim)) if self.session.is_live(epoch, GameKind::Aim) => {
                if aim.press(x, y) {
                    let score = self.session.score() + aim.hit_reward();
                    self.session.set_score(score);
                    Some(score)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Pointer movement at logical coordinates (particle only).
    pub fn pointer_move(&mut self, epoch: u64, x: f64, y: f64) {
        if let Some(ActiveGame::Particle(particle)) = &mut self.game {
            if self.session.is_live(epoch, GameKind::Particle) {
                particle.spawn_burst(x, y, &mut self.rng);
            }
        }
    }

    /// Flip a memory card. On `Pending` the shell schedules
    /// [`Manager::resolve_match`] after the reveal delay and shows the move
    /// counter (the session score mirrors it).
    pub fn flip_card(&mut self, index: usize) -> Flip {
        match &mut self.game {
            Some(ActiveGame::Memory(memory)) if self.session.active() => {
                let flip = memory.flip(index);
                if flip == Flip::Pending {
                    self.session.set_score(memory.moves());
                }
                flip
            }
            _ => Flip::Ignored,
        }
    }

    /// Resolve a pending memory pair. `Inactive` when the player closed the
    /// game during the reveal delay.
    pub fn resolve_match(&mut self, epoch: u64) -> MatchOutcome {
        match &mut self.game {
            Some(ActiveGame::Memory(memory)) if self.session.is_live(epoch, GameKind::Memory) => {
                match memory.resolve() {
                    Resolution::Matched { cards, won: true } => {
                        let end = EndState::victory(memory.moves());
                        self.session.finish();
                        MatchOutcome::Won { cards, end }
                    }
                    Resolution::Matched { cards, won: false } => MatchOutcome::Matched { cards },
                    Resolution::Mismatched { cards } => MatchOutcome::Mismatched { cards },
                    Resolution::Nothing => MatchOutcome::Inactive,
                }
            }
            _ => MatchOutcome::Inactive,
        }
    }

    pub fn aim(&self) -> Option<&AimGame> {
        match &self.game {
            Some(ActiveGame::Aim(aim)) => Some(aim),
            _ => None,
        }
    }

    pub fn memory(&self) -> Option<&MemoryGame> {
        match &self.game {
            Some(ActiveGame::Memory(memory)) => Some(memory),
            _ => None,
        }
    }

    pub fn particle(&self) -> Option<&ParticleGame> {
        match &self.game {
            Some(ActiveGame::Particle(particle)) => Some(particle),
            _ => None,
        }
    }
}

/// Shell-facing outcome of a deferred match resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Session died during the delay, or nothing was pending.
    Inactive,
    Matched { cards: [usize; 2] },
    Mismatched { cards: [usize; 2] },
    Won { cards: [usize; 2], end: EndState },
}
