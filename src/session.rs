//! Session state for the game lifecycle manager.
//!
//! Exactly one `Session` is live per page, owned by the [`crate::manager`]
//! coordinator rather than floating as a module global. The `epoch` counter
//! is the cancellation token for scheduled callbacks: every `begin` and
//! `close` bumps it, so a frame or timeout scheduled by an earlier game fails
//! its [`Session::is_live`] check and becomes a no-op.

/// Which of the three zones is (or was last) running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    Aim,
    Memory,
    Particle,
}

impl GameKind {
    /// Parse the wire name used by the hosting page's zone buttons.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "reflex" => Some(Self::Aim),
            "mind" => Some(Self::Memory),
            "zen" => Some(Self::Particle),
            _ => None,
        }
    }

    /// Banner title shown while the zone is active.
    pub fn title(self) -> &'static str {
        match self {
            Self::Aim => "NEON AIM",
            Self::Memory => "COSMIC MEMORY",
            Self::Particle => "FLOW GARDEN",
        }
    }

    /// Score-label text at the moment the zone starts.
    pub fn initial_score_label(self) -> &'static str {
        match self {
            Self::Aim => "Score: 0",
            Self::Memory => "Moves: 0",
            Self::Particle => "Relax",
        }
    }

    /// Aim and Particle draw on the canvas; Memory renders DOM tiles.
    pub fn uses_canvas(self) -> bool {
        !matches!(self, Self::Memory)
    }
}

/// Format the live score label.
pub fn score_label(score: u32) -> String {
    format!("Score: {}", score)
}

/// Format the live move-counter label.
pub fn moves_label(moves: u32) -> String {
    format!("Moves: {}", moves)
}

/// Menu banner shown when a game ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndState {
    pub title: String,
    pub summary: String,
}

impl EndState {
    /// Aim-game timeout banner.
    pub fn final_score(score: u32) -> Self {
        Self {
            title: "Game Over".to_string(),
            summary: format!("Final Score: {}", score),
        }
    }

    /// Memory-game completion banner.
    pub fn victory(moves: u32) -> Self {
        Self {
            title: "Victory!".to_string(),
            summary: format!("Completed in {} moves!", moves),
        }
    }
}

/// Shared per-page game state: play flag, score, logical canvas dimensions,
/// and the active zone.
#[derive(Debug, Clone)]
pub struct Session {
    active: bool,
    score: u32,
    pub logical_width: f64,
    pub logical_height: f64,
    current: Option<GameKind>,
    epoch: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            active: false,
            score: 0,
            logical_width: 0.0,
            logical_height: 0.0,
            current: None,
            epoch: 0,
        }
    }
}

impl Session {
    /// Idle → Running. Resets the score, records the kind, and returns the
    /// new epoch for the frame chain about to be scheduled.
    pub fn begin(&mut self, kind: GameKind) -> u64 {
        self.active = true;
        self.score = 0;
        self.current = Some(kind);
        self.epoch += 1;
        self.epoch
    }

    /// Running → Idle. Keeps the kind so `restart` can re-enter the same zone.
    pub fn finish(&mut self) {
        self.active = false;
    }

    /// Idle/Running → Idle with the kind cleared. Safe to call when nothing
    /// is running. Bumps the epoch so in-flight callbacks self-cancel.
    pub fn close(&mut self) {
        self.active = false;
        self.current = None;
        self.epoch += 1;
    }

    /// The re-entrancy guard: a callback scheduled under `epoch` for `kind`
    /// may only act if the session still matches both and is still active.
    pub fn is_live(&self, epoch: u64, kind: GameKind) -> bool {
        self.active && self.current == Some(kind) && self.epoch == epoch
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    pub fn current(&self) -> Option<GameKind> {
        self.current
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn set_logical_size(&mut self, width: f64, height: f64) {
        self.logical_width = width;
        self.logical_height = height;
    }
}
