//! Mind zone — emoji pair matching.
//!
//! The deck is every glyph twice, shuffled uniformly (Fisher–Yates via
//! `rand`) once at deal time. At most two cards may be flipped-but-unresolved
//! at any instant; the second flip of a pair defers resolution so the player
//! sees both faces before they match or hide.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::MemoryConfig;

/// The eight item identities. Each appears twice in the deck.
pub const GLYPHS: [&str; 8] = [
    "\u{1FA90}",       // 🪐
    "\u{1F680}",       // 🚀
    "\u{1F47D}",       // 👽
    "\u{2604}\u{FE0F}", // ☄️
    "\u{1F31F}",       // 🌟
    "\u{1F6F8}",       // 🛸
    "\u{1F319}",       // 🌙
    "\u{26A1}\u{FE0F}", // ⚡️
];

/// One dealt card. `flipped` covers both pending and matched cards.
#[derive(Debug, Clone)]
pub struct Card {
    pub glyph: &'static str,
    pub flipped: bool,
    pub matched: bool,
}

/// Outcome of a flip attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    /// Already flipped/matched, or two cards are awaiting resolution.
    Ignored,
    /// First card of a pair revealed.
    Revealed,
    /// Second card revealed; resolution should be scheduled after the
    /// configured delay.
    Pending,
}

/// Outcome of resolving a pending pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No pair was pending.
    Nothing,
    /// The two cards matched permanently.
    Matched { cards: [usize; 2], won: bool },
    /// The two cards differ and were hidden again.
    Mismatched { cards: [usize; 2] },
}

#[derive(Debug)]
pub struct MemoryGame {
    cards: Vec<Card>,
    /// Indices of flipped-but-unresolved cards. Invariant: len ≤ 2.
    pending: Vec<usize>,
    moves: u32,
    matched_count: usize,
    cfg: MemoryConfig,
}

impl MemoryGame {
    /// Deal a fresh shuffled deck.
    pub fn new<R: Rng>(cfg: MemoryConfig, rng: &mut R) -> Self {
        let mut glyphs: Vec<&'static str> =
            GLYPHS.iter().chain(GLYPHS.iter()).copied().collect();
        glyphs.shuffle(rng);
        let cards = glyphs
            .into_iter()
            .map(|glyph| Card { glyph, flipped: false, matched: false })
            .collect();
        Self { cards, pending: Vec::new(), moves: 0, matched_count: 0, cfg }
    }

    /// Flip the card at `index`. Silent no-op while a pair awaits resolution
    /// or when the card is already face-up.
    pub fn flip(&mut self, index: usize) -> Flip {
        if self.pending.len() >= 2 || index >= self.cards.len() {
            return Flip::Ignored;
        }
        let card = &mut self.cards[index];
        if card.flipped || card.matched {
            return Flip::Ignored;
        }

        card.flipped = true;
        self.pending.push(index);
        if self.pending.len() == 2 {
            self.moves += 1;
            Flip::Pending
        } else {
            Flip::Revealed
        }
    }

    /// Resolve the pending pair. Called after the reveal delay; the caller is
    /// responsible for skipping this when the session died in the meantime.
    pub fn resolve(&mut self) -> Resolution {
        if self.pending.len() != 2 {
            return Resolution::Nothing;
        }
        let [a, b] = [self.pending[0], self.pending[1]];
        self.pending.clear();

        if self.cards[a].glyph == self.cards[b].glyph {
            self.cards[a].matched = true;
            self.cards[b].matched = true;
            self.matched_count += 2;
            Resolution::Matched { cards: [a, b], won: self.matched_count == self.cards.len() }
        } else {
            self.cards[a].flipped = false;
            self.cards[b].flipped = false;
            Resolution::Mismatched { cards: [a, b] }
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn pending(&self) -> &[usize] {
        &self.pending
    }

    pub fn resolve_delay_ms(&self) -> u32 {
        self.cfg.resolve_delay_ms
    }
}
