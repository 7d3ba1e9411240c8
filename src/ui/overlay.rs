use std::time::{Duration, Instant};

use crate::content::ItemKey;
use crate::models::CardKey;

use super::state::RevealSet;

/// Length of the entry animation.
pub const OPEN_DURATION: Duration = Duration::from_millis(150);
/// Length of the exit animation. The overlay stays on screen this long after a
/// close request and then disappears.
pub const CLOSE_DURATION: Duration = Duration::from_millis(200);

/// Lifecycle of the usage-note overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Closed,
    Opening { since: Instant },
    Open,
    Closing { since: Instant },
}

/// Usage-note overlay: which item it shows, which example card has focus and
/// which example pronunciation guides are revealed.
#[derive(Debug, Clone)]
pub struct UsageOverlay {
    phase: OverlayPhase,
    item: Option<ItemKey>,
    focus: usize,
    revealed: RevealSet<CardKey>,
}

impl Default for UsageOverlay {
    fn default() -> Self {
        Self {
            phase: OverlayPhase::Closed,
            item: None,
            focus: 0,
            revealed: RevealSet::default(),
        }
    }
}

impl UsageOverlay {
    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    pub fn item(&self) -> Option<ItemKey> {
        self.item
    }

    /// True while anything of the overlay is on screen, exit animation included.
    pub fn is_visible(&self) -> bool {
        !matches!(self.phase, OverlayPhase::Closed)
    }

    /// True while the overlay owns keyboard input.
    pub fn accepts_input(&self) -> bool {
        matches!(self.phase, OverlayPhase::Opening { .. } | OverlayPhase::Open)
    }

    /// Start opening on `item`. Ignored unless fully closed; returns whether
    /// the overlay started opening.
    pub fn open(&mut self, item: ItemKey, now: Instant) -> bool {
        if self.phase != OverlayPhase::Closed {
            return false;
        }
        self.item = Some(item);
        self.focus = 0;
        self.phase = OverlayPhase::Opening { since: now };
        true
    }

    /// Begin the exit animation. Reveal flags are cleared immediately so the
    /// next opening starts fully hidden. Once started, closing runs to the end.
    pub fn close(&mut self, now: Instant) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.revealed.clear();
        self.focus = 0;
        self.phase = OverlayPhase::Closing { since: now };
        true
    }

    /// Advance timed transitions.
    pub fn tick(&mut self, now: Instant) {
        match self.phase {
            OverlayPhase::Opening { since } if now.duration_since(since) >= OPEN_DURATION => {
                self.phase = OverlayPhase::Open;
            }
            OverlayPhase::Closing { since } if now.duration_since(since) >= CLOSE_DURATION => {
                self.phase = OverlayPhase::Closed;
                self.item = None;
            }
            _ => {}
        }
    }

    /// Animation progress in `0.0..=1.0`, where 1.0 is fully shown.
    pub fn progress(&self, now: Instant) -> f32 {
        match self.phase {
            OverlayPhase::Closed => 0.0,
            OverlayPhase::Open => 1.0,
            OverlayPhase::Opening { since } => {
                fraction(now.duration_since(since), OPEN_DURATION)
            }
            OverlayPhase::Closing { since } => {
                1.0 - fraction(now.duration_since(since), CLOSE_DURATION)
            }
        }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn move_focus(&mut self, offset: isize, card_count: usize) {
        if card_count == 0 {
            self.focus = 0;
            return;
        }
        let last = card_count as isize - 1;
        self.focus = (self.focus as isize + offset).clamp(0, last) as usize;
    }

    pub fn is_revealed(&self, card: CardKey) -> bool {
        self.revealed.is_revealed(card)
    }

    pub fn toggle_reveal(&mut self, card: CardKey) -> bool {
        self.revealed.toggle(card)
    }

    pub fn revealed(&self) -> &RevealSet<CardKey> {
        &self.revealed
    }
}

fn fraction(elapsed: Duration, total: Duration) -> f32 {
    (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
}
