//! Reel engine: spin/settle state machine for one reel and the landing-offset math.
//!
//! The reel strip is the option set repeated forever. `position` is the strip's vertical
//! offset in rows; it only ever decreases while the reel is bound to one option set. The
//! viewing window is three items tall and the centre slot is item row 1.

use crate::catalog::Face;
use crate::motion::{Motion, SETTLE_SPRING, Step};
use crate::resolver::OptionSet;
use std::time::Duration;

/// Rows per item on the strip.
pub const ITEM_ROWS: u16 = 3;
pub const ITEM_EXTENT: f64 = ITEM_ROWS as f64;
/// Items visible in the window.
pub const WINDOW_ITEMS: u16 = 3;

/// One loop over the strip takes this long for reel 0, plus `LOOP_MS_PER_REEL` per index.
const BASE_LOOP_MS: f64 = 1500.0;
const LOOP_MS_PER_REEL: f64 = 200.0;
/// Full extra cycles before settling, plus one per reel index.
const BASE_EXTRA_SPINS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelState {
    Idle,
    Spinning,
    Settling,
}

/// Completion signal of a reel, emitted once per settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled {
    pub reel: usize,
    pub target: usize,
}

pub fn cycle_extent(len: usize) -> f64 {
    len as f64 * ITEM_EXTENT
}

/// Loop speed in rows/s; later reels loop slower so the columns never move in lock-step.
pub fn loop_rate(len: usize, reel: usize) -> f64 {
    let period_ms = BASE_LOOP_MS + LOOP_MS_PER_REEL * reel as f64;
    cycle_extent(len) / (period_ms / 1000.0)
}

pub fn extra_spins(reel: usize) -> u32 {
    BASE_EXTRA_SPINS + reel as u32
}

/// Resting offset in `(-cycle, 0]` that puts `target` in the centre slot.
pub fn canonical_rest(target: usize, len: usize) -> f64 {
    let cycle = cycle_extent(len);
    let mut base = (-(target as f64 * ITEM_EXTENT) + ITEM_EXTENT) % cycle;
    if base > 0.0 {
        base -= cycle;
    }
    base
}

/// Final resting position when told to stop at `pos` (`None`: never moved).
/// Never above `pos`, and congruent to `canonical_rest(target)` modulo one cycle.
pub fn settle_offset(pos: Option<f64>, target: usize, len: usize, reel: usize) -> f64 {
    let base = canonical_rest(target, len);
    let Some(pos) = pos else {
        return base;
    };
    let cycle = cycle_extent(len);
    let mut delta = base - pos % cycle;
    while delta > 0.0 {
        delta -= cycle;
    }
    pos + delta - f64::from(extra_spins(reel)) * cycle
}

/// Face index whose item covers window row `row` when the strip sits at `pos`.
pub fn face_index_at_row(pos: f64, row: i64, len: usize) -> usize {
    let strip_row = row - pos.round() as i64;
    strip_row
        .div_euclid(i64::from(ITEM_ROWS))
        .rem_euclid(len as i64) as usize
}

/// Face index in the centre slot.
pub fn centred_index(pos: f64, len: usize) -> usize {
    (((ITEM_EXTENT - pos) / ITEM_EXTENT).round() as i64).rem_euclid(len as i64) as usize
}

#[derive(Debug, Clone)]
pub struct ReelEngine {
    index: usize,
    options: OptionSet,
    target: usize,
    state: ReelState,
    position: Option<f64>,
    motion: Option<Motion>,
}

impl ReelEngine {
    pub fn new(index: usize, options: OptionSet) -> Self {
        Self {
            index,
            options,
            target: 0,
            state: ReelState::Idle,
            position: None,
            motion: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> ReelState {
        self.state
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Bind an idle reel to new faces, resting on face 0 with no motion history.
    pub fn rebind(&mut self, options: OptionSet) {
        debug_assert_eq!(self.state, ReelState::Idle, "rebind while moving");
        self.options = options;
        self.target = 0;
        self.position = None;
        self.motion = None;
    }

    /// Idle -> Spinning: loop over `options` until `stop`.
    ///
    /// Panics if `options` is empty or `target` is out of range.
    pub fn start(&mut self, options: OptionSet, target: usize) {
        assert!(!options.faces().is_empty(), "reel {} started with no faces", self.index);
        assert!(
            target < options.len(),
            "reel {} target {target} out of range {}",
            self.index,
            options.len()
        );
        debug_assert_eq!(self.state, ReelState::Idle, "start while moving");
        let origin = self.display_position();
        let rate = loop_rate(options.len(), self.index);
        self.options = options;
        self.target = target;
        self.state = ReelState::Spinning;
        self.motion = Some(Motion::looping(origin, rate));
    }

    /// Spinning -> Settling: spring from the current position onto the target.
    pub fn stop(&mut self) {
        if self.state != ReelState::Spinning {
            return;
        }
        let to = settle_offset(self.position, self.target, self.options.len(), self.index);
        let from = self.position.unwrap_or(to);
        self.state = ReelState::Settling;
        self.motion = Some(Motion::spring(from, to, SETTLE_SPRING));
    }

    /// Advance the animation. Returns the completion signal on the tick the spring rests.
    pub fn tick(&mut self, dt: Duration) -> Option<Settled> {
        let motion = self.motion.as_mut()?;
        match motion.advance(dt)? {
            Step::Moving(p) => {
                self.position = Some(p);
                None
            }
            Step::Finished(p) => {
                self.position = Some(p);
                self.motion = None;
                self.state = ReelState::Idle;
                Some(Settled {
                    reel: self.index,
                    target: self.target,
                })
            }
        }
    }

    /// Position to draw: live motion, else the last position, else the target's rest.
    pub fn display_position(&self) -> f64 {
        match (&self.motion, self.position) {
            (Some(m), _) => m.position(),
            (None, Some(p)) => p,
            (None, None) => canonical_rest(self.target, self.options.len()),
        }
    }

    /// Face covering window row `row` (0 at the top of the window) and the row's line within
    /// that face's item.
    pub fn face_at_row(&self, row: u16) -> (Face, u16) {
        let pos = self.display_position();
        let i = face_index_at_row(pos, i64::from(row), self.options.len());
        let line = (i64::from(row) - pos.round() as i64).rem_euclid(i64::from(ITEM_ROWS));
        (self.options.faces()[i], line as u16)
    }

    /// Face currently in the centre slot.
    pub fn centred_face(&self) -> Face {
        let i = centred_index(self.display_position(), self.options.len());
        self.options.faces()[i]
    }
}
