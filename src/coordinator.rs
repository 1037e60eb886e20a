//! Spin coordinator: owns the four reels, runs one round at a time and aggregates the
//! reels' completion signals into a formatted trick.

use crate::formatter::{self, ROLLING};
use crate::reel::{ReelEngine, Settled};
use crate::resolver::{self, SlotSet};
use crate::settings::SettingsSource;
use crate::GameMode;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const REEL_COUNT: usize = 4;

/// Default lower bound in ms on how long reels loop before being told to settle.
pub const MIN_SPIN_MS: u64 = 2500;

/// Uniform integer draw in `[0, len)`.
pub trait RandomSource {
    fn pick(&mut self, len: usize) -> usize;
}

/// Adapts any `rand` generator.
#[derive(Debug)]
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

/// Receives every resolved, non-placeholder trick.
pub trait TrickLog {
    fn add_trick(&mut self, text: &str, mode: GameMode);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Spinning,
    Resolving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReelTarget {
    pub reel: usize,
    pub len: usize,
    pub index: usize,
}

/// What a finished round produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub text: String,
    pub mode: GameMode,
    /// False when the text was a placeholder and history was skipped.
    pub recorded: bool,
}

#[derive(Debug)]
struct Round {
    mode: GameMode,
    slots: SlotSet,
    targets: [ReelTarget; REEL_COUNT],
    status: Status,
    settled: [bool; REEL_COUNT],
    completed: u8,
    elapsed: Duration,
    stop_issued: bool,
}

impl Round {
    fn new(mode: GameMode, slots: SlotSet, targets: [ReelTarget; REEL_COUNT]) -> Self {
        Self {
            mode,
            slots,
            targets,
            status: Status::Spinning,
            settled: [false; REEL_COUNT],
            completed: 0,
            elapsed: Duration::ZERO,
            stop_issued: false,
        }
    }

    /// Count one completion signal. Returns true on the signal that completes the round.
    fn record(&mut self, signal: Settled) -> bool {
        let spurious = self.status != Status::Spinning
            || signal.reel >= REEL_COUNT
            || self.settled[signal.reel];
        debug_assert!(!spurious, "spurious completion signal {signal:?}");
        if spurious {
            warn!(reel = signal.reel, completed = self.completed, "ignoring spurious completion signal");
            return false;
        }
        self.settled[signal.reel] = true;
        self.completed += 1;
        if usize::from(self.completed) == REEL_COUNT {
            self.status = Status::Resolving;
            return true;
        }
        false
    }

    fn landed_values(&self) -> [&'static str; REEL_COUNT] {
        std::array::from_fn(|i| self.slots[i].value_or_first(self.targets[i].index))
    }
}

pub struct SpinCoordinator<S, L, R> {
    settings: S,
    log: L,
    rng: R,
    reels: [ReelEngine; REEL_COUNT],
    /// Option sets currently bound to the reels and the settings they came from.
    slots: SlotSet,
    mode: GameMode,
    revision: u64,
    landed: [usize; REEL_COUNT],
    min_spin: Duration,
    round: Option<Round>,
}

impl<S: SettingsSource, L: TrickLog, R: RandomSource> SpinCoordinator<S, L, R> {
    pub fn new(settings: S, log: L, rng: R, min_spin: Duration) -> Self {
        let current = settings.current();
        let mode = current.mode;
        let slots = resolver::resolve(mode, current.difficulty, &current.custom);
        let revision = settings.revision();
        let reels = std::array::from_fn(|i| ReelEngine::new(i, slots[i].clone()));
        Self {
            settings,
            log,
            rng,
            reels,
            slots,
            mode,
            revision,
            landed: [0; REEL_COUNT],
            min_spin,
            round: None,
        }
    }

    pub fn status(&self) -> Status {
        self.round.as_ref().map_or(Status::Ready, |r| r.status)
    }

    /// True while a round is live; settings must not change then.
    pub fn is_busy(&self) -> bool {
        self.round.is_some()
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut S {
        &mut self.settings
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut L {
        &mut self.log
    }

    pub fn reels(&self) -> &[ReelEngine; REEL_COUNT] {
        &self.reels
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Start a round. Ignored (returns false) unless `Ready`.
    pub fn request_spin(&mut self) -> bool {
        if let Some(round) = &self.round {
            debug!(status = ?round.status, "spin request ignored, round in progress");
            return false;
        }
        let current = self.settings.current();
        let (mode, difficulty) = (current.mode, current.difficulty);
        let slots = resolver::resolve(mode, difficulty, &current.custom);
        self.revision = self.settings.revision();

        let targets: [ReelTarget; REEL_COUNT] = std::array::from_fn(|reel| {
            let len = slots[reel].len();
            ReelTarget {
                reel,
                len,
                index: self.rng.pick(len),
            }
        });
        for (reel, target) in self.reels.iter_mut().zip(&targets) {
            reel.start(slots[target.reel].clone(), target.index);
        }
        info!(
            ?mode,
            ?difficulty,
            targets = ?targets.map(|t| t.index),
            "spin started"
        );
        self.mode = mode;
        self.slots = slots.clone();
        self.round = Some(Round::new(mode, slots, targets));
        true
    }

    /// Advance the clock by `dt`. Returns the outcome on the tick the round resolves.
    pub fn tick(&mut self, dt: Duration) -> Option<RoundOutcome> {
        if self.round.is_none() {
            self.sync_settings();
            return None;
        }
        let round = self.round.as_mut()?;

        round.elapsed += dt;
        if !round.stop_issued && round.elapsed >= self.min_spin {
            round.stop_issued = true;
            for reel in &mut self.reels {
                reel.stop();
            }
        }

        let mut complete = false;
        for reel in &mut self.reels {
            if let Some(signal) = reel.tick(dt) {
                debug!(reel = signal.reel, target = signal.target, "reel settled");
                complete |= round.record(signal);
            }
        }
        if complete { self.resolve_round() } else { None }
    }

    fn resolve_round(&mut self) -> Option<RoundOutcome> {
        let round = self.round.take()?;
        debug_assert_eq!(round.status, Status::Resolving);
        debug_assert!(
            self.reels
                .iter()
                .zip(&round.targets)
                .all(|(reel, t)| reel.target() == t.index && reel.options().len() == t.len)
        );
        self.landed = round.targets.map(|t| t.index);
        let text = formatter::format_trick(round.mode, round.landed_values());
        let recorded = !formatter::is_placeholder(&text);
        if recorded {
            self.log.add_trick(&text, round.mode);
        }
        info!(text = %text.replace('\n', " / "), recorded, "round resolved");
        Some(RoundOutcome {
            text,
            mode: round.mode,
            recorded,
        })
    }

    /// Re-resolve the idle reels when settings changed since the last resolution.
    fn sync_settings(&mut self) {
        let revision = self.settings.revision();
        if revision == self.revision {
            return;
        }
        let current = self.settings.current();
        self.mode = current.mode;
        self.slots = resolver::resolve(current.mode, current.difficulty, &current.custom);
        self.revision = revision;
        self.landed = [0; REEL_COUNT];
        for (reel, options) in self.reels.iter_mut().zip(&self.slots) {
            reel.rebind(options.clone());
        }
        debug!(revision, mode = ?self.mode, "slots re-resolved after settings change");
    }

    /// Result line: `ROLLING...` while a round is live, else the formatted landed faces.
    pub fn display_text(&self) -> String {
        if self.round.is_some() {
            return ROLLING.to_string();
        }
        let values = std::array::from_fn(|i| self.slots[i].value_or_first(self.landed[i]));
        formatter::format_trick(self.mode, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::SKATERS_CHOICE;
    use crate::settings::{Settings, SettingsStore};
    use crate::Difficulty;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    const TICK: Duration = Duration::from_millis(16);

    /// Hands out queued indices, then zeros.
    struct Scripted(VecDeque<usize>);

    impl RandomSource for Scripted {
        fn pick(&mut self, len: usize) -> usize {
            let i = self.0.pop_front().unwrap_or(0);
            assert!(i < len, "scripted index {i} out of range {len}");
            i
        }
    }

    #[derive(Default)]
    struct Recording(Vec<(String, GameMode)>);

    impl TrickLog for Recording {
        fn add_trick(&mut self, text: &str, mode: GameMode) {
            self.0.push((text.to_string(), mode));
        }
    }

    fn coordinator(
        mode: GameMode,
        difficulty: Difficulty,
        picks: &[usize],
    ) -> SpinCoordinator<SettingsStore, Recording, Scripted> {
        let settings = SettingsStore::in_memory(Settings {
            difficulty,
            mode,
            ..Settings::default()
        });
        SpinCoordinator::new(
            settings,
            Recording::default(),
            Scripted(picks.iter().copied().collect()),
            Duration::from_millis(200),
        )
    }

    fn run_round<S, L, R>(c: &mut SpinCoordinator<S, L, R>) -> RoundOutcome
    where
        S: SettingsSource,
        L: TrickLog,
        R: RandomSource,
    {
        for _ in 0..10_000 {
            if let Some(outcome) = c.tick(TICK) {
                return outcome;
            }
        }
        panic!("round never resolved");
    }

    fn settled(reel: usize) -> Settled {
        Settled { reel, target: 0 }
    }

    fn fresh_round() -> Round {
        let slots = resolver::resolve(GameMode::Flatground, Difficulty::Hard, &Default::default());
        let targets = std::array::from_fn(|reel| ReelTarget { reel, len: 4, index: 0 });
        Round::new(GameMode::Flatground, slots, targets)
    }

    #[test]
    fn round_resolves_and_records_trick() {
        let mut c = coordinator(GameMode::Flatground, Difficulty::Hard, &[0, 0, 0, 0]);
        assert!(c.request_spin());
        assert_eq!(c.status(), Status::Spinning);
        assert_eq!(c.display_text(), ROLLING);

        let outcome = run_round(&mut c);
        assert_eq!(outcome.text, "BACKSIDE 180 KICKFLIP");
        assert!(outcome.recorded);
        assert_eq!(c.status(), Status::Ready);
        assert_eq!(c.display_text(), "BACKSIDE 180 KICKFLIP");
        assert_eq!(
            c.log().0,
            vec![("BACKSIDE 180 KICKFLIP".to_string(), GameMode::Flatground)]
        );
        for reel in c.reels() {
            assert_eq!(reel.centred_face(), reel.options().faces()[reel.target()]);
        }
    }

    #[test]
    fn ledge_round_uses_ledge_reels() {
        let mut c = coordinator(GameMode::Ledge, Difficulty::Hard, &[2, 0, 1, 1]);
        c.request_spin();
        let outcome = run_round(&mut c);
        assert_eq!(outcome.text, "SWITCH FRONTSIDE 50-50\n3 TRIES");
        assert_eq!(outcome.mode, GameMode::Ledge);
    }

    #[test]
    fn placeholder_result_skips_history() {
        let mut c = coordinator(GameMode::Flatground, Difficulty::Hard, &[0, 2, 2, 2]);
        c.request_spin();
        let outcome = run_round(&mut c);
        assert_eq!(outcome.text, SKATERS_CHOICE);
        assert!(!outcome.recorded);
        assert!(c.log().0.is_empty());
    }

    #[test]
    fn spin_request_while_live_is_ignored() {
        let mut c = coordinator(GameMode::Flatground, Difficulty::Hard, &[1, 1, 1, 1, 3, 3, 3, 3]);
        assert!(c.request_spin());
        c.tick(TICK);
        let targets: Vec<usize> = c.reels().iter().map(ReelEngine::target).collect();
        assert!(!c.request_spin());
        let after: Vec<usize> = c.reels().iter().map(ReelEngine::target).collect();
        assert_eq!(targets, after);

        run_round(&mut c);
        assert_eq!(c.log().0.len(), 1);
        assert!(c.request_spin());
    }

    #[test]
    fn reels_keep_spinning_until_min_duration() {
        let mut c = coordinator(GameMode::Flatground, Difficulty::Hard, &[]);
        c.request_spin();
        for _ in 0..12 {
            assert_eq!(c.tick(TICK), None);
        }
        assert!(c.reels().iter().all(|r| r.state() == crate::reel::ReelState::Spinning));
    }

    #[test]
    fn aggregation_is_order_independent() {
        let orders = [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1], [1, 3, 0, 2]];
        for order in orders {
            let mut round = fresh_round();
            let completions: Vec<bool> = order.iter().map(|&r| round.record(settled(r))).collect();
            assert_eq!(completions, [false, false, false, true], "order {order:?}");
            assert_eq!(round.completed, 4);
            assert_eq!(round.status, Status::Resolving);
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "spurious completion signal")]
    fn fifth_signal_is_asserted() {
        let mut round = fresh_round();
        for r in 0..4 {
            round.record(settled(r));
        }
        round.record(settled(0));
    }

    #[test]
    fn settings_change_while_ready_rebinds_reels() {
        let mut c = coordinator(GameMode::Flatground, Difficulty::Hard, &[1, 1, 1, 1]);
        c.request_spin();
        run_round(&mut c);
        assert_eq!(c.display_text(), "FAKIE FRONTSIDE 360 HEELFLIP");

        c.settings_mut().set_mode(GameMode::Ledge);
        c.tick(TICK);
        assert_eq!(c.mode(), GameMode::Ledge);
        assert_eq!(c.display_text(), "BACKSIDE 50-50\n1 TRY");
        assert_eq!(c.reels()[3].centred_face().value, "1 Try");
    }

    #[test]
    fn initial_display_uses_first_faces() {
        let c = coordinator(GameMode::Flatground, Difficulty::Easy, &[]);
        assert_eq!(c.status(), Status::Ready);
        assert_eq!(c.display_text(), "BACKSIDE 180 KICKFLIP");
    }

    #[test]
    fn seeded_rng_is_reproducible_and_in_range() {
        let mut a = RngSource(StdRng::seed_from_u64(42));
        let mut b = RngSource(StdRng::seed_from_u64(42));
        for len in 1..50 {
            let x = a.pick(len);
            assert!(x < len);
            assert_eq!(x, b.pick(len));
        }
    }
}
