//! Simulation Stepper
//!
//! Walks a deterministic automaton through an input string one symbol per
//! tick. The transition function itself is pure ([`step`]); the [`Stepper`]
//! holds run state (cursor, current state, outcome); the [`TickTimer`] only
//! decides *when* a tick fires, with cancel-on-reschedule semantics so a
//! stale tick can never land after a reset or restart.
//!
//! Applying this to a nondeterministic automaton is undefined; the host must
//! only drive it against a deterministic variant.

use std::time::Duration;

use crate::automaton::Automaton;


pub const MIN_TICK_DELAY_MS: u64 = 100;
pub const MAX_TICK_DELAY_MS: u64 = 3000;
pub const DEFAULT_TICK_DELAY_MS: u64 = 1000;

/// Pure transition function: the successor of `state` on `symbol`, if any.
pub fn step<'a>(automaton: &'a Automaton, state: &str, symbol: char) -> Option<&'a str> {
    let mut buf = [0u8; 4];
    let symbol = &*symbol.encode_utf8(&mut buf);
    automaton
        .transitions
        .iter()
        .find(|t| t.from == state && t.symbol == symbol)
        .map(|t| t.to.as_str())
}

/// Final verdict of a run, set exactly once until the next reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Matched,
    Failed,
}

/// Fires at most one tick per [`advance`](TickTimer::advance) call, so ticks
/// are strictly serialized. Cancelling or changing the delay drops whatever
/// was pending.
#[derive(Debug, Clone)]
pub struct TickTimer {
    delay: Duration,
    accumulated: Duration,
    armed: bool,
}

impl TickTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            accumulated: Duration::ZERO,
            armed: false,
        }
    }

    pub fn arm(&mut self) {
        self.accumulated = Duration::ZERO;
        self.armed = true;
    }

    pub fn cancel(&mut self) {
        self.accumulated = Duration::ZERO;
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn set_delay(&mut self, delay: Duration) {
        if delay != self.delay {
            self.delay = delay;
            self.accumulated = Duration::ZERO;
        }
    }

    /// Feed elapsed wall time; true when the pending tick is due.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if !self.armed {
            return false;
        }
        self.accumulated = (self.accumulated + dt).min(self.delay);
        if self.accumulated >= self.delay {
            self.accumulated = Duration::ZERO;
            true
        } else {
            false
        }
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TICK_DELAY_MS))
    }
}

/// Timer-driven automaton walker over `{idle, running, matched, failed}`.
#[derive(Debug, Clone)]
pub struct Stepper {
    input: Vec<char>,
    cursor: usize,
    current: Option<String>,
    running: bool,
    outcome: Option<Outcome>,
    tick_delay_ms: u64,
    timer: TickTimer,
}

impl Default for Stepper {
    fn default() -> Self {
        Self {
            input: Vec::new(),
            cursor: 0,
            current: None,
            running: false,
            outcome: None,
            tick_delay_ms: DEFAULT_TICK_DELAY_MS,
            timer: TickTimer::default(),
        }
    }
}

impl Stepper {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_state(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn tick_delay_ms(&self) -> u64 {
        self.tick_delay_ms
    }

    pub fn input(&self) -> &[char] {
        &self.input
    }

    /// True when a run exists but is paused (resumable).
    pub fn is_paused(&self) -> bool {
        !self.running && self.outcome.is_none() && self.current.is_some()
    }

    /// Clamped into `[100, 3000]` ms; changing it drops the pending tick.
    pub fn set_tick_delay_ms(&mut self, ms: u64) {
        self.tick_delay_ms = ms.clamp(MIN_TICK_DELAY_MS, MAX_TICK_DELAY_MS);
        self.timer
            .set_delay(Duration::from_millis(self.tick_delay_ms));
    }

    /// Begin or resume a run. Refused (returns false) for empty input or a
    /// finished run; a paused run resumes from its current state and cursor
    /// rather than restarting.
    pub fn start(&mut self, automaton: &Automaton, input: &str) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        if self.current.is_none() {
            if input.is_empty() {
                return false;
            }
            self.input = input.chars().collect();
            self.cursor = 0;
            self.current = Some(automaton.starting_state.clone());
        }
        self.running = true;
        self.timer.arm();
        true
    }

    /// Pause without losing run state; cancels the pending tick.
    pub fn pause(&mut self) {
        self.running = false;
        self.timer.cancel();
    }

    /// Back to idle: clears current state, cursor and outcome, and cancels
    /// any pending tick.
    pub fn reset(&mut self) {
        self.input.clear();
        self.cursor = 0;
        self.current = None;
        self.running = false;
        self.outcome = None;
        self.timer.cancel();
    }

    /// Consume one symbol, or finalize the run once the input is exhausted.
    /// No-op unless running.
    pub fn tick(&mut self, automaton: &Automaton) {
        if !self.running || self.outcome.is_some() {
            return;
        }
        let Some(current) = self.current.clone() else {
            return;
        };

        if self.cursor >= self.input.len() {
            let matched = automaton.is_terminating(&current);
            self.finish(if matched { Outcome::Matched } else { Outcome::Failed });
            return;
        }

        let symbol = self.input[self.cursor];
        match step(automaton, &current, symbol) {
            Some(next) => {
                self.current = Some(next.to_string());
                self.cursor += 1;
            }
            None => {
                // This input rejects regardless of remaining characters.
                self.finish(Outcome::Failed);
            }
        }
    }

    /// Single manual tick for a paused run (the host's step button). Leaves
    /// the stepper paused again unless the run finished or was running.
    pub fn step_once(&mut self, automaton: &Automaton) {
        if self.outcome.is_some() || self.current.is_none() {
            return;
        }
        let resume = self.running;
        self.running = true;
        self.tick(automaton);
        if self.outcome.is_none() && !resume {
            self.pause();
        }
    }

    /// Timer orchestration: feed elapsed time, firing at most one tick. The
    /// next tick is only armed after this one's mutation has been applied.
    pub fn advance(&mut self, automaton: &Automaton, dt: Duration) {
        if self.running && self.timer.advance(dt) {
            self.tick(automaton);
        }
    }

    /// Run a started simulation to completion without any timer (CLI, tests).
    pub fn run_to_completion(&mut self, automaton: &Automaton) -> Option<Outcome> {
        // Each tick consumes one symbol plus one finalizing tick.
        for _ in 0..=self.input.len() {
            if self.outcome.is_some() {
                break;
            }
            self.tick(automaton);
        }
        self.outcome
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.running = false;
        self.timer.cancel();
    }
}
