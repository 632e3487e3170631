#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic dealer system responsible for emitting card reveal commands.

use std::time::Duration;

use demo_stage_core::{Command, Event, TaskKind};

/// Configuration parameters required to construct the dealer system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    reveal_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided reveal cadence.
    #[must_use]
    pub const fn new(reveal_interval: Duration) -> Self {
        Self { reveal_interval }
    }
}

/// Pure system that emits reveal commands while the card-reveal task runs.
#[derive(Debug)]
pub struct Dealer {
    reveal_interval: Duration,
    accumulator: Duration,
}

impl Dealer {
    /// Creates a new dealer system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            reveal_interval: config.reveal_interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes events and the active-task view to emit reveal commands.
    ///
    /// The accumulator resets whenever the card-reveal task is not active, so
    /// time spent in other tasks never counts toward the next reveal.
    pub fn handle(&mut self, events: &[Event], active_task: Option<TaskKind>, out: &mut Vec<Command>) {
        if active_task != Some(TaskKind::CardReveal) {
            self.accumulator = Duration::ZERO;
            return;
        }

        if self.reveal_interval.is_zero() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        for _ in 0..self.resolve_reveal_attempts() {
            out.push(Command::RevealCard);
        }
    }

    fn resolve_reveal_attempts(&mut self) -> usize {
        if self.reveal_interval.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= self.reveal_interval {
            self.accumulator -= self.reveal_interval;
            attempts += 1;
        }
        attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_reveal_attempts_without_interval() {
        let mut dealer = Dealer::new(Config::new(Duration::ZERO));
        dealer.accumulator = Duration::from_secs(10);
        assert_eq!(dealer.resolve_reveal_attempts(), 0);
    }
}
