//! Deck bookkeeping and motion integration for the card-reveal task.

use std::time::Duration;

use demo_stage_core::{CardId, CardSnapshot, Position, SpriteIndex, StartError, TextureCatalog};

/// Number of cards dealt into the staged pool when the task starts.
pub const DECK_SIZE: u32 = 144;

pub(crate) const STACK_ORIGIN: Position = Position::new(150.0, 70.0);
pub(crate) const STACK_PADDING: f32 = 2.85;
pub(crate) const MOTION_DURATION: Duration = Duration::from_millis(2000);

#[derive(Clone, Debug)]
pub(crate) struct Card {
    pub(crate) id: CardId,
    pub(crate) sprite: SpriteIndex,
    pub(crate) position: Position,
}

/// Time-bounded interpolation of one card's position toward a target.
#[derive(Clone, Debug)]
pub(crate) struct Motion {
    card: CardId,
    start: Position,
    target: Position,
    duration: Duration,
    elapsed: Duration,
}

impl Motion {
    fn new(card: CardId, start: Position, target: Position) -> Self {
        Self {
            card,
            start,
            target,
            duration: MOTION_DURATION,
            elapsed: Duration::ZERO,
        }
    }

    fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Outcome of a successful reveal, surfaced to the event stream.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RevealRecord {
    pub(crate) card: CardId,
    pub(crate) ordinal: u32,
    pub(crate) target: Position,
}

/// Owned state of one card-reveal session.
///
/// The staged pool is stacked in deal order; the target list is the initial
/// position sequence reversed and stays immutable for the session's lifetime.
#[derive(Debug)]
pub(crate) struct DealSession {
    staged: Vec<Card>,
    revealed: Vec<Card>,
    targets: Vec<Position>,
    motions: Vec<Motion>,
}

impl DealSession {
    /// Deals the full deck, validating every sprite against the catalog first.
    ///
    /// Fails without allocating any cards when a sprite is missing, so a
    /// rejected start never leaves a partial pool behind.
    pub(crate) fn deal(catalog: &TextureCatalog) -> Result<Self, StartError> {
        let mut staged = Vec::with_capacity(DECK_SIZE as usize);
        for slot in 0..DECK_SIZE {
            let sprite = SpriteIndex::for_deck_slot(slot);
            if !catalog.contains(sprite) {
                return Err(StartError::AssetNotFound { sprite });
            }
            staged.push(Card {
                id: CardId::new(slot),
                sprite,
                position: Position::new(
                    STACK_ORIGIN.x(),
                    STACK_ORIGIN.y() + slot as f32 * STACK_PADDING,
                ),
            });
        }

        let mut targets: Vec<Position> = staged.iter().map(|card| card.position).collect();
        targets.reverse();

        Ok(Self {
            staged,
            revealed: Vec::new(),
            targets,
            motions: Vec::new(),
        })
    }

    /// Pops the last staged card and creates its motion toward the next
    /// target in reveal order. Returns `None` when the pool is empty.
    pub(crate) fn reveal_next(&mut self) -> Option<RevealRecord> {
        let target = *self.targets.get(self.revealed.len())?;
        let card = self.staged.pop()?;
        let ordinal = self.revealed.len() as u32;
        self.motions.push(Motion::new(card.id, card.position, target));
        let record = RevealRecord {
            card: card.id,
            ordinal,
            target,
        };
        self.revealed.push(card);
        Some(record)
    }

    /// Advances every in-flight motion by `dt`, writing interpolated
    /// positions back into the revealed cards.
    ///
    /// Completed motions pin their card to the exact target position, are
    /// removed from the in-flight set, and report their card id through
    /// `completed`.
    pub(crate) fn advance_motions(&mut self, dt: Duration, completed: &mut Vec<CardId>) {
        let mut index = 0;
        while index < self.motions.len() {
            let motion = &mut self.motions[index];
            motion.elapsed = motion.elapsed.saturating_add(dt);
            let finished = motion.is_complete();
            let position = if finished {
                motion.target
            } else {
                motion.start.lerp(motion.target, motion.progress())
            };
            let card_id = motion.card;

            if let Some(card) = self.revealed.iter_mut().find(|card| card.id == card_id) {
                card.position = position;
            }

            if finished {
                completed.push(card_id);
                let _ = self.motions.swap_remove(index);
            } else {
                index += 1;
            }
        }
    }

    pub(crate) fn staged_len(&self) -> usize {
        self.staged.len()
    }

    pub(crate) fn revealed_len(&self) -> usize {
        self.revealed.len()
    }

    pub(crate) fn motions_len(&self) -> usize {
        self.motions.len()
    }

    pub(crate) fn targets(&self) -> &[Position] {
        &self.targets
    }

    /// Captures snapshots of every card, staged and revealed alike.
    pub(crate) fn snapshots(&self) -> Vec<CardSnapshot> {
        let mut snapshots = Vec::with_capacity(self.staged.len() + self.revealed.len());
        for card in &self.staged {
            snapshots.push(CardSnapshot {
                id: card.id,
                sprite: card.sprite,
                position: card.position,
                revealed: false,
                in_flight: false,
            });
        }
        for card in &self.revealed {
            let in_flight = self.motions.iter().any(|motion| motion.card == card.id);
            snapshots.push(CardSnapshot {
                id: card.id,
                sprite: card.sprite,
                position: card.position,
                revealed: true,
                in_flight,
            });
        }
        snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_monotone_and_clamped() {
        let mut motion = Motion::new(
            CardId::new(0),
            Position::new(0.0, 0.0),
            Position::new(100.0, 40.0),
        );

        let mut last = motion.progress();
        assert_eq!(last, 0.0);
        for millis in [100_u64, 250, 1, 649, 500, 1500] {
            motion.elapsed = motion.elapsed.saturating_add(Duration::from_millis(millis));
            let progress = motion.progress();
            assert!(progress >= last, "progress regressed at +{millis}ms");
            assert!(progress <= 1.0, "progress exceeded 1.0 at +{millis}ms");
            last = progress;
        }

        assert!(motion.is_complete());
        assert_eq!(motion.progress(), 1.0);
    }

    #[test]
    fn interpolated_position_tracks_progress() {
        let mut motion = Motion::new(
            CardId::new(0),
            Position::new(0.0, 0.0),
            Position::new(100.0, 40.0),
        );
        motion.elapsed = Duration::from_millis(500);

        let position = motion.start.lerp(motion.target, motion.progress());
        assert!((position.x() - 25.0).abs() < 1e-3);
        assert!((position.y() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn zero_duration_motion_reports_full_progress() {
        let mut motion = Motion::new(
            CardId::new(0),
            Position::new(0.0, 0.0),
            Position::new(1.0, 1.0),
        );
        motion.duration = Duration::ZERO;
        assert_eq!(motion.progress(), 1.0);
        assert!(motion.is_complete());
    }
}
