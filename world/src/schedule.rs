//! Tick-indexed queue of deferred actions.

use glam::Vec2;
use starfall_core::BossId;

/// Deferred work resolved by the world once its trigger tick arrives.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ScheduledAction {
    /// Cosmetic explosion left behind by an enemy removed at wave end or by a nuke.
    Explosion { position: Vec2, size: f32 },
    /// One stage of a boss laser blast. The final stage can strike the player.
    LaserStage { position: Vec2, final_stage: bool },
    /// Delayed minion wave; skipped when the boss is gone.
    Minions { boss: BossId },
    /// Weighted power-up drop left behind by a destroyed boss.
    Spoils { position: Vec2 },
}

#[derive(Clone, Debug)]
struct Entry {
    due: u64,
    sequence: u64,
    action: ScheduledAction,
}

/// Queue of actions ordered by trigger tick and insertion order.
#[derive(Debug, Default)]
pub(crate) struct Schedule {
    entries: Vec<Entry>,
    next_sequence: u64,
}

impl Schedule {
    /// Queues `action` to run on tick `due`.
    pub(crate) fn push(&mut self, due: u64, action: ScheduledAction) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        self.entries.push(Entry {
            due,
            sequence,
            action,
        });
    }

    /// Removes every action due on or before `tick`, in trigger order.
    pub(crate) fn drain_due(&mut self, tick: u64) -> Vec<ScheduledAction> {
        if self.entries.iter().all(|entry| entry.due > tick) {
            return Vec::new();
        }

        let (mut due, pending): (Vec<Entry>, Vec<Entry>) =
            self.entries.drain(..).partition(|entry| entry.due <= tick);
        self.entries = pending;
        due.sort_by_key(|entry| (entry.due, entry.sequence));
        due.into_iter().map(|entry| entry.action).collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_trigger_then_insertion_order() {
        let mut schedule = Schedule::default();
        schedule.push(5, ScheduledAction::Spoils { position: Vec2::X });
        schedule.push(3, ScheduledAction::Spoils { position: Vec2::Y });
        schedule.push(
            3,
            ScheduledAction::Explosion {
                position: Vec2::ZERO,
                size: 1.0,
            },
        );

        assert!(schedule.drain_due(2).is_empty());
        let due = schedule.drain_due(4);
        assert_eq!(
            due,
            vec![
                ScheduledAction::Spoils { position: Vec2::Y },
                ScheduledAction::Explosion {
                    position: Vec2::ZERO,
                    size: 1.0,
                },
            ]
        );
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.drain_due(10).len(), 1);
        assert_eq!(schedule.len(), 0);
    }
}
