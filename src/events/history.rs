//! Fixed-capacity event history
//!
//! Slots are allocated once; `head` points at the slot the next event
//! overwrites, so the oldest record is evicted first.

use serde::{Deserialize, Serialize};

use crate::events::GameEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventHistory {
    slots: Vec<Option<GameEvent>>,
    head: usize,
    len: usize,
}

impl EventHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, event: GameEvent) {
        let capacity = self.capacity();
        self.slots[self.head] = Some(event);
        self.head = (self.head + 1) % capacity;
        self.len = (self.len + 1).min(capacity);
    }

    /// Most recent first
    pub fn recent(&self) -> impl Iterator<Item = &GameEvent> + '_ {
        let capacity = self.capacity();
        (0..self.len).filter_map(move |offset| {
            let index = (self.head + capacity - 1 - offset) % capacity;
            self.slots[index].as_ref()
        })
    }

    pub fn latest(&self) -> Option<&GameEvent> {
        self.recent().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::templates::{EventCategory, EventKind, Severity};

    fn event(id: u64) -> GameEvent {
        GameEvent {
            id,
            tick: id,
            template: "test".into(),
            title: format!("Event {}", id),
            category: EventCategory::Absurdist,
            severity: Severity::Minor,
            kind: EventKind::Neutral,
            deltas: Vec::new(),
        }
    }

    #[test]
    fn test_most_recent_first() {
        let mut history = EventHistory::new(4);
        for id in 1..=3 {
            history.push(event(id));
        }
        let ids: Vec<u64> = history.recent().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_oldest_evicted_at_capacity() {
        let mut history = EventHistory::new(3);
        for id in 1..=7 {
            history.push(event(id));
        }
        assert_eq!(history.len(), 3);
        let ids: Vec<u64> = history.recent().map(|e| e.id).collect();
        assert_eq!(ids, vec![7, 6, 5]);
        assert_eq!(history.latest().map(|e| e.id), Some(7));
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut history = EventHistory::new(0);
        history.push(event(1));
        history.push(event(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().map(|e| e.id), Some(2));
    }
}
