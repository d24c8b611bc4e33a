//! Queue of effects scheduled for a later turn
//!
//! Items are ordered by the turn they apply at, then by insertion order, so
//! several effects landing on the same turn are applied first-in first-out.

use crate::core::types::{ActionKind, Axis, ResourceVector, Turn};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedEffect {
    pub apply_at_turn: Turn,
    pub scheduled_on_turn: Turn,
    pub source: ActionKind,
    pub axis: Axis,
    pub delta: i64,
    /// Insertion counter, breaks ties between effects of the same turn
    pub seq: u64,
}

impl DelayedEffect {
    /// Apply to `state` and clamp right away so later effects see bounded values
    pub fn apply(&self, state: &mut ResourceVector) {
        state.add(self.axis, self.delta);
        state.clamp();
    }
}

impl Ord for DelayedEffect {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.apply_at_turn, self.seq).cmp(&(other.apply_at_turn, other.seq))
    }
}

impl PartialOrd for DelayedEffect {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DelayQueue {
    heap: BinaryHeap<Reverse<DelayedEffect>>,
    next_seq: u64,
}

impl DelayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(
        &mut self,
        apply_at_turn: Turn,
        scheduled_on_turn: Turn,
        source: ActionKind,
        axis: Axis,
        delta: i64,
    ) -> DelayedEffect {
        let effect = DelayedEffect {
            apply_at_turn,
            scheduled_on_turn,
            source,
            axis,
            delta,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.heap.push(Reverse(effect.clone()));
        effect
    }

    /// Remove and return every effect due at or before `turn`, in application order
    pub fn pop_due(&mut self, turn: Turn) -> Vec<DelayedEffect> {
        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.heap.peek() {
            if next.apply_at_turn > turn {
                break;
            }
            if let Some(Reverse(effect)) = self.heap.pop() {
                due.push(effect);
            }
        }
        due
    }

    /// Pending effects in application order
    pub fn pending(&self) -> Vec<DelayedEffect> {
        let mut items: Vec<DelayedEffect> = self.heap.iter().map(|r| r.0.clone()).collect();
        items.sort();
        items
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_in_turn_then_insertion_order() {
        let mut queue = DelayQueue::new();
        queue.schedule(4, 1, ActionKind::Gift, Axis::Reputation, 5);
        queue.schedule(3, 1, ActionKind::Communication, Axis::Satisfaction, 10);
        queue.schedule(3, 2, ActionKind::Gift, Axis::Satisfaction, 7);

        assert!(queue.pop_due(2).is_empty());

        let due = queue.pop_due(3);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].delta, 10);
        assert_eq!(due[1].delta, 7);
        assert_eq!(queue.len(), 1);
        assert!(queue.pending().iter().all(|e| e.apply_at_turn > 3));
    }

    #[test]
    fn test_apply_clamps_each_effect() {
        let mut state = ResourceVector::new(100, 95, 50, 0);
        let mut queue = DelayQueue::new();
        queue.schedule(2, 1, ActionKind::Communication, Axis::Satisfaction, 20);
        queue.schedule(2, 1, ActionKind::Gift, Axis::Satisfaction, -30);

        for effect in queue.pop_due(2) {
            effect.apply(&mut state);
        }
        // 95 + 20 clamps to 100 before the -30 lands
        assert_eq!(state.satisfaction, 70);
    }

    #[test]
    fn test_queue_serializes() {
        let mut queue = DelayQueue::new();
        queue.schedule(5, 2, ActionKind::Gift, Axis::Reputation, 3);
        let json = serde_json::to_string(&queue).unwrap();
        let back: DelayQueue = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pending(), queue.pending());
    }
}
