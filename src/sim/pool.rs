//! Entity pool shared by the streaming simulations
//!
//! Items live in spawn order and carry a stage that can only move forward.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A lifecycle stage of an animated item
pub trait Lifecycle: Copy + PartialEq + fmt::Debug {
    /// Ordinal of the stage. An item never moves to a lower rank.
    fn rank(self) -> u8;
}

/// A transient animated entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedItem<S> {
    /// Unique among live items
    pub id: u32,
    pub stage: S,
    /// Track percentage or age counter, depending on the simulation
    pub position: f32,
}

/// Ordered set of live items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPool<S> {
    items: Vec<AnimatedItem<S>>,
    next_id: u32,
}

impl<S> Default for EntityPool<S> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }
}

impl<S: Lifecycle> EntityPool<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new item at the end of the pool and return its ID
    pub fn spawn(&mut self, stage: S, position: f32) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.items.push(AnimatedItem {
            id,
            stage,
            position,
        });
        id
    }

    /// Move every item forward by `step`
    pub fn advance(&mut self, step: f32) {
        let step = step.max(0.0);
        for item in &mut self.items {
            item.position += step;
        }
    }

    /// Apply a stage-transition rule to every item.
    ///
    /// `rule` returns the next stage, or `None` to leave the item alone.
    /// Transitions to a lower rank are ignored. Returns how many items changed.
    pub fn transition(&mut self, mut rule: impl FnMut(&AnimatedItem<S>) -> Option<S>) -> usize {
        let mut changed = 0;
        for item in &mut self.items {
            let Some(next) = rule(item) else { continue };
            if next == item.stage {
                continue;
            }
            if next.rank() < item.stage.rank() {
                log::warn!(
                    "Ignoring stage regression {:?} -> {:?} for item {}",
                    item.stage,
                    next,
                    item.id
                );
                continue;
            }
            item.stage = next;
            changed += 1;
        }
        changed
    }

    /// Remove every item for which `gone` holds. Returns how many were removed.
    pub fn evict(&mut self, mut gone: impl FnMut(&AnimatedItem<S>) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !gone(item));
        before - self.items.len()
    }

    pub fn items(&self) -> &[AnimatedItem<S>] {
        &self.items
    }

    pub fn get(&self, id: u32) -> Option<&AnimatedItem<S>> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Step {
        First,
        Second,
        Third,
    }

    impl Lifecycle for Step {
        fn rank(self) -> u8 {
            self as u8
        }
    }

    #[test]
    fn test_spawn_assigns_unique_ids() {
        let mut pool = EntityPool::new();
        let a = pool.spawn(Step::First, 0.0);
        let b = pool.spawn(Step::First, 0.0);
        pool.evict(|item| item.id == a);
        let c = pool.spawn(Step::First, 0.0);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_advance_moves_everything() {
        let mut pool = EntityPool::new();
        pool.spawn(Step::First, -10.0);
        pool.spawn(Step::First, 40.0);
        pool.advance(1.5);
        let positions: Vec<f32> = pool.items().iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![-8.5, 41.5]);

        // Negative steps never move items backward
        pool.advance(-5.0);
        assert_eq!(pool.items()[0].position, -8.5);
    }

    #[test]
    fn test_transition_refuses_regression() {
        let mut pool = EntityPool::new();
        let id = pool.spawn(Step::Second, 0.0);
        assert_eq!(pool.transition(|_| Some(Step::First)), 0);
        assert_eq!(pool.get(id).map(|i| i.stage), Some(Step::Second));

        assert_eq!(pool.transition(|_| Some(Step::Third)), 1);
        assert_eq!(pool.get(id).map(|i| i.stage), Some(Step::Third));
    }

    #[test]
    fn test_evict_keeps_order() {
        let mut pool = EntityPool::new();
        for p in [10.0, 120.0, 30.0, 106.0] {
            pool.spawn(Step::First, p);
        }
        assert_eq!(pool.evict(|i| i.position >= 105.0), 2);
        let positions: Vec<f32> = pool.items().iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![10.0, 30.0]);
        assert!(!pool.is_empty());
    }
}
