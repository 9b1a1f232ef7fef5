//! Laundry basket: the batch side of the laundry analogy
//!
//! Items pile up until the basket is full. Only a full basket can be washed,
//! and a wash always takes the same time no matter what is in it.

use serde::{Deserialize, Serialize};

use super::clock::{RepeatingTask, Simulation};
use super::random::RandomSource;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasketPhase {
    /// Filling up on the fill timer
    Accumulating,
    /// Full; waiting for someone to start the wash
    Ready,
    /// Wash in progress
    Processing,
    /// Showing "All Clean!" before filling again
    Completed,
}

#[derive(Debug, Clone, Serialize)]
pub struct BasketFrame {
    pub phase: BasketPhase,
    pub count: u32,
    pub capacity: u32,
    pub fill_percent: u32,
    pub can_run: bool,
}

#[derive(Debug, Clone)]
pub struct LaundryBasket {
    clock: RepeatingTask,
    capacity: u32,
    count: u32,
    phase: BasketPhase,
    /// Time spent in the current phase (or since the last item, while filling)
    phase_ms: u32,
}

impl Default for LaundryBasket {
    fn default() -> Self {
        Self::new()
    }
}

impl LaundryBasket {
    pub fn new() -> Self {
        Self::with_capacity(BASKET_CAPACITY)
    }

    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            clock: RepeatingTask::start(BASKET_TICK_MS),
            capacity: capacity.max(1),
            count: 0,
            phase: BasketPhase::Accumulating,
            phase_ms: 0,
        }
    }

    pub fn phase(&self) -> BasketPhase {
        self.phase
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn fill_percent(&self) -> u32 {
        self.count * 100 / self.capacity
    }

    pub fn can_run(&self) -> bool {
        self.phase == BasketPhase::Ready
    }

    /// Start the wash. A no-op unless the basket is full and idle.
    pub fn run(&mut self) -> bool {
        if !self.can_run() {
            log::warn!(
                "Wash rejected in {:?} ({}/{})",
                self.phase,
                self.count,
                self.capacity
            );
            return false;
        }
        self.phase = BasketPhase::Processing;
        self.phase_ms = 0;
        log::info!("Weekly wash started with {} items", self.count);
        true
    }

    pub fn tick(&mut self) {
        self.phase_ms += self.clock.period_ms();

        match self.phase {
            BasketPhase::Accumulating => {
                while self.phase_ms >= BASKET_FILL_MS && self.count < self.capacity {
                    self.phase_ms -= BASKET_FILL_MS;
                    self.count += 1;
                }
                if self.count >= self.capacity {
                    self.phase = BasketPhase::Ready;
                    self.phase_ms = 0;
                }
            }
            BasketPhase::Ready => self.phase_ms = 0,
            BasketPhase::Processing => {
                if self.phase_ms >= BASKET_WASH_MS {
                    self.count = 0;
                    self.phase = BasketPhase::Completed;
                    self.phase_ms = 0;
                    log::info!("Weekly wash finished");
                }
            }
            BasketPhase::Completed => {
                if self.phase_ms >= BASKET_DONE_MS {
                    self.phase = BasketPhase::Accumulating;
                    self.phase_ms = 0;
                }
            }
        }
    }

    pub fn frame(&self) -> BasketFrame {
        BasketFrame {
            phase: self.phase,
            count: self.count,
            capacity: self.capacity,
            fill_percent: self.fill_percent(),
            can_run: self.can_run(),
        }
    }
}

impl Simulation for LaundryBasket {
    fn advance(&mut self, elapsed_ms: f64, _rng: &mut dyn RandomSource) -> u32 {
        let ticks = self.clock.advance(elapsed_ms);
        for _ in 0..ticks {
            self.tick();
        }
        ticks
    }

    fn cancel(&mut self) {
        self.clock.cancel();
    }
}
