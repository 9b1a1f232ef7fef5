//! Laundry stream: every sock is washed the moment it comes off
//!
//! An item's position is its age in milliseconds, so the stage rule is a pure
//! function of position.

use serde::{Deserialize, Serialize};

use super::clock::{RepeatingTask, Simulation};
use super::pool::{AnimatedItem, EntityPool, Lifecycle};
use super::random::RandomSource;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GarmentStage {
    Dirty,
    Washing,
    Clean,
}

impl Lifecycle for GarmentStage {
    fn rank(self) -> u8 {
        self as u8
    }
}

impl GarmentStage {
    /// Stage of an item that has existed for `age_ms`
    pub fn for_age(age_ms: f32) -> Self {
        if age_ms >= LAUNDRY_CLEAN_AT_MS as f32 {
            GarmentStage::Clean
        } else if age_ms >= LAUNDRY_WASH_AT_MS as f32 {
            GarmentStage::Washing
        } else {
            GarmentStage::Dirty
        }
    }
}

pub type Garment = AnimatedItem<GarmentStage>;

#[derive(Debug, Clone, Serialize)]
pub struct LaundryFrame {
    pub running: bool,
    pub garments: Vec<Garment>,
}

#[derive(Debug, Clone)]
pub struct LaundryStream {
    clock: RepeatingTask,
    pool: EntityPool<GarmentStage>,
    since_spawn_ms: u32,
}

impl LaundryStream {
    pub fn new(autoplay: bool) -> Self {
        let clock = if autoplay {
            RepeatingTask::start(LAUNDRY_TICK_MS)
        } else {
            RepeatingTask::paused(LAUNDRY_TICK_MS)
        };
        Self {
            clock,
            pool: EntityPool::new(),
            since_spawn_ms: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Play/pause button
    pub fn toggle(&mut self) -> bool {
        let running = self.clock.toggle();
        log::info!("Laundry stream {}", if running { "playing" } else { "paused" });
        running
    }

    pub fn garments(&self) -> &[Garment] {
        self.pool.items()
    }

    pub fn tick(&mut self) {
        let step = self.clock.period_ms();

        self.pool.advance(step as f32);
        self.pool
            .transition(|item| Some(GarmentStage::for_age(item.position)));
        self.pool
            .evict(|item| item.position >= LAUNDRY_GONE_AT_MS as f32);

        self.since_spawn_ms += step;
        if self.since_spawn_ms >= LAUNDRY_SPAWN_MS {
            self.since_spawn_ms -= LAUNDRY_SPAWN_MS;
            let id = self.pool.spawn(GarmentStage::Dirty, 0.0);
            log::debug!("Garment {} dropped in", id);
        }
    }

    pub fn frame(&self) -> LaundryFrame {
        LaundryFrame {
            running: self.is_running(),
            garments: self.pool.items().to_vec(),
        }
    }
}

impl Simulation for LaundryStream {
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
