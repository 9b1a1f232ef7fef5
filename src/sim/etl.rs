//! Nightly ETL job
//!
//! Records trickle into the source database on one clock; a job run advances
//! a progress bar on a second, independent clock. The job length is fixed and
//! does not depend on how many records are waiting.

use serde::Serialize;

use super::clock::{RepeatingTask, Simulation};
use super::random::RandomSource;
use crate::consts::*;

#[derive(Debug, Clone, Serialize)]
pub struct EtlFrame {
    pub records: u64,
    pub running: bool,
    pub progress: u8,
    pub report_ready: bool,
}

#[derive(Debug, Clone)]
pub struct EtlJob {
    /// Fires while idle; each tick adds a random number of records
    arrivals: RepeatingTask,
    /// Fires while a job runs; each tick adds progress
    progress_clock: RepeatingTask,
    records: u64,
    progress: u8,
    running: bool,
    report_ready: bool,
}

impl Default for EtlJob {
    fn default() -> Self {
        Self::new()
    }
}

impl EtlJob {
    pub fn new() -> Self {
        Self {
            arrivals: RepeatingTask::start(ETL_ACCUMULATE_MS),
            progress_clock: RepeatingTask::paused(ETL_PROGRESS_MS),
            records: ETL_INITIAL_RECORDS,
            progress: 0,
            running: false,
            report_ready: false,
        }
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn report_ready(&self) -> bool {
        self.report_ready
    }

    /// Kick off the job. Rejected while a run is in progress.
    pub fn run(&mut self) -> bool {
        if self.running {
            log::warn!("ETL job already running ({}%)", self.progress);
            return false;
        }
        self.running = true;
        self.report_ready = false;
        self.progress = 0;
        self.arrivals.pause();
        self.progress_clock.resume();
        log::info!("ETL job started over {} records", self.records);
        true
    }

    fn step_progress(&mut self) {
        if !self.running {
            return;
        }
        self.progress = self.progress.saturating_add(ETL_PROGRESS_STEP).min(100);
        if self.progress >= 100 {
            self.running = false;
            self.report_ready = true;
            self.progress_clock.pause();
            self.arrivals.resume();
            log::info!("ETL job finished; summary report ready");
        }
    }

    pub fn frame(&self) -> EtlFrame {
        EtlFrame {
            records: self.records,
            running: self.running,
            progress: self.progress,
            report_ready: self.report_ready,
        }
    }
}

impl Simulation for EtlJob {
    fn advance(&mut self, elapsed_ms: f64, rng: &mut dyn RandomSource) -> u32 {
        let arrivals = self.arrivals.advance(elapsed_ms);
        for _ in 0..arrivals {
            self.records += u64::from(rng.below(ETL_MAX_ARRIVALS));
        }

        let steps = self.progress_clock.advance(elapsed_ms);
        for _ in 0..steps {
            self.step_progress();
        }
        arrivals + steps
    }

    fn cancel(&mut self) {
        self.arrivals.cancel();
        self.progress_clock.cancel();
    }
}
