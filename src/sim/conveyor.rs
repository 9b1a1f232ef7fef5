//! Fraud scanner conveyor
//!
//! Card transactions ride a belt across the screen. Each one is judged the
//! moment it reaches the scanner, which is the whole point of the lesson:
//! stream processing handles every event as it arrives.

use serde::{Deserialize, Serialize};

use super::clock::{RepeatingTask, Simulation};
use super::pool::{AnimatedItem, EntityPool, Lifecycle};
use super::random::RandomSource;
use crate::consts::*;

/// Where a transaction is in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    Pending,
    /// Inside the scanner window, verdict not yet drawn
    Scanning,
    Approved,
    Fraud,
}

impl Lifecycle for TxStatus {
    fn rank(self) -> u8 {
        match self {
            TxStatus::Pending => 0,
            TxStatus::Scanning => 1,
            TxStatus::Approved | TxStatus::Fraud => 2,
        }
    }
}

impl TxStatus {
    /// Badge text shown under the card icon
    pub fn label(self) -> &'static str {
        match self {
            TxStatus::Pending | TxStatus::Scanning => "...",
            TxStatus::Approved => "OK",
            TxStatus::Fraud => "FRAUD",
        }
    }

    pub fn is_verdict(self) -> bool {
        matches!(self, TxStatus::Approved | TxStatus::Fraud)
    }
}

pub type Transaction = AnimatedItem<TxStatus>;

/// What a renderer needs to draw the belt
#[derive(Debug, Clone, Serialize)]
pub struct ConveyorFrame {
    pub running: bool,
    pub transactions: Vec<Transaction>,
    pub approved: u64,
    pub flagged: u64,
}

/// The real-time fraud detection simulation
#[derive(Debug, Clone)]
pub struct FraudScanner {
    clock: RepeatingTask,
    pool: EntityPool<TxStatus>,
    approved: u64,
    flagged: u64,
}

impl Default for FraudScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FraudScanner {
    pub fn new() -> Self {
        Self {
            clock: RepeatingTask::start(CONVEYOR_TICK_MS),
            pool: EntityPool::new(),
            approved: 0,
            flagged: 0,
        }
    }

    /// Start with the belt stopped
    pub fn paused() -> Self {
        Self {
            clock: RepeatingTask::paused(CONVEYOR_TICK_MS),
            ..Self::new()
        }
    }

    pub fn clock(&self) -> &RepeatingTask {
        &self.clock
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Pause or resume the belt. Returns whether it now runs.
    pub fn toggle(&mut self) -> bool {
        let running = self.clock.toggle();
        log::info!("Fraud scanner {}", if running { "resumed" } else { "paused" });
        running
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.pool.items()
    }

    pub fn approved_count(&self) -> u64 {
        self.approved
    }

    pub fn flagged_count(&self) -> u64 {
        self.flagged
    }

    /// Put a pending transaction on the belt at `position`
    pub fn admit(&mut self, position: f32) -> u32 {
        let id = self.pool.spawn(TxStatus::Pending, position);
        log::debug!("Transaction {} enters at {:.1}%", id, position);
        id
    }

    /// One conveyor step: move, scan, drop off-screen items, maybe spawn
    pub fn tick(&mut self, rng: &mut dyn RandomSource) {
        self.pool.advance(CONVEYOR_STEP);

        let approved = &mut self.approved;
        let flagged = &mut self.flagged;
        self.pool.transition(|tx| match tx.stage {
            TxStatus::Pending | TxStatus::Scanning if tx.position >= SCANNER_POS => {
                if rng.chance(FRAUD_CHANCE) {
                    *flagged += 1;
                    log::debug!("Transaction {} flagged as fraud", tx.id);
                    Some(TxStatus::Fraud)
                } else {
                    *approved += 1;
                    Some(TxStatus::Approved)
                }
            }
            TxStatus::Pending if tx.position >= SCANNER_POS - SCAN_WINDOW => {
                Some(TxStatus::Scanning)
            }
            _ => None,
        });

        self.pool.evict(|tx| tx.position >= CONVEYOR_END);

        if rng.chance(SPAWN_CHANCE) {
            self.admit(CONVEYOR_ORIGIN);
        }
    }

    pub fn frame(&self) -> ConveyorFrame {
        ConveyorFrame {
            running: self.is_running(),
            transactions: self.pool.items().to_vec(),
            approved: self.approved,
            flagged: self.flagged,
        }
    }
}

impl Simulation for FraudScanner {
    fn advance(&mut self, elapsed_ms: f64, rng: &mut dyn RandomSource) -> u32 {
        let ticks = self.clock.advance(elapsed_ms);
        for _ in 0..ticks {
            self.tick(rng);
        }
        ticks
    }

    fn cancel(&mut self) {
        self.clock.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::{ScriptedRandom, SeededRandom};
    use proptest::prelude::*;

    #[test]
    fn test_verdict_after_crossing_scanner() {
        let mut scanner = FraudScanner::new();
        let id = scanner.admit(0.0);
        let mut rng = ScriptedRandom::new();

        // 0 -> 49.5 takes 33 steps of 1.5
        for _ in 0..33 {
            scanner.tick(&mut rng);
        }
        let tx = scanner.pool.get(id).cloned();
        assert_eq!(tx.map(|t| t.stage), Some(TxStatus::Scanning));

        scanner.tick(&mut rng);
        let stage = scanner.pool.get(id).map(|t| t.stage);
        assert!(matches!(stage, Some(TxStatus::Approved | TxStatus::Fraud)));
    }

    #[test]
    fn test_scripted_fraud_verdict() {
        let mut scanner = FraudScanner::new();
        let id = scanner.admit(SCANNER_POS - 1.0);
        // First draw is the verdict, second the spawn roll
        let mut rng = ScriptedRandom::new().with_chances([true, false]);
        scanner.tick(&mut rng);

        assert_eq!(scanner.pool.get(id).map(|t| t.stage), Some(TxStatus::Fraud));
        assert_eq!(scanner.flagged_count(), 1);
        assert_eq!(scanner.approved_count(), 0);
        assert_eq!(scanner.transactions().len(), 1);
    }

    #[test]
    fn test_spawn_at_origin_pending() {
        let mut scanner = FraudScanner::new();
        let mut rng = ScriptedRandom::new().with_chances([true]);
        scanner.tick(&mut rng);

        let txs = scanner.transactions();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].stage, TxStatus::Pending);
        assert_eq!(txs[0].position, CONVEYOR_ORIGIN);
    }

    #[test]
    fn test_evicted_off_screen() {
        let mut scanner = FraudScanner::new();
        scanner.admit(CONVEYOR_END - 1.0);
        scanner.tick(&mut ScriptedRandom::new());
        assert!(scanner.transactions().is_empty());
    }

    #[test]
    fn test_cancel_stops_mutation() {
        let mut scanner = FraudScanner::new();
        scanner.admit(10.0);
        scanner.cancel();
        let before = scanner.frame().transactions;

        let mut rng = SeededRandom::new(1);
        assert_eq!(scanner.advance(5_000.0, &mut rng), 0);
        assert_eq!(scanner.frame().transactions, before);
    }

    #[test]
    fn test_toggle_pauses_belt() {
        let mut scanner = FraudScanner::new();
        scanner.admit(0.0);
        assert!(!scanner.toggle());
        let mut rng = SeededRandom::new(1);
        assert_eq!(scanner.advance(500.0, &mut rng), 0);
        assert_eq!(scanner.transactions()[0].position, 0.0);

        assert!(scanner.toggle());
        assert_eq!(scanner.advance(50.0, &mut rng), 1);
        assert_eq!(scanner.transactions()[0].position, CONVEYOR_STEP);
    }

    proptest! {
        #[test]
        fn prop_positions_and_stages_move_forward(seed in any::<u64>(), ticks in 1usize..400) {
            let mut scanner = FraudScanner::new();
            let mut rng = SeededRandom::new(seed);
            let mut seen: std::collections::HashMap<u32, (f32, u8)> = Default::default();

            for _ in 0..ticks {
                scanner.tick(&mut rng);
                for tx in scanner.transactions() {
                    prop_assert!(tx.position < CONVEYOR_END);
                    if tx.position >= SCANNER_POS {
                        prop_assert!(tx.stage.is_verdict());
                    }
                    if let Some(&(pos, rank)) = seen.get(&tx.id) {
                        prop_assert!(tx.position >= pos);
                        prop_assert!(tx.stage.rank() >= rank);
                    }
                    seen.insert(tx.id, (tx.position, tx.stage.rank()));
                }
                let mut ids: Vec<u32> = scanner.transactions().iter().map(|t| t.id).collect();
                ids.dedup();
                prop_assert_eq!(ids.len(), scanner.transactions().len());
            }
        }
    }
}
