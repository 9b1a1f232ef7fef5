//! Deterministic simulation module
//!
//! Every animation in the lessons lives here. This module must be pure and deterministic:
//! - Time only enters through `RepeatingTask::advance`
//! - Randomness only enters through a `RandomSource`
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod basket;
pub mod clock;
pub mod conveyor;
pub mod etl;
pub mod laundry;
pub mod pool;
pub mod random;

pub use basket::{BasketFrame, BasketPhase, LaundryBasket};
pub use clock::{ClockState, RepeatingTask, Simulation};
pub use conveyor::{ConveyorFrame, FraudScanner, Transaction, TxStatus};
pub use etl::{EtlFrame, EtlJob};
pub use laundry::{Garment, GarmentStage, LaundryFrame, LaundryStream};
pub use pool::{AnimatedItem, EntityPool, Lifecycle};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
