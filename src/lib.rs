//! Data Pipelines - interactive lessons on batch vs stream processing
//!
//! Core modules:
//! - `sim`: Deterministic simulations (clocks, entity pools, batch machines)
//! - `content`: Static lesson material (scenarios, quiz, comparison table)
//! - `exercises`: Quiz, scenario and slider session state
//! - `app`: Tab navigation and per-view state ownership
//! - `settings`: Runtime configuration
//! - `ui`: HTML rendering and action encoding for the browser
//! - `trace`: Text/JSON frame rendering for the headless harness

pub mod app;
pub mod content;
pub mod exercises;
pub mod settings;
pub mod sim;
pub mod trace;
pub mod ui;

pub use app::{Action, App, Outcome, Tab, View};
pub use settings::{Settings, SettingsError};

/// Simulation timing and geometry constants
pub mod consts {
    /// Most ticks a single clock may fire for one frame; extra elapsed time is dropped
    pub const MAX_CATCHUP_TICKS: u32 = 4;

    /// Fraud scanner conveyor tick (ms)
    pub const CONVEYOR_TICK_MS: u32 = 50;
    /// Distance a transaction moves per tick (% of track)
    pub const CONVEYOR_STEP: f32 = 1.5;
    /// Where transactions enter the track (% of track, off-screen left)
    pub const CONVEYOR_ORIGIN: f32 = -10.0;
    /// Scanner bridge position (% of track)
    pub const SCANNER_POS: f32 = 50.0;
    /// Width of the window before the scanner where a transaction shows as scanning
    pub const SCAN_WINDOW: f32 = 5.0;
    /// Transactions past this point are off-screen
    pub const CONVEYOR_END: f32 = 105.0;
    /// Chance a scanned transaction is flagged
    pub const FRAUD_CHANCE: f64 = 0.2;
    /// Chance of a new transaction per tick (~1 per second at 50 ms)
    pub const SPAWN_CHANCE: f64 = 0.05;

    /// Laundry stream tick (ms)
    pub const LAUNDRY_TICK_MS: u32 = 100;
    /// A new dirty item arrives this often (ms)
    pub const LAUNDRY_SPAWN_MS: u32 = 2000;
    /// Age at which an item enters the machine (ms)
    pub const LAUNDRY_WASH_AT_MS: u32 = 500;
    /// Age at which an item comes out clean (ms)
    pub const LAUNDRY_CLEAN_AT_MS: u32 = 1500;
    /// Age at which an item leaves the screen (ms)
    pub const LAUNDRY_GONE_AT_MS: u32 = 2500;

    /// Laundry basket clock (ms)
    pub const BASKET_TICK_MS: u32 = 100;
    /// One item lands in the basket this often (ms)
    pub const BASKET_FILL_MS: u32 = 800;
    /// Basket capacity
    pub const BASKET_CAPACITY: u32 = 10;
    /// Length of a wash (ms), independent of basket size
    pub const BASKET_WASH_MS: u32 = 3000;
    /// How long "All Clean!" stays up (ms)
    pub const BASKET_DONE_MS: u32 = 2000;

    /// Daily transaction records at start
    pub const ETL_INITIAL_RECORDS: u64 = 100;
    /// New records arrive this often (ms)
    pub const ETL_ACCUMULATE_MS: u32 = 500;
    /// Exclusive upper bound of records arriving per accumulation tick
    pub const ETL_MAX_ARRIVALS: u32 = 50;
    /// ETL progress clock (ms)
    pub const ETL_PROGRESS_MS: u32 = 150;
    /// Progress gained per ETL tick (%)
    pub const ETL_PROGRESS_STEP: u8 = 5;
}
