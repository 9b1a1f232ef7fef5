//! Frame output for the headless harness
//!
//! Draws a simulation as one line of text, or serializes its frame as JSON.

use serde::Serialize;

use crate::app::{Tab, View};
use crate::sim::{BasketPhase, GarmentStage, TxStatus};

/// Width of the ASCII conveyor track
const TRACK_WIDTH: usize = 60;

/// Which simulation to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "wasm32"), derive(clap::ValueEnum))]
pub enum Feed {
    /// Laundry stream (concept tab)
    Laundry,
    /// Laundry basket (concept tab)
    Basket,
    /// Nightly ETL job (batch tab)
    Etl,
    /// Fraud scanner conveyor (stream tab)
    Fraud,
}

impl Feed {
    /// Tab that hosts this simulation
    pub fn tab(&self) -> Tab {
        match self {
            Feed::Laundry | Feed::Basket => Tab::Concept,
            Feed::Etl => Tab::Batch,
            Feed::Fraud => Tab::Stream,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Feed::Laundry => "laundry",
            Feed::Basket => "basket",
            Feed::Etl => "etl",
            Feed::Fraud => "fraud",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "wasm32"), derive(clap::ValueEnum))]
pub enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonFrame<'a, T: Serialize> {
    at_ms: u64,
    sim: &'a str,
    frame: T,
}

/// Render `feed` from `view` at `at_ms`. `None` if the view doesn't host the feed.
pub fn render(feed: Feed, view: &View, at_ms: u64, format: Format) -> Option<String> {
    match format {
        Format::Text => text(feed, view).map(|line| format!("{:>7}ms {}", at_ms, line)),
        Format::Json => json(feed, view, at_ms),
    }
}

fn json(feed: Feed, view: &View, at_ms: u64) -> Option<String> {
    fn encode<T: Serialize>(feed: Feed, at_ms: u64, frame: T) -> Option<String> {
        let frame = JsonFrame {
            at_ms,
            sim: feed.name(),
            frame,
        };
        match serde_json::to_string(&frame) {
            Ok(line) => Some(line),
            Err(e) => {
                log::error!("Failed to encode frame: {}", e);
                None
            }
        }
    }

    match (feed, view) {
        (Feed::Laundry, View::Concept(v)) => encode(feed, at_ms, v.laundry.frame()),
        (Feed::Basket, View::Concept(v)) => encode(feed, at_ms, v.basket.frame()),
        (Feed::Etl, View::Batch(job)) => encode(feed, at_ms, job.frame()),
        (Feed::Fraud, View::Stream(scanner)) => encode(feed, at_ms, scanner.frame()),
        _ => None,
    }
}

fn text(feed: Feed, view: &View) -> Option<String> {
    match (feed, view) {
        (Feed::Laundry, View::Concept(v)) => {
            let items: Vec<String> = v
                .laundry
                .garments()
                .iter()
                .map(|g| {
                    let stage = match g.stage {
                        GarmentStage::Dirty => "dirty",
                        GarmentStage::Washing => "washing",
                        GarmentStage::Clean => "clean",
                    };
                    format!("#{}:{}@{}ms", g.id, stage, g.position)
                })
                .collect();
            Some(format!(
                "[{}] {}",
                if v.laundry.is_running() { "on " } else { "off" },
                items.join(" ")
            ))
        }
        (Feed::Basket, View::Concept(v)) => {
            let basket = &v.basket;
            let filled = basket.count() as usize;
            let empty = (basket.capacity() as usize).saturating_sub(filled);
            let status = match basket.phase() {
                BasketPhase::Accumulating => "filling",
                BasketPhase::Ready => "ready",
                BasketPhase::Processing => "washing...",
                BasketPhase::Completed => "All Clean!",
            };
            Some(format!(
                "[{}{}] {}/{} {}",
                "#".repeat(filled),
                ".".repeat(empty),
                basket.count(),
                basket.capacity(),
                status
            ))
        }
        (Feed::Etl, View::Batch(job)) => {
            let done = usize::from(job.progress()) / 5;
            Some(format!(
                "records={} [{}{}] {:>3}% {}{}",
                job.records(),
                "=".repeat(done),
                " ".repeat(20 - done.min(20)),
                job.progress(),
                if job.is_running() { "RUNNING" } else { "IDLE" },
                if job.report_ready() { " report ready" } else { "" }
            ))
        }
        (Feed::Fraud, View::Stream(scanner)) => {
            let mut track = vec!['-'; TRACK_WIDTH + 1];
            let scanner_col = column(crate::consts::SCANNER_POS);
            if let Some(col) = scanner_col {
                track[col] = '|';
            }
            for tx in scanner.transactions() {
                let Some(col) = column(tx.position) else {
                    continue;
                };
                track[col] = match tx.stage {
                    TxStatus::Pending => 'o',
                    TxStatus::Scanning => 's',
                    TxStatus::Approved => 'A',
                    TxStatus::Fraud => 'X',
                };
            }
            Some(format!(
                "{} ok={} fraud={}",
                track.into_iter().collect::<String>(),
                scanner.approved_count(),
                scanner.flagged_count()
            ))
        }
        _ => None,
    }
}

/// Map a track percentage to a column, `None` when off-screen
fn column(position: f32) -> Option<usize> {
    if !(0.0..=100.0).contains(&position) {
        return None;
    }
    Some(((position / 100.0) * TRACK_WIDTH as f32).round() as usize)
}
