//! Static lesson material
//!
//! Loaded once, never mutated.

use serde::{Deserialize, Serialize};

/// The two processing styles the lessons compare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approach {
    Batch,
    Stream,
}

impl Approach {
    pub fn as_str(&self) -> &'static str {
        match self {
            Approach::Batch => "batch",
            Approach::Stream => "stream",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "batch" => Some(Approach::Batch),
            "stream" => Some(Approach::Stream),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Approach::Batch => "Batch Processing",
            Approach::Stream => "Stream Processing",
        }
    }
}

/// A "which would you use?" exercise
#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    pub id: u32,
    pub description: &'static str,
    pub correct: Approach,
    pub explanation: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: &'static str,
    pub options: &'static [&'static str],
    pub correct_index: usize,
}

/// One side of the comparison table
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonColumn {
    pub approach: Approach,
    pub latency: &'static str,
    pub data_size: &'static str,
    pub trigger: &'static str,
    pub quote: &'static str,
}

pub static SCENARIOS: [Scenario; 4] = [
    Scenario {
        id: 1,
        description: "Calculate monthly payroll for 50,000 employees.",
        correct: Approach::Batch,
        explanation: "Payroll is a periodic event (once a month). You need all the data from \
                      the month before you calculate. High throughput, low urgency.",
    },
    Scenario {
        id: 2,
        description: "Monitor IoT temperature sensors to prevent engine overheating.",
        correct: Approach::Stream,
        explanation: "If an engine overheats, you need to know NOW. Waiting for a nightly \
                      report would result in a broken engine.",
    },
    Scenario {
        id: 3,
        description: "Generate end-of-year financial statements.",
        correct: Approach::Batch,
        explanation: "This requires aggregating a massive amount of historical data once. \
                      Speed is not critical; accuracy and completeness are.",
    },
    Scenario {
        id: 4,
        description: "Recommend a movie based on what the user just clicked.",
        correct: Approach::Stream,
        explanation: "The user is engaged right now. If you wait until tomorrow to recommend \
                      a movie, they will have left the site.",
    },
];

pub static QUIZ: [QuizQuestion; 3] = [
    QuizQuestion {
        id: 1,
        question: "Which method typically has lower latency?",
        options: &["Batch Processing", "Stream Processing"],
        correct_index: 1,
    },
    QuizQuestion {
        id: 2,
        question: "Processing monthly payroll is a classic example of...",
        options: &["Stream Processing", "Batch Processing", "Real-time Processing"],
        correct_index: 1,
    },
    QuizQuestion {
        id: 3,
        question: "Stream processing is triggered by...",
        options: &["A Schedule (Time)", "An Event (Data Creation)", "A Manager"],
        correct_index: 1,
    },
];

pub static COMPARISON: [ComparisonColumn; 2] = [
    ComparisonColumn {
        approach: Approach::Batch,
        latency: "Hours / Days",
        data_size: "Bounded (Finite)",
        trigger: "Schedule (Time)",
        quote: "I need to analyze all sales from last month.",
    },
    ComparisonColumn {
        approach: Approach::Stream,
        latency: "Milliseconds / Seconds",
        data_size: "Unbounded (Infinite)",
        trigger: "Event (Arrival)",
        quote: "I need to block this user immediately.",
    },
];

/// Analogy blurbs for the laundry cards
pub const BATCH_ANALOGY: &str = "Wait until the basket is full, then process everything at \
                                 once. Efficient for water, but you wait a week for clean socks.";
pub const STREAM_ANALOGY: &str = "Wash every sock the moment you take it off. Instant results, \
                                  but runs the machine constantly.";
pub const WHY_STREAM: &str = "We can't wait until midnight to stop a fraudulent credit card \
                              transaction. We need near-zero latency.";
pub const ETL_NOTE: &str = "While processing, the system is under heavy load. Output is only \
                            available at the end.";
