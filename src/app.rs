//! Tab navigation and per-view state
//!
//! Each tab owns its state in a `View`. Switching tabs cancels the old view's
//! clocks and mounts a fresh view, so nothing keeps ticking for a tab that is
//! no longer on screen.

use serde::{Deserialize, Serialize};

use crate::content::Approach;
use crate::exercises::{ComparisonSlider, Feedback, QuizSession, ScenarioDeck};
use crate::settings::Settings;
use crate::sim::{
    EtlJob, FraudScanner, LaundryBasket, LaundryStream, RandomSource, SeededRandom, Simulation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Concept,
    Batch,
    Stream,
    Comparison,
    UseCases,
    Quiz,
}

impl Tab {
    /// Navigation order
    pub const ALL: [Tab; 6] = [
        Tab::Concept,
        Tab::Batch,
        Tab::Stream,
        Tab::Comparison,
        Tab::UseCases,
        Tab::Quiz,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Tab::Concept => "concept",
            Tab::Batch => "batch",
            Tab::Stream => "stream",
            Tab::Comparison => "comparison",
            Tab::UseCases => "use_cases",
            Tab::Quiz => "quiz",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    /// Navigation label
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Concept => "The Core Concept",
            Tab::Batch => "Batch Processing",
            Tab::Stream => "Stream Processing",
            Tab::Comparison => "Comparison",
            Tab::UseCases => "Use Cases",
            Tab::Quiz => "Summary & Quiz",
        }
    }

    /// Page heading and subtitle
    pub fn heading(&self) -> (&'static str, &'static str) {
        match self {
            Tab::Concept => (
                "The Core Concept: The Laundry Analogy",
                "Understanding the difference between accumulating tasks vs. handling them immediately.",
            ),
            Tab::Batch => (
                "Batch Processing: The Nightly Job",
                "Processing huge volumes of data at scheduled intervals. Think of it like a \
                 scheduled nightly report generation.",
            ),
            Tab::Stream => (
                "Stream Processing: The Real-Time Feed",
                "Processing data event-by-event as it happens. Example: Real-time fraud detection.",
            ),
            Tab::Comparison => (
                "Technical Showdown",
                "Move the slider to see how requirements dictate the architecture.",
            ),
            Tab::UseCases => (
                "Architect's Choice",
                "You are the Data Architect. Choose the right tool for the job.",
            ),
            Tab::Quiz => ("Knowledge Check", "Let's see what you've learned."),
        }
    }
}

/// Both halves of the laundry analogy, each on its own clock
#[derive(Debug, Clone)]
pub struct ConceptView {
    pub basket: LaundryBasket,
    pub laundry: LaundryStream,
}

/// State owned by the active tab
#[derive(Debug, Clone)]
pub enum View {
    Concept(ConceptView),
    Batch(EtlJob),
    Stream(FraudScanner),
    Comparison(ComparisonSlider),
    UseCases(ScenarioDeck),
    Quiz(QuizSession),
}

impl View {
    /// Build fresh state for `tab`
    pub fn mount(tab: Tab, settings: &Settings) -> Self {
        match tab {
            Tab::Concept => View::Concept(ConceptView {
                basket: LaundryBasket::new(),
                laundry: LaundryStream::new(settings.stream_autoplay),
            }),
            Tab::Batch => View::Batch(EtlJob::new()),
            Tab::Stream => View::Stream(if settings.stream_autoplay {
                FraudScanner::new()
            } else {
                FraudScanner::paused()
            }),
            Tab::Comparison => View::Comparison(ComparisonSlider::new()),
            Tab::UseCases => View::UseCases(ScenarioDeck::new()),
            Tab::Quiz => View::Quiz(QuizSession::new()),
        }
    }

    pub fn tab(&self) -> Tab {
        match self {
            View::Concept(_) => Tab::Concept,
            View::Batch(_) => Tab::Batch,
            View::Stream(_) => Tab::Stream,
            View::Comparison(_) => Tab::Comparison,
            View::UseCases(_) => Tab::UseCases,
            View::Quiz(_) => Tab::Quiz,
        }
    }

    /// Feed elapsed time to every clock the view owns
    pub fn advance(&mut self, elapsed_ms: f64, rng: &mut dyn RandomSource) -> u32 {
        match self {
            View::Concept(view) => {
                view.basket.advance(elapsed_ms, rng) + view.laundry.advance(elapsed_ms, rng)
            }
            View::Batch(job) => job.advance(elapsed_ms, rng),
            View::Stream(scanner) => scanner.advance(elapsed_ms, rng),
            View::Comparison(_) | View::UseCases(_) | View::Quiz(_) => 0,
        }
    }

    /// Cancel every clock the view owns
    pub fn teardown(&mut self) {
        match self {
            View::Concept(view) => {
                view.basket.cancel();
                view.laundry.cancel();
            }
            View::Batch(job) => job.cancel(),
            View::Stream(scanner) => scanner.cancel(),
            View::Comparison(_) | View::UseCases(_) | View::Quiz(_) => {}
        }
    }
}

/// A user action from any front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectTab(Tab),
    RunWash,
    ToggleLaundry,
    RunEtl,
    ToggleConveyor,
    Slide(i64),
    Choose(Approach),
    NextScenario,
    Answer { question: u32, option: usize },
    SubmitQuiz,
    ResetQuiz,
}

/// Result of dispatching an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed; re-render
    Changed,
    /// Not applicable to the current state (disabled control, wrong tab)
    Ignored,
    /// Rejected with a notice for the user
    Notice(String),
}

/// The whole application: settings, randomness and the active view
pub struct App<R: RandomSource = SeededRandom> {
    settings: Settings,
    rng: R,
    view: View,
}

impl App<SeededRandom> {
    /// Create the app, seeding from settings when a seed is configured
    pub fn new(settings: Settings, fallback_seed: u64) -> Self {
        let seed = settings.seed.unwrap_or(fallback_seed);
        log::info!("Seeding simulations with {}", seed);
        Self::with_random(settings, SeededRandom::new(seed))
    }
}

impl<R: RandomSource> App<R> {
    pub fn with_random(settings: Settings, rng: R) -> Self {
        let view = View::mount(settings.start_tab, &settings);
        Self {
            settings,
            rng,
            view,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn active_tab(&self) -> Tab {
        self.view.tab()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    /// Switch tabs. Re-selecting the active tab keeps its state.
    pub fn select_tab(&mut self, tab: Tab) -> bool {
        if tab == self.active_tab() {
            return false;
        }
        // Dropping the old view cancels its clocks
        self.view = View::mount(tab, &self.settings);
        log::info!("Switched to tab '{}'", tab.id());
        true
    }

    /// Advance the active view by real elapsed time. Returns ticks run.
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        let elapsed = self.settings.scale_elapsed(elapsed_ms);
        self.view.advance(elapsed, &mut self.rng)
    }

    pub fn dispatch(&mut self, action: Action) -> Outcome {
        if let Action::SelectTab(tab) = action {
            return if self.select_tab(tab) {
                Outcome::Changed
            } else {
                Outcome::Ignored
            };
        }

        let changed = match (action, &mut self.view) {
            (Action::RunWash, View::Concept(view)) => view.basket.run(),
            (Action::ToggleLaundry, View::Concept(view)) => {
                view.laundry.toggle();
                true
            }
            (Action::RunEtl, View::Batch(job)) => job.run(),
            (Action::ToggleConveyor, View::Stream(scanner)) => {
                scanner.toggle();
                true
            }
            (Action::Slide(value), View::Comparison(slider)) => {
                let before = slider.value();
                slider.set(value);
                slider.value() != before
            }
            (Action::Choose(choice), View::UseCases(deck)) => {
                let fresh = deck.feedback().is_none();
                let feedback = deck.choose(choice);
                log::debug!("Scenario answered: {:?}", feedback);
                fresh
            }
            (Action::NextScenario, View::UseCases(deck)) => {
                deck.next();
                true
            }
            (Action::Answer { question, option }, View::Quiz(quiz)) => {
                quiz.select(question, option)
            }
            (Action::SubmitQuiz, View::Quiz(quiz)) => match quiz.submit() {
                Ok(_) => true,
                Err(err) => return Outcome::Notice(err.to_string()),
            },
            (Action::ResetQuiz, View::Quiz(quiz)) => {
                quiz.reset();
                true
            }
            _ => false,
        };

        if changed {
            Outcome::Changed
        } else {
            Outcome::Ignored
        }
    }

    /// Feedback for the current scenario, if on the use-case tab
    pub fn scenario_feedback(&self) -> Option<Feedback> {
        match &self.view {
            View::UseCases(deck) => deck.feedback(),
            _ => None,
        }
    }
}

impl Drop for View {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ScriptedRandom;

    fn app() -> App<ScriptedRandom> {
        App::with_random(Settings::default(), ScriptedRandom::new())
    }

    #[test]
    fn test_starts_on_concept() {
        let app = app();
        assert_eq!(app.active_tab(), Tab::Concept);
        assert!(matches!(app.view(), View::Concept(_)));
    }

    #[test]
    fn test_tab_ids_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(Tab::from_id(tab.id()), Some(tab));
        }
        assert_eq!(Tab::from_id("nope"), None);
    }

    #[test]
    fn test_switching_tabs_resets_state() {
        let mut app = app();
        app.select_tab(Tab::Quiz);
        app.dispatch(Action::Answer {
            question: 1,
            option: 1,
        });
        app.select_tab(Tab::Comparison);
        app.select_tab(Tab::Quiz);
        let View::Quiz(quiz) = app.view() else {
            panic!("expected quiz view");
        };
        assert_eq!(quiz.answered(), 0);
    }

    #[test]
    fn test_reselecting_tab_keeps_state() {
        let mut app = app();
        // One item lands per 800 ms
        for _ in 0..12 {
            app.advance(100.0);
        }
        assert!(!app.select_tab(Tab::Concept));
        let View::Concept(view) = app.view() else {
            panic!("expected concept view");
        };
        assert_eq!(view.basket.count(), 1);
    }

    #[test]
    fn test_old_view_stops_ticking() {
        let mut app = app();
        app.select_tab(Tab::Stream);
        let mut old = std::mem::replace(app.view_mut(), View::mount(Tab::Quiz, &Settings::default()));
        old.teardown();
        let mut rng = ScriptedRandom::new().with_chances([true; 100]);
        assert_eq!(old.advance(10_000.0, &mut rng), 0);
    }

    #[test]
    fn test_actions_for_other_tabs_ignored() {
        let mut app = app();
        assert_eq!(app.dispatch(Action::RunEtl), Outcome::Ignored);
        assert_eq!(app.dispatch(Action::SubmitQuiz), Outcome::Ignored);
        // Basket isn't full yet
        assert_eq!(app.dispatch(Action::RunWash), Outcome::Ignored);
    }

    #[test]
    fn test_incomplete_quiz_gives_notice() {
        let mut app = app();
        app.select_tab(Tab::Quiz);
        let Outcome::Notice(notice) = app.dispatch(Action::SubmitQuiz) else {
            panic!("expected a notice");
        };
        assert!(notice.starts_with("Please answer all questions!"));
        let View::Quiz(quiz) = app.view() else {
            panic!("expected quiz view");
        };
        assert!(!quiz.is_submitted());
    }

    #[test]
    fn test_speed_scales_time() {
        let settings = Settings {
            speed: 2.0,
            start_tab: Tab::Batch,
            ..Default::default()
        };
        let mut app = App::with_random(settings, ScriptedRandom::new());
        app.dispatch(Action::RunEtl);
        // 75 ms of real time is one 150 ms progress tick at 2x
        app.advance(75.0);
        let View::Batch(job) = app.view() else {
            panic!("expected batch view");
        };
        assert_eq!(job.progress(), 5);
    }

    #[test]
    fn test_scenario_choice_once() {
        let mut app = app();
        app.select_tab(Tab::UseCases);
        assert_eq!(app.dispatch(Action::Choose(Approach::Stream)), Outcome::Changed);
        assert_eq!(app.scenario_feedback(), Some(Feedback::Incorrect));
        assert_eq!(app.dispatch(Action::Choose(Approach::Batch)), Outcome::Ignored);
        assert_eq!(app.dispatch(Action::NextScenario), Outcome::Changed);
        assert_eq!(app.scenario_feedback(), None);
    }
}
