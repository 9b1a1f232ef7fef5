//! HTML rendering for the browser front-end
//!
//! Pure string building so it can be tested natively. Every interactive
//! element carries a `data-action` attribute that `parse_action` turns back
//! into an [`Action`]; the DOM glue only forwards clicks.

use crate::app::{Action, App, Tab, View};
use crate::content::{self, Approach, COMPARISON};
use crate::exercises::{ComparisonSlider, Feedback, OptionMark, QuizSession, ScenarioDeck};
use crate::sim::{
    BasketPhase, EtlJob, FraudScanner, GarmentStage, LaundryBasket, LaundryStream, RandomSource,
    TxStatus,
};

/// ID of the comparison range input
pub const SLIDER_ID: &str = "comparison-slider";

/// Encode an action for a `data-action` attribute
pub fn action_attr(action: Action) -> String {
    match action {
        Action::SelectTab(tab) => format!("tab:{}", tab.id()),
        Action::RunWash => "wash".to_string(),
        Action::ToggleLaundry => "laundry-toggle".to_string(),
        Action::RunEtl => "etl".to_string(),
        Action::ToggleConveyor => "conveyor-toggle".to_string(),
        Action::Slide(value) => format!("slide:{}", value),
        Action::Choose(approach) => format!("choose:{}", approach.as_str()),
        Action::NextScenario => "next-scenario".to_string(),
        Action::Answer { question, option } => format!("answer:{}:{}", question, option),
        Action::SubmitQuiz => "submit".to_string(),
        Action::ResetQuiz => "reset".to_string(),
    }
}

/// Decode a `data-action` attribute
pub fn parse_action(attr: &str) -> Option<Action> {
    let mut parts = attr.split(':');
    let action = match (parts.next()?, parts.next(), parts.next()) {
        ("tab", Some(id), None) => Action::SelectTab(Tab::from_id(id)?),
        ("wash", None, None) => Action::RunWash,
        ("laundry-toggle", None, None) => Action::ToggleLaundry,
        ("etl", None, None) => Action::RunEtl,
        ("conveyor-toggle", None, None) => Action::ToggleConveyor,
        ("slide", Some(value), None) => Action::Slide(value.trim().parse().ok()?),
        ("choose", Some(approach), None) => Action::Choose(Approach::from_str(approach)?),
        ("next-scenario", None, None) => Action::NextScenario,
        ("answer", Some(q), Some(o)) => Action::Answer {
            question: q.parse().ok()?,
            option: o.parse().ok()?,
        },
        ("submit", None, None) => Action::SubmitQuiz,
        ("reset", None, None) => Action::ResetQuiz,
        _ => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(action)
}

/// Minimal escaping for text and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn button(action: Action, class: &str, enabled: bool, label: &str) -> String {
    format!(
        r#"<button class="{}" data-action="{}"{}>{}</button>"#,
        class,
        action_attr(action),
        if enabled { "" } else { " disabled" },
        escape(label)
    )
}

/// How a live region is patched in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveKind {
    /// Plain text, set as text content
    Text,
    /// Markup, set as inner HTML
    Markup,
}

/// A part of the page that changes as simulations tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveRegion {
    /// Element ID
    pub id: &'static str,
    pub kind: LiveKind,
    pub content: String,
}

/// Page markup split by how often it changes.
///
/// The skeleton only changes on user actions or phase changes, so it can be
/// written wholesale without swapping controls out from under a click. Live
/// regions change on ticks and are patched by ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// The whole page with every live region left empty
    pub skeleton: String,
    pub live: Vec<LiveRegion>,
}

struct Builder {
    html: String,
    live: Vec<LiveRegion>,
    /// Write live content into the markup
    fill: bool,
}

impl Builder {
    fn push(&mut self, markup: &str) {
        self.html.push_str(markup);
    }

    fn live(&mut self, tag: &str, id: &'static str, class: &str, kind: LiveKind, content: String) {
        self.html.push_str(&format!(r#"<{} id="{}""#, tag, id));
        if !class.is_empty() {
            self.html.push_str(&format!(r#" class="{}""#, class));
        }
        self.html.push('>');
        if self.fill {
            match kind {
                LiveKind::Text => self.html.push_str(&escape(&content)),
                LiveKind::Markup => self.html.push_str(&content),
            }
        }
        self.html.push_str(&format!("</{}>", tag));
        self.live.push(LiveRegion { id, kind, content });
    }
}

/// Render the whole page body for the app's current state
pub fn render<R: RandomSource>(app: &App<R>) -> String {
    build(app, true).html
}

/// Skeleton and live regions for the app's current state
pub fn layout<R: RandomSource>(app: &App<R>) -> Layout {
    let b = build(app, false);
    Layout {
        skeleton: b.html,
        live: b.live,
    }
}

fn build<R: RandomSource>(app: &App<R>, fill: bool) -> Builder {
    let active = app.active_tab();
    let mut b = Builder {
        html: String::new(),
        live: Vec::new(),
        fill,
    };

    b.push(&format!(
        r#"<div class="root{}">"#,
        if app.settings().reduced_motion {
            " reduced-motion"
        } else {
            ""
        }
    ));

    b.push(r#"<nav class="tabs">"#);
    for tab in Tab::ALL {
        let class = if tab == active { "tab active" } else { "tab" };
        b.push(&button(Action::SelectTab(tab), class, true, tab.label()));
    }
    b.push("</nav>");

    let (title, subtitle) = active.heading();
    b.push(&format!(
        r#"<main><h2>{}</h2><p class="subtitle">{}</p>"#,
        escape(title),
        escape(subtitle)
    ));

    match app.view() {
        View::Concept(view) => {
            render_basket(&mut b, &view.basket);
            render_laundry(&mut b, &view.laundry);
        }
        View::Batch(job) => render_etl(&mut b, job),
        View::Stream(scanner) => render_conveyor(&mut b, scanner),
        View::Comparison(slider) => render_comparison(&mut b.html, slider),
        View::UseCases(deck) => render_scenarios(&mut b.html, deck),
        View::Quiz(quiz) => render_quiz(&mut b.html, quiz),
    }

    b.push("</main></div>");
    b
}

fn render_basket(b: &mut Builder, basket: &LaundryBasket) {
    let machine = match basket.phase() {
        BasketPhase::Processing => r#"<div class="machine spinning">Washing...</div>"#,
        BasketPhase::Completed => r#"<div class="machine done">All Clean!</div>"#,
        BasketPhase::Accumulating | BasketPhase::Ready => r#"<div class="machine idle"></div>"#,
    };
    let label = if basket.phase() == BasketPhase::Processing {
        "Washing..."
    } else {
        "Run Weekly Wash"
    };

    b.push(&format!(
        r#"<section class="card batch"><h3>{}</h3><span class="badge">High Throughput</span>"#,
        Approach::Batch.title()
    ));
    b.live(
        "div",
        "live-basket-count",
        "basket-count",
        LiveKind::Text,
        basket.count().to_string(),
    );
    b.live(
        "div",
        "live-basket-bar",
        "bar",
        LiveKind::Markup,
        format!(
            r#"<div class="fill" style="width: {}%"></div>"#,
            basket.fill_percent()
        ),
    );
    b.push("<p>Laundry Basket (");
    b.live(
        "span",
        "live-basket-load",
        "",
        LiveKind::Text,
        format!("{}/{}", basket.count(), basket.capacity()),
    );
    b.push(")</p>");
    b.push(machine);
    b.push(&button(Action::RunWash, "primary", basket.can_run(), label));
    b.push(&format!(
        r#"<p class="analogy"><strong>Analogy:</strong> {}</p></section>"#,
        escape(content::BATCH_ANALOGY)
    ));
}

fn render_laundry(b: &mut Builder, laundry: &LaundryStream) {
    b.push(&format!(
        r#"<section class="card stream"><h3>{}</h3><span class="badge">Low Latency</span>{}
<div class="line"><div class="machine instant">Instant Wash</div>"#,
        Approach::Stream.title(),
        button(
            Action::ToggleLaundry,
            "toggle",
            true,
            if laundry.is_running() { "Pause" } else { "Play" }
        ),
    ));
    let mut garments = String::new();
    for garment in laundry.garments() {
        let (class, note) = match garment.stage {
            GarmentStage::Dirty => ("dirty", ""),
            GarmentStage::Washing => ("washing", ""),
            GarmentStage::Clean => ("clean", r#"<span class="note">Clean!</span>"#),
        };
        garments.push_str(&format!(
            r#"<div class="garment {}" data-id="{}">&#128085;{}</div>"#,
            class, garment.id, note
        ));
    }
    b.live("div", "live-garments", "garments", LiveKind::Markup, garments);
    b.push(&format!(
        r#"</div><p>Items processed individually in real-time.</p>
<p class="analogy"><strong>Analogy:</strong> {}</p></section>"#,
        escape(content::STREAM_ANALOGY)
    ));
}

fn render_etl(b: &mut Builder, job: &EtlJob) {
    b.push(&format!(
        r#"<section class="card etl"><header><span class="schedule">SCHEDULE: DAILY 23:59:00</span>
<span class="status{}">{}</span></header>
<div class="source"><h4>Daily Transactions</h4><p class="mono">"#,
        if job.is_running() { " running" } else { "" },
        if job.is_running() { "RUNNING" } else { "IDLE" },
    ));
    b.live(
        "span",
        "live-etl-records",
        "",
        LiveKind::Text,
        job.records().to_string(),
    );
    b.push(" records</p></div>");

    if job.is_running() {
        b.push(r#"<div class="pipe">"#);
        b.live(
            "div",
            "live-etl-progress",
            "progress",
            LiveKind::Markup,
            format!(
                r#"<span>ETL Job</span><span>{}%</span>
<div class="bar"><div class="fill" style="width: {}%"></div></div>"#,
                job.progress(),
                job.progress()
            ),
        );
        b.push(r#"<div class="pulse">Transforming Data...</div></div>"#);
    } else {
        b.push(r#"<div class="pipe arrow">&rarr;</div>"#);
    }

    b.push(&format!(
        r#"<div class="report{}"><h4>Summary Report</h4><p>{}</p></div>{}
<p class="note">{}</p></section>"#,
        if job.report_ready() { " ready" } else { "" },
        if job.report_ready() {
            "Generated: Just now"
        } else {
            "Waiting for run..."
        },
        button(
            Action::RunEtl,
            "primary",
            !job.is_running(),
            if job.is_running() {
                "Processing..."
            } else {
                "Run Midnight ETL Job"
            }
        ),
        escape(content::ETL_NOTE),
    ));
}

fn render_conveyor(b: &mut Builder, scanner: &FraudScanner) {
    b.push(&format!(
        r#"<section class="card conveyor">{}<div class="belt"><div class="scanner">Scanner</div>"#,
        button(
            Action::ToggleConveyor,
            "toggle",
            true,
            if scanner.is_running() { "Pause" } else { "Play" }
        )
    ));
    let mut items = String::new();
    for tx in scanner.transactions() {
        let class = match tx.stage {
            TxStatus::Pending => "pending",
            TxStatus::Scanning => "scanning",
            TxStatus::Approved => "approved",
            TxStatus::Fraud => "fraud",
        };
        items.push_str(&format!(
            r#"<div class="tx {}" data-id="{}" style="left: {:.1}%">{}</div>"#,
            class,
            tx.id,
            tx.position,
            tx.stage.label()
        ));
    }
    b.live("div", "live-belt", "items", LiveKind::Markup, items);
    b.push(
        r#"</div><div class="legend"><span class="pending">Pending</span>
<span class="approved">Approved ("#,
    );
    b.live(
        "span",
        "live-approved",
        "",
        LiveKind::Text,
        scanner.approved_count().to_string(),
    );
    b.push(r#")</span><span class="fraud">Fraud Alert ("#);
    b.live(
        "span",
        "live-flagged",
        "",
        LiveKind::Text,
        scanner.flagged_count().to_string(),
    );
    b.push(&format!(
        r#")</span></div></section>
<aside class="why"><h4>Why Stream?</h4><p>{}</p></aside>"#,
        escape(content::WHY_STREAM)
    ));
}

fn render_comparison(html: &mut String, slider: &ComparisonSlider) {
    let leaning = slider.leaning();
    html.push_str(&format!(
        r#"<section class="card comparison"><div class="ends">
<span class="end batch{}">Historical / Efficiency</span><span class="end stream{}">Real-Time / Speed</span></div>
<input type="range" id="{}" min="0" max="{}" value="{}"><div class="columns">"#,
        if leaning == Approach::Batch { " on" } else { "" },
        if leaning == Approach::Stream { " on" } else { "" },
        SLIDER_ID,
        ComparisonSlider::MAX,
        slider.value(),
    ));
    for column in &COMPARISON {
        html.push_str(&format!(
            r#"<div class="column {}{}"><h3>{}</h3><ul>
<li><span>Latency</span><span>{}</span></li>
<li><span>Data Size</span><span>{}</span></li>
<li><span>Trigger</span><span>{}</span></li>
<li class="quote">"{}"</li></ul></div>"#,
            column.approach.as_str(),
            if column.approach == leaning { " highlighted" } else { "" },
            column.approach.title(),
            escape(column.latency),
            escape(column.data_size),
            escape(column.trigger),
            escape(column.quote),
        ));
    }
    html.push_str("</div></section>");
}

fn render_scenarios(html: &mut String, deck: &ScenarioDeck) {
    let scenario = deck.current();
    let (position, total) = deck.position();
    html.push_str(&format!(
        r#"<section class="card scenario"><header>Scenario {} of {}</header><h3>"{}"</h3>"#,
        position,
        total,
        escape(scenario.description)
    ));

    match deck.feedback() {
        None => {
            html.push_str(r#"<div class="choices">"#);
            html.push_str(&button(Action::Choose(Approach::Batch), "batch", true, "Batch"));
            html.push_str(&button(Action::Choose(Approach::Stream), "stream", true, "Stream"));
            html.push_str("</div>");
        }
        Some(feedback) => {
            let (class, text) = match feedback {
                Feedback::Correct => ("correct", "Correct!"),
                Feedback::Incorrect => ("incorrect", "Not quite."),
            };
            html.push_str(&format!(
                r#"<div class="feedback {}">{}</div><p>{}</p>{}"#,
                class,
                text,
                escape(scenario.explanation),
                button(Action::NextScenario, "next", true, "Next Scenario")
            ));
        }
    }
    html.push_str("</section>");
}

fn render_quiz(html: &mut String, quiz: &QuizSession) {
    for (idx, question) in quiz.questions().iter().enumerate() {
        html.push_str(&format!(
            r#"<section class="card question"><h3>{}. {}</h3>"#,
            idx + 1,
            escape(question.question)
        ));
        for (option, text) in question.options.iter().enumerate() {
            let class = match quiz.option_mark(question, option) {
                OptionMark::Selected => "option selected",
                OptionMark::Unselected => "option",
                OptionMark::Correct => "option correct",
                OptionMark::Wrong => "option wrong",
                OptionMark::Neutral => "option neutral",
            };
            html.push_str(&button(
                Action::Answer {
                    question: question.id,
                    option,
                },
                class,
                !quiz.is_submitted(),
                text,
            ));
        }
        html.push_str("</section>");
    }

    match quiz.verdict() {
        None => html.push_str(&button(Action::SubmitQuiz, "primary", true, "Submit Answers")),
        Some(verdict) => {
            html.push_str(&format!(
                r#"<div class="result"><h3>You scored {} / {}</h3><p>{}</p>{}</div>"#,
                quiz.score(),
                quiz.questions().len(),
                escape(verdict.message()),
                button(Action::ResetQuiz, "link", true, "Try Again")
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Outcome;
    use crate::settings::Settings;
    use crate::sim::ScriptedRandom;

    fn app_on(tab: Tab) -> App<ScriptedRandom> {
        let settings = Settings {
            start_tab: tab,
            ..Default::default()
        };
        App::with_random(settings, ScriptedRandom::new())
    }

    #[test]
    fn test_action_attrs_parse_back() {
        let actions = [
            Action::SelectTab(Tab::UseCases),
            Action::RunWash,
            Action::ToggleLaundry,
            Action::RunEtl,
            Action::ToggleConveyor,
            Action::Slide(42),
            Action::Choose(Approach::Stream),
            Action::NextScenario,
            Action::Answer {
                question: 3,
                option: 2,
            },
            Action::SubmitQuiz,
            Action::ResetQuiz,
        ];
        for action in actions {
            assert_eq!(parse_action(&action_attr(action)), Some(action));
        }
    }

    #[test]
    fn test_rejects_malformed_actions() {
        for attr in ["", "tab", "tab:nowhere", "answer:1", "answer:x:1", "wash:now", "slide:"] {
            assert_eq!(parse_action(attr), None, "{attr}");
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_wash_button_disabled_until_full() {
        let app = app_on(Tab::Concept);
        let html = render(&app);
        assert!(html.contains(r#"data-action="wash" disabled>Run Weekly Wash"#));
        assert!(html.contains(r#"Laundry Basket (<span id="live-basket-load">0/10</span>)"#));
    }

    #[test]
    fn test_quiz_result_rendered() {
        let mut app = app_on(Tab::Quiz);
        for q in content::QUIZ.iter() {
            app.dispatch(Action::Answer {
                question: q.id,
                option: q.correct_index,
            });
        }
        assert_eq!(app.dispatch(Action::SubmitQuiz), Outcome::Changed);
        let html = render(&app);
        assert!(html.contains("You scored 3 / 3"));
        assert!(html.contains("Perfect!"));
        assert!(html.contains(r#"data-action="reset""#));
    }

    #[test]
    fn test_conveyor_positions_rendered() {
        let mut app = app_on(Tab::Stream);
        if let View::Stream(scanner) = app.view_mut() {
            scanner.admit(12.5);
        }
        let html = render(&app);
        assert!(html.contains(r#"class="tx pending""#));
        assert!(html.contains("left: 12.5%"));
    }

    #[test]
    fn test_slider_highlight() {
        let mut app = app_on(Tab::Comparison);
        app.dispatch(Action::Slide(10));
        let html = render(&app);
        assert!(html.contains(r#"class="column batch highlighted""#));
        assert!(html.contains(r#"class="end batch on""#));
        assert!(html.contains(r#"class="end stream""#));
        assert!(html.contains(r#"value="10""#));
    }

    #[test]
    fn test_conveyor_controls_stable_across_ticks() {
        let mut app = app_on(Tab::Stream);
        if let View::Stream(scanner) = app.view_mut() {
            scanner.admit(10.0);
        }
        let before = layout(&app);

        // 20 frames at 60 Hz
        for _ in 0..20 {
            app.advance(16.7);
            let now = layout(&app);
            assert_eq!(now.skeleton, before.skeleton);
        }
        let after = layout(&app);
        let belt = |l: &Layout| l.live.iter().find(|r| r.id == "live-belt").cloned();
        assert_ne!(belt(&after), belt(&before));
        assert!(after.skeleton.contains(r#"data-action="conveyor-toggle">Pause"#));
        assert!(after.skeleton.contains(r#"<div id="live-belt" class="items"></div>"#));
    }

    #[test]
    fn test_etl_controls_stable_while_running() {
        let mut app = app_on(Tab::Batch);
        app.advance(1_000.0);
        assert_eq!(app.dispatch(Action::RunEtl), Outcome::Changed);
        let running = layout(&app);
        for _ in 0..10 {
            app.advance(150.0);
            assert_eq!(layout(&app).skeleton, running.skeleton);
        }
        let progress = layout(&app)
            .live
            .into_iter()
            .find(|r| r.id == "live-etl-progress")
            .map(|r| r.content);
        assert!(progress.is_some_and(|p| p.contains("50%")));
    }

    #[test]
    fn test_full_render_fills_live_regions() {
        let mut app = app_on(Tab::Stream);
        if let View::Stream(scanner) = app.view_mut() {
            scanner.admit(20.0);
        }
        let html = render(&app);
        let layout = layout(&app);
        for region in &layout.live {
            assert!(html.contains(&format!(r#"id="{}""#, region.id)));
            assert!(html.contains(&region.content), "{}", region.id);
        }
        assert_eq!(layout.live.len(), 3);
    }

    #[test]
    fn test_reduced_motion_class() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let app = App::with_random(settings, ScriptedRandom::new());
        assert!(render(&app).starts_with(r#"<div class="root reduced-motion">"#));
    }
}
