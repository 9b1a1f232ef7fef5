//! Data Pipelines entry point
//!
//! Browser: mounts the lessons into `#app` and drives every simulation clock
//! from the animation frame loop. Native: a headless harness that steps one
//! simulation in virtual time and prints its frames.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement};

    use data_pipelines::content::Approach;
    use data_pipelines::ui::{self, LiveKind, LiveRegion};
    use data_pipelines::{Action, App, Outcome, Settings, View};

    /// Page instance holding all state
    struct Page {
        app: App,
        document: Document,
        root: Element,
        last_time: f64,
        /// Skeleton currently in the DOM
        last_skeleton: String,
        /// Live region contents currently in the DOM
        last_live: Vec<LiveRegion>,
        hidden: bool,
    }

    impl Page {
        fn new(app: App, document: Document, root: Element) -> Self {
            Self {
                app,
                document,
                root,
                last_time: 0.0,
                last_skeleton: String::new(),
                last_live: Vec::new(),
                hidden: false,
            }
        }

        /// Advance the active view by the time since the last frame
        fn update(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                0.0
            };
            self.last_time = time;
            if !self.hidden {
                self.app.advance(elapsed);
            }
        }

        /// Rewrite the page when its controls change, otherwise patch live regions only
        fn render(&mut self) {
            let layout = ui::layout(&self.app);
            if layout.skeleton != self.last_skeleton {
                self.root.set_inner_html(&ui::render(&self.app));
                self.last_skeleton = layout.skeleton;
                self.last_live = layout.live;
                return;
            }

            for region in &layout.live {
                let unchanged = self
                    .last_live
                    .iter()
                    .any(|old| old.id == region.id && old.content == region.content);
                if unchanged {
                    continue;
                }
                if let Some(el) = self.document.get_element_by_id(region.id) {
                    match region.kind {
                        LiveKind::Text => el.set_text_content(Some(&region.content)),
                        LiveKind::Markup => el.set_inner_html(&region.content),
                    }
                }
            }
            self.last_live = layout.live;
        }

        fn dispatch(&mut self, action: Action) {
            if let Outcome::Notice(message) = self.app.dispatch(action) {
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message(&message);
                }
            }
            self.render();
        }

        /// Apply a slider move without replacing the input being dragged
        fn slide(&mut self, value: i64) {
            self.app.dispatch(Action::Slide(value));
            let View::Comparison(slider) = self.app.view() else {
                return;
            };
            let leaning = slider.leaning();
            for approach in [Approach::Batch, Approach::Stream] {
                let on = approach == leaning;
                let column = format!(".column.{}", approach.as_str());
                if let Some(el) = self.document.query_selector(&column).ok().flatten() {
                    let _ = el.class_list().toggle_with_force("highlighted", on);
                }
                let end = format!(".end.{}", approach.as_str());
                if let Some(el) = self.document.query_selector(&end).ok().flatten() {
                    let _ = el.class_list().toggle_with_force("on", on);
                }
            }
            // The DOM now matches the new state apart from the live input
            self.last_skeleton = ui::layout(&self.app).skeleton;
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Data Pipelines starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let root = document
            .get_element_by_id("app")
            .ok_or_else(|| JsValue::from_str("no #app element"))?;

        let settings = Settings::load();
        let app = App::new(settings, js_sys::Date::now() as u64);
        let page = Rc::new(RefCell::new(Page::new(app, document.clone(), root)));
        page.borrow_mut().render();

        setup_click_handler(&document, page.clone());
        setup_slider_handler(&document, page.clone());
        setup_auto_pause(&document, page.clone());

        request_animation_frame(page);

        log::info!("Data Pipelines running!");
        Ok(())
    }

    /// One delegated listener for every `data-action` control
    fn setup_click_handler(document: &Document, page: Rc<RefCell<Page>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let Some(target) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
            else {
                return;
            };
            let Some(control) = target.closest("[data-action]").ok().flatten() else {
                return;
            };
            let Some(attr) = control.get_attribute("data-action") else {
                return;
            };
            match ui::parse_action(&attr) {
                Some(action) => page.borrow_mut().dispatch(action),
                None => log::warn!("Unknown action '{}'", attr),
            }
        });
        let _ = document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_slider_handler(document: &Document, page: Rc<RefCell<Page>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            if input.id() != ui::SLIDER_ID {
                return;
            }
            if let Ok(value) = input.value().parse::<i64>() {
                page.borrow_mut().slide(value);
            }
        });
        let _ = document.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Stop simulations while the page is hidden
    fn setup_auto_pause(document: &Document, page: Rc<RefCell<Page>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
            let mut p = page.borrow_mut();
            p.hidden = hidden;
            if hidden {
                log::info!("Simulations paused (tab hidden)");
            } else {
                // Don't count the hidden stretch as elapsed time
                p.last_time = 0.0;
            }
        });
        let _ = document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }

    fn request_animation_frame(page: Rc<RefCell<Page>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(page, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(page: Rc<RefCell<Page>>, time: f64) {
        {
            let mut p = page.borrow_mut();
            p.update(time);
            p.render();
        }

        request_animation_frame(page);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_app::run() {
        web_sys::console::error_1(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod harness {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;

    use data_pipelines::trace::{self, Feed, Format};
    use data_pipelines::{Action, App, Settings, SettingsError, View};

    /// Virtual time per simulation step; short enough that no clock skips a tick
    const SUBSTEP_MS: u64 = 10;

    /// Headless lesson runner - steps a simulation in virtual time and prints its frames
    #[derive(Parser, Debug)]
    #[command(name = "data-pipelines")]
    #[command(about = "Run a lesson simulation headless and print its frames")]
    struct Args {
        /// Simulation to follow
        #[arg(long, value_enum, default_value_t = Feed::Fraud)]
        sim: Feed,

        /// Random seed for deterministic runs (overrides the settings file)
        #[arg(long)]
        seed: Option<u64>,

        /// Virtual time to simulate, in milliseconds
        #[arg(long, default_value_t = 10_000)]
        duration_ms: u64,

        /// Virtual time between printed frames, in milliseconds
        #[arg(long, default_value_t = 250)]
        frame_ms: u64,

        /// Output format: one text line or one JSON object per frame
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// JSON settings file
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Start the wash whenever the basket is full; start the ETL job once
        #[arg(long)]
        auto_run: bool,
    }

    pub fn run() -> Result<(), SettingsError> {
        let args = Args::parse();

        let mut settings = match &args.settings {
            Some(path) => Settings::load_file(path)?,
            None => Settings::default(),
        };
        if args.seed.is_some() {
            settings.seed = args.seed;
        }
        settings.start_tab = args.sim.tab();

        let mut app = App::new(settings, time_seed());
        log::info!(
            "Following '{}' for {} ms in {} ms frames",
            args.sim.name(),
            args.duration_ms,
            args.frame_ms
        );

        let frame_ms = args.frame_ms.max(1);
        let mut at_ms = 0;
        print_frame(&args, app.view(), at_ms);

        while at_ms < args.duration_ms {
            let mut stepped = 0;
            while stepped < frame_ms {
                let dt = SUBSTEP_MS.min(frame_ms - stepped);
                app.advance(dt as f64);
                stepped += dt;
                if args.auto_run {
                    auto_run(&mut app, args.sim);
                }
            }
            at_ms += frame_ms;
            print_frame(&args, app.view(), at_ms);
        }
        Ok(())
    }

    fn print_frame(args: &Args, view: &View, at_ms: u64) {
        if let Some(line) = trace::render(args.sim, view, at_ms, args.format) {
            println!("{}", line);
        }
    }

    fn auto_run(app: &mut App, feed: Feed) {
        let action = match (feed, app.view()) {
            (Feed::Basket, View::Concept(view)) if view.basket.can_run() => Action::RunWash,
            (Feed::Etl, View::Batch(job)) if !job.is_running() && !job.report_ready() => {
                Action::RunEtl
            }
            _ => return,
        };
        app.dispatch(action);
    }

    fn time_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Data Pipelines (native) starting...");

    if let Err(e) = harness::run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
