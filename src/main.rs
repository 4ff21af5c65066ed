//! Parabolic Motion entry point
//!
//! On the web this wires the DOM controls to the simulation. Natively it runs
//! a headless simulation and reports where the projectile lands.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlButtonElement, HtmlCanvasElement, HtmlInputElement,
    };

    use parabolic_motion::Settings;
    use parabolic_motion::controller::Simulation;
    use parabolic_motion::platform::IntervalScheduler;
    use parabolic_motion::sim::{OverlayFlags, SimulationParameters, TimerHandle};

    /// Numeric input ids
    const NUMBER_INPUTS: [&str; 6] = [
        "height",
        "velocity",
        "angle",
        "radius",
        "framerate",
        "gravity",
    ];
    /// Overlay checkbox ids
    const CHECKBOXES: [&str; 6] = [
        "show-path",
        "show-horizontal",
        "show-vertical",
        "show-coordinates",
        "show-axes",
        "show-grid",
    ];

    /// Page state: the simulation plus the DOM it drives
    struct App {
        sim: Simulation<IntervalScheduler>,
        ctx: CanvasRenderingContext2d,
        document: Document,
    }

    impl App {
        fn on_tick(&mut self, handle: TimerHandle) {
            let outcome = self.sim.tick(handle, &mut self.ctx);
            if matches!(outcome, parabolic_motion::TickOutcome::Landed { .. }) {
                self.sync_controls();
            }
        }

        fn input(&self, id: &str) -> Option<HtmlInputElement> {
            self.document.get_element_by_id(id)?.dyn_into().ok()
        }

        fn button(&self, id: &str) -> Option<HtmlButtonElement> {
            self.document.get_element_by_id(id)?.dyn_into().ok()
        }

        /// Numeric field value, `None` when the entry does not parse
        fn number(&self, id: &str) -> Option<f64> {
            let raw = self.input(id)?.value();
            match raw.trim().parse::<f64>() {
                Ok(v) => Some(v),
                Err(_) => {
                    log::warn!("Ignoring non-numeric {}: {:?}", id, raw);
                    None
                }
            }
        }

        fn checked(&self, id: &str) -> bool {
            self.input(id).map(|el| el.checked()).unwrap_or(false)
        }

        /// Parameters from the form; unparseable fields keep their current value
        fn read_params(&self) -> SimulationParameters {
            let current = *self.sim.params();
            SimulationParameters {
                initial_height: self.number("height").unwrap_or(current.initial_height),
                initial_velocity: self.number("velocity").unwrap_or(current.initial_velocity),
                launch_angle_degrees: self.number("angle").unwrap_or(current.launch_angle_degrees),
                radius: self.number("radius").unwrap_or(current.radius),
                frame_rate: self
                    .number("framerate")
                    .map(|v| v.max(0.0) as u32)
                    .unwrap_or(current.frame_rate),
                gravity: self.number("gravity").unwrap_or(current.gravity),
            }
        }

        fn read_overlays(&self) -> OverlayFlags {
            OverlayFlags {
                show_path: self.checked("show-path"),
                show_horizontal_line: self.checked("show-horizontal"),
                show_vertical_line: self.checked("show-vertical"),
                show_coordinates: self.checked("show-coordinates"),
                show_axes: self.checked("show-axes"),
                show_grid: self.checked("show-grid"),
            }
        }

        /// Push settings into the form
        fn write_form(&self, settings: &Settings) {
            let p = &settings.params;
            let values = [
                p.initial_height,
                p.initial_velocity,
                p.launch_angle_degrees,
                p.radius,
                p.frame_rate as f64,
                p.gravity,
            ];
            for (id, value) in NUMBER_INPUTS.iter().zip(values) {
                if let Some(el) = self.input(id) {
                    el.set_value(&value.to_string());
                }
            }

            let o = &settings.overlays;
            let flags = [
                o.show_path,
                o.show_horizontal_line,
                o.show_vertical_line,
                o.show_coordinates,
                o.show_axes,
                o.show_grid,
            ];
            for (id, flag) in CHECKBOXES.iter().zip(flags) {
                if let Some(el) = self.input(id) {
                    el.set_checked(flag);
                }
            }
        }

        fn apply_settings(&mut self, settings: Settings) {
            self.write_form(&settings);
            self.sim.set_overlays(settings.overlays, &mut self.ctx);
            if let Err(e) = self.sim.set_parameters(settings.params, &mut self.ctx) {
                log::warn!("Using default parameters: {}", e);
            }
            self.sync_controls();
        }

        fn on_parameters_changed(&mut self) {
            let params = self.read_params();
            if self.sim.set_parameters(params, &mut self.ctx).is_ok() {
                self.save();
            }
            self.sync_controls();
        }

        fn on_overlays_changed(&mut self) {
            let overlays = self.read_overlays();
            self.sim.set_overlays(overlays, &mut self.ctx);
            self.save();
            self.sync_controls();
        }

        fn save(&self) {
            Settings {
                params: *self.sim.params(),
                overlays: *self.sim.overlays(),
            }
            .save();
        }

        /// Reflect the run state in the form's enablement
        fn sync_controls(&self) {
            let controls = self.sim.controls();

            for id in NUMBER_INPUTS.iter().chain(CHECKBOXES.iter()) {
                if let Some(el) = self.input(id) {
                    el.set_disabled(!controls.inputs_enabled);
                }
            }
            if let Some(btn) = self.button("start") {
                btn.set_disabled(!controls.start_enabled);
            }
            if let Some(btn) = self.button("pause") {
                btn.set_disabled(!controls.pause_enabled);
                btn.set_text_content(Some(controls.pause_label));
            }
            if let Some(btn) = self.button("reset") {
                btn.set_disabled(!controls.reset_enabled);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        // No window means no scheduling: nothing can run
        let window = web_sys::window().expect("no global window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no #canvas element")
            .dyn_into()
            .expect("#canvas is not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let app = Rc::new_cyclic(|weak: &std::rc::Weak<RefCell<App>>| {
            let weak = weak.clone();
            let scheduler = IntervalScheduler::new(window.clone(), move |handle| {
                if let Some(app) = weak.upgrade() {
                    app.borrow_mut().on_tick(handle);
                }
            });
            RefCell::new(App {
                sim: Simulation::new(scheduler),
                ctx,
                document: document.clone(),
            })
        });

        app.borrow_mut().apply_settings(Settings::load());

        setup_inputs(&document, &app);
        setup_buttons(&document, &app);

        log::info!("Parabolic Motion ready");
    }

    fn setup_inputs(document: &Document, app: &Rc<RefCell<App>>) {
        for id in NUMBER_INPUTS {
            if let Some(el) = document.get_element_by_id(id) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    app.borrow_mut().on_parameters_changed();
                });
                let _ = el
                    .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        for id in CHECKBOXES {
            if let Some(el) = document.get_element_by_id(id) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    app.borrow_mut().on_overlays_changed();
                });
                let _ = el
                    .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_buttons(document: &Document, app: &Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("start") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                if let Err(e) = a.sim.start() {
                    log::error!("{}", e);
                }
                a.sync_controls();
            });
            let _ =
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("pause") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                if let Err(e) = a.sim.toggle_pause() {
                    log::warn!("{}", e);
                }
                a.sync_controls();
            });
            let _ =
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("reset") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                let App { sim, ctx, .. } = &mut *a;
                sim.reset(ctx);
                a.sync_controls();
            });
            let _ =
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web_app::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;
    use std::fmt::Write as _;
    use std::path::PathBuf;

    use clap::Parser;
    use glam::DVec2;

    use parabolic_motion::consts::{X_OFFSET, Y_OFFSET};
    use parabolic_motion::renderer::SvgSurface;
    use parabolic_motion::settings::SettingsError;
    use parabolic_motion::sim::{
        DerivedConstants, ManualScheduler, SimError, SimulationParameters, flight_time,
        time_at_frame,
    };
    use parabolic_motion::{Settings, Simulation, TickOutcome};

    /// Run a projectile simulation without a browser
    #[derive(Parser, Debug)]
    #[command(name = "parabolic-motion", version, about)]
    pub struct Args {
        /// Settings JSON (parameters and overlays)
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        /// Write the final frame as SVG
        #[arg(long)]
        pub svg: Option<PathBuf>,

        /// Give up after this much simulated time (s)
        #[arg(long, default_value_t = 60)]
        pub max_seconds: u64,

        /// Print the effective settings as JSON and exit
        #[arg(long)]
        pub print_config: bool,

        /// Enable the path, crosshair, coordinate and grid overlays
        #[arg(long)]
        pub all_overlays: bool,
    }

    /// What a headless run ended with
    #[derive(Debug)]
    pub struct RunReport {
        pub params: SimulationParameters,
        pub derived: DerivedConstants,
        /// Landing frame and position, if the projectile came down in time
        pub landed: Option<(u64, DVec2)>,
        /// Frame counter when the run ended (0 after a landing)
        pub final_frame: u64,
        pub max_seconds: u64,
        /// Last drawn frame
        pub svg: String,
    }

    /// Settings file (or defaults) with the command line overrides applied
    pub fn effective_settings(args: &Args) -> Result<Settings, SettingsError> {
        let mut settings = match &args.config {
            Some(path) => Settings::load_from(path)?,
            None => Settings::default(),
        };
        if args.all_overlays {
            let o = &mut settings.overlays;
            o.show_path = true;
            o.show_horizontal_line = true;
            o.show_vertical_line = true;
            o.show_coordinates = true;
            o.show_axes = true;
            o.show_grid = true;
        }
        Ok(settings)
    }

    /// Drive one run on a manual clock until it lands or `max_seconds` of
    /// simulated time have passed.
    pub fn simulate(settings: Settings, max_seconds: u64) -> Result<RunReport, SimError> {
        let mut sim =
            Simulation::with_params(settings.params, settings.overlays, ManualScheduler::new())?;
        let mut surface = SvgSurface::default();
        sim.reset(&mut surface);
        sim.start()?;

        let period = u64::from(sim.derived().milliseconds_per_frame.max(1));
        let limit_ms = max_seconds.saturating_mul(1000);
        let mut landed = None;
        while landed.is_none() {
            let now = sim.scheduler_mut().now_ms();
            if now >= limit_ms {
                break;
            }
            for outcome in sim.advance(period.min(limit_ms - now), &mut surface) {
                if let TickOutcome::Landed { frame, position } = outcome {
                    landed = Some((frame, position));
                }
            }
        }

        if landed.is_none() {
            sim.pause()?;
            log::warn!("No landing within {} s", max_seconds);
        }

        Ok(RunReport {
            params: *sim.params(),
            derived: *sim.derived(),
            landed,
            final_frame: sim.frame(),
            max_seconds,
            svg: surface.to_svg(),
        })
    }

    /// Human-readable outcome, one fact per line
    pub fn summary(report: &RunReport) -> String {
        let RunReport { params, derived, .. } = report;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "h = {} m, v = {} m/s, angle = {} deg, g = {} m/s², {} fps ({} ms/frame)",
            params.initial_height,
            params.initial_velocity,
            params.launch_angle_degrees,
            params.gravity,
            params.frame_rate,
            derived.milliseconds_per_frame
        );

        match report.landed {
            Some((frame, position)) => {
                let t = time_at_frame(frame, derived.milliseconds_per_frame);
                let _ = writeln!(
                    out,
                    "Landed at frame {}: t = {:.3} s, x = {:.3} m, y = {:.3} m",
                    frame,
                    t,
                    position.x - X_OFFSET,
                    Y_OFFSET - position.y
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "Still airborne after {} s (frame {})",
                    report.max_seconds, report.final_frame
                );
            }
        }
        if let Some(t) = flight_time(params, derived) {
            let _ = writeln!(out, "Analytic flight time: {:.3} s", t);
        }
        out
    }

    pub fn run(args: Args) -> Result<(), Box<dyn Error>> {
        let settings = effective_settings(&args)?;
        if args.print_config {
            println!("{}", settings.to_json()?);
            return Ok(());
        }

        let report = simulate(settings, args.max_seconds)?;
        print!("{}", summary(&report));

        if let Some(path) = &args.svg {
            std::fs::write(path, &report.svg)?;
            log::info!("Wrote {}", path.display());
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use clap::Parser;

    env_logger::init();
    log::info!("Parabolic Motion (native) starting...");
    headless::run(headless::Args::parse())
}
