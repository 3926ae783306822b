//! Statescope GUI - finite automaton visualizer
//! Loads NFA/DFA/minimized-DFA bundles, lays them out, and steps input
//! strings through the selected automaton.

use eframe::egui;
use std::path::PathBuf;
use std::time::{Duration, Instant};

mod automaton;
mod export;
mod geometry;
mod interact;
mod layout;
mod render;
mod routing;
mod sim;

use automaton::{display_symbol, Automaton};
use interact::DragController;
use layout::{compute_layout, Positions, CANVAS_HEIGHT, CANVAS_WIDTH};
use render::Viewport;
use routing::{route_edges, EdgePath};
use sim::{Outcome, Stepper, MAX_TICK_DELAY_MS, MIN_TICK_DELAY_MS};

/// Bundle shown on startup: automata accepting strings that end in "bbb".
const DEFAULT_BUNDLE: &str = r#"{
    "nfa": {
        "startingState": "Q0",
        "Q0": {"isTerminatingState": false, "a": ["Q0"], "b": ["Q0", "Q1"]},
        "Q1": {"isTerminatingState": false, "b": ["Q2"]},
        "Q2": {"isTerminatingState": false, "b": ["Q3"]},
        "Q3": {"isTerminatingState": true}
    },
    "dfa": {
        "startingState": "S0",
        "S0": {"isTerminatingState": false, "a": "S0", "b": "S1"},
        "S1": {"isTerminatingState": false, "a": "S0", "b": "S2"},
        "S2": {"isTerminatingState": false, "a": "S0", "b": "S3"},
        "S3": {"isTerminatingState": true, "a": "S0", "b": "S3"}
    },
    "min_dfa": {
        "startingState": "S0",
        "S0": {"isTerminatingState": false, "a": "S0", "b": "S1"},
        "S1": {"isTerminatingState": false, "a": "S0", "b": "S2"},
        "S2": {"isTerminatingState": false, "a": "S0", "b": "S3"},
        "S3": {"isTerminatingState": true, "a": "S0", "b": "S3"}
    }
}"#;

fn statescope_icon() -> egui::IconData {
    // Simple generated icon (64x64): dark background + teal state ring with
    // an inner accepting ring. Avoids external assets and works cross-platform.
    let w: u32 = 64;
    let h: u32 = 64;
    let mut rgba = vec![0u8; (w * h * 4) as usize];
    let cx = (w as f32 - 1.0) * 0.5;
    let cy = (h as f32 - 1.0) * 0.5;
    let r_outer = 26.0;
    let r_inner = 20.0;
    let r_accept = 14.0;

    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let d = (dx * dx + dy * dy).sqrt();

            let mut r = 20u8;
            let mut g = 24u8;
            let mut b = 30u8;
            let mut a = 255u8;

            if (d >= r_inner && d <= r_outer) || (d >= r_accept - 3.0 && d <= r_accept) {
                let t = ((y as f32) / (h as f32 - 1.0)).clamp(0.0, 1.0);
                r = (70.0 - 20.0 * t) as u8;
                g = (210.0 - 40.0 * t) as u8;
                b = (180.0 - 30.0 * t) as u8;
            } else if d < r_accept - 3.0 {
                r = 34;
                g = 40;
                b = 52;
            }

            if d > r_outer {
                let falloff = (d - r_outer).clamp(0.0, 2.0);
                a = (255.0 * (1.0 - falloff / 2.0)) as u8;
            }

            let idx = ((y * w + x) * 4) as usize;
            rgba[idx] = r;
            rgba[idx + 1] = g;
            rgba[idx + 2] = b;
            rgba[idx + 3] = a;
        }
    }

    egui::IconData { rgba, width: w, height: h }
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_title("Statescope - Automaton Visualizer")
            .with_icon(statescope_icon()),
        ..Default::default()
    };

    eframe::run_native(
        "Statescope",
        options,
        Box::new(|cc| Ok(Box::new(ScopeApp::new(cc)))),
    )
}

struct ScopeApp {
    /// Parsed automata from the loaded bundle (NFA/DFA/MIN_DFA order)
    automata: Vec<Automaton>,
    /// Selected automaton index
    selected: usize,
    /// State positions: layout output, overridden by drags
    positions: Positions,
    /// Routed edges for the selected automaton
    edges: Vec<EdgePath>,
    /// Whether edges must be rerouted (positions or selection changed)
    edges_dirty: bool,
    /// Load error message
    error_message: Option<String>,
    /// Show raw JSON side panel
    show_json_panel: bool,
    /// Zoom level
    zoom: f32,
    /// Pan offset
    pan_offset: egui::Vec2,
    drag: DragController,

    /// Simulation
    stepper: Stepper,
    sim_input: String,
    last_frame: Option<Instant>,

    /// Pending PNG export target; resolved when the screenshot event arrives
    png_target: Option<PathBuf>,
    /// Canvas rect from the last frame, for cropping the screenshot
    canvas_rect: Option<egui::Rect>,
}

impl ScopeApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            automata: Vec::new(),
            selected: 0,
            positions: Positions::default(),
            edges: Vec::new(),
            edges_dirty: true,
            error_message: None,
            show_json_panel: false,
            zoom: 1.0,
            pan_offset: egui::Vec2::ZERO,
            drag: DragController::new(),
            stepper: Stepper::default(),
            sim_input: String::new(),
            last_frame: None,
            png_target: None,
            canvas_rect: None,
        };
        app.load_document(DEFAULT_BUNDLE);
        app
    }

    fn load_document(&mut self, json: &str) {
        match automaton::parse_document(json) {
            Ok(automata) => {
                self.automata = automata;
                self.selected = 0;
                self.error_message = None;
                for a in &self.automata {
                    if let Err(errors) = a.validate() {
                        log::warn!(
                            "{} bundle entry has issues: {}",
                            a.kind.label(),
                            errors.join("; ")
                        );
                    }
                }
                self.relayout();
            }
            Err(e) => {
                self.error_message = Some(e.to_string());
            }
        }
    }

    fn selected_automaton(&self) -> Option<&Automaton> {
        self.automata.get(self.selected)
    }

    /// Recompute positions from scratch, dropping drag overrides, and reset
    /// the stepper so the active highlight cannot point at a stale state.
    fn relayout(&mut self) {
        if let Some(a) = self.automata.get(self.selected) {
            self.positions = compute_layout(
                &a.starting_state,
                &a.states,
                &a.transitions,
                CANVAS_WIDTH,
                CANVAS_HEIGHT,
            );
        } else {
            self.positions = Positions::default();
        }
        self.edges_dirty = true;
        self.stepper.reset();
    }

    fn select(&mut self, index: usize) {
        if index != self.selected && index < self.automata.len() {
            self.selected = index;
            self.relayout();
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("📂 Open JSON...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("JSON", &["json"])
                        .pick_file()
                    {
                        match std::fs::read_to_string(&path) {
                            Ok(content) => self.load_document(&content),
                            Err(e) => {
                                self.error_message = Some(format!("{}: {e}", path.display()))
                            }
                        }
                    }
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("💾 Export JSON...").clicked() {
                    if let Some(a) = self.automata.get(self.selected) {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .save_file()
                        {
                            if let Err(e) = export::write_json(&path, a) {
                                self.error_message = Some(e.to_string());
                            }
                        }
                    }
                    ui.close_menu();
                }
                if ui.button("🖼 Export PNG...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("PNG", &["png"])
                        .save_file()
                    {
                        self.png_target = Some(path);
                        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(
                            egui::UserData::default(),
                        ));
                    }
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
            ui.menu_button("View", |ui| {
                ui.checkbox(&mut self.show_json_panel, "JSON panel");
                ui.separator();
                if ui.button("Reset view").clicked() {
                    self.zoom = 1.0;
                    self.pan_offset = egui::Vec2::ZERO;
                    ui.close_menu();
                }
                if ui.button("Reset layout").clicked() {
                    self.relayout();
                    ui.close_menu();
                }
            });
            ui.menu_button("Examples", |ui| {
                if ui.button("Ends in \"bbb\"").clicked() {
                    self.load_document(DEFAULT_BUNDLE);
                    ui.close_menu();
                }
            });
        });
    }

    fn variant_tabs(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut clicked = None;
            for (i, a) in self.automata.iter().enumerate() {
                if ui
                    .selectable_label(i == self.selected, a.kind.label())
                    .clicked()
                {
                    clicked = Some(i);
                }
            }
            if let Some(i) = clicked {
                self.select(i);
            }
        });
    }

    fn sim_toolbar(&mut self, ui: &mut egui::Ui) {
        let Some(a) = self.automata.get(self.selected) else {
            return;
        };
        let automaton = a.clone();
        let deterministic = automaton.is_deterministic();

        ui.horizontal(|ui| {
            ui.label("Input:");
            let editing_allowed = !self.stepper.is_running() && self.stepper.outcome().is_none();
            ui.add_enabled(
                editing_allowed,
                egui::TextEdit::singleline(&mut self.sim_input).desired_width(160.0),
            );

            let can_start = deterministic && !self.sim_input.is_empty();
            if self.stepper.is_running() {
                if ui.button("⏸ Pause").clicked() {
                    self.stepper.pause();
                }
            } else {
                let label = if self.stepper.is_paused() {
                    "▶ Resume"
                } else {
                    "▶ Run"
                };
                let run = ui
                    .add_enabled(can_start, egui::Button::new(label))
                    .on_disabled_hover_text(if deterministic {
                        "Type an input string first"
                    } else {
                        "Only deterministic automata can be simulated"
                    });
                if run.clicked() {
                    self.stepper.start(&automaton, &self.sim_input);
                }
            }

            let can_step = deterministic
                && self.stepper.outcome().is_none()
                && !self.stepper.is_running()
                && (self.stepper.is_paused() || !self.sim_input.is_empty());
            if ui.add_enabled(can_step, egui::Button::new("⏭ Step")).clicked() {
                if self.stepper.current_state().is_none() {
                    self.stepper.start(&automaton, &self.sim_input);
                    self.stepper.pause();
                }
                self.stepper.step_once(&automaton);
            }

            if ui.button("⟲ Reset").clicked() {
                self.stepper.reset();
            }

            ui.separator();
            ui.label("Delay:");
            let mut delay = self.stepper.tick_delay_ms();
            if ui
                .add(
                    egui::Slider::new(&mut delay, MIN_TICK_DELAY_MS..=MAX_TICK_DELAY_MS)
                        .suffix(" ms"),
                )
                .changed()
            {
                self.stepper.set_tick_delay_ms(delay);
            }

            ui.separator();
            if !deterministic {
                ui.colored_label(
                    egui::Color32::from_rgb(255, 180, 80),
                    "⚠ nondeterministic - switch to the DFA to simulate",
                );
            } else {
                match self.stepper.outcome() {
                    Some(Outcome::Matched) => {
                        ui.colored_label(egui::Color32::from_rgb(100, 220, 100), "✅ MATCHED");
                    }
                    Some(Outcome::Failed) => {
                        ui.colored_label(egui::Color32::from_rgb(235, 90, 90), "❌ FAILED");
                    }
                    None => {
                        if let Some(state) = self.stepper.current_state() {
                            let consumed: String = self.stepper.input()[..self.stepper.cursor()]
                                .iter()
                                .collect();
                            ui.label(format!("at {state} after \"{consumed}\""));
                        }
                    }
                }
            }
        });
    }

    fn canvas(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());
        let rect = response.rect;
        self.canvas_rect = Some(rect);

        let viewport = Viewport {
            screen_center: rect.center(),
            zoom: self.zoom,
            pan: self.pan_offset,
        };

        // State drag wins over panning when the press lands on a marker.
        if response.drag_started() {
            if let (Some(pointer), Some(a)) = (
                response.interact_pointer_pos(),
                self.automata.get(self.selected),
            ) {
                self.drag
                    .begin(viewport.to_canvas(pointer), &a.states, &self.positions);
            }
        }
        if response.dragged() {
            if self.drag.is_dragging() {
                if let Some(pointer) = response.interact_pointer_pos() {
                    self.drag
                        .update(viewport.to_canvas(pointer), &mut self.positions);
                    self.edges_dirty = true;
                }
            } else {
                self.pan_offset += response.drag_delta();
            }
        }
        if response.drag_stopped() {
            self.drag.end();
        }

        let scroll_delta = ctx.input(|i| i.raw_scroll_delta);
        if response.hovered() && scroll_delta.y != 0.0 {
            self.zoom = (self.zoom + scroll_delta.y * 0.001).clamp(0.3, 3.0);
        }

        if let Some(a) = self.automata.get(self.selected) {
            if self.edges_dirty {
                self.edges = route_edges(&a.transitions, &self.positions);
                self.edges_dirty = false;
            }
            render::draw_diagram(
                &painter,
                rect,
                &viewport,
                &a.states,
                &self.edges,
                &self.positions,
                self.stepper.current_state(),
            );
        } else {
            painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(25, 28, 32));
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Open a JSON bundle to get started",
                egui::FontId::proportional(18.0),
                egui::Color32::GRAY,
            );
        }
    }

    fn handle_screenshot(&mut self, ctx: &egui::Context) {
        if self.png_target.is_none() {
            return;
        }
        let shot = ctx.input(|i| {
            i.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        if let (Some(image), Some(path)) = (shot, self.png_target.take()) {
            let pixels_per_point = ctx.pixels_per_point();
            let cropped = match self.canvas_rect {
                Some(rect) => image.region(&rect, Some(pixels_per_point)),
                None => (*image).clone(),
            };
            if let Err(e) = export::write_png(&path, &cropped) {
                self.error_message = Some(e.to_string());
            } else {
                log::info!("saved diagram snapshot to {}", path.display());
            }
        }
    }
}

impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drive the tick timer from wall-clock frame deltas.
        let now = Instant::now();
        let dt = self
            .last_frame
            .replace(now)
            .map(|prev| now.duration_since(prev))
            .unwrap_or(Duration::ZERO);
        if self.stepper.is_running() {
            if let Some(a) = self.automata.get(self.selected) {
                let automaton = a.clone();
                self.stepper.advance(&automaton, dt);
            }
        }

        self.handle_screenshot(ctx);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.menu_bar(ctx, ui);
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(2.0);
            self.variant_tabs(ui);
            ui.separator();
            self.sim_toolbar(ui);
            ui.add_space(2.0);
        });

        if let Some(error) = self.error_message.clone() {
            egui::TopBottomPanel::bottom("errors").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(
                        egui::Color32::from_rgb(235, 90, 90),
                        format!("⚠ {error}"),
                    );
                    if ui.small_button("dismiss").clicked() {
                        self.error_message = None;
                    }
                });
            });
        }

        if self.show_json_panel {
            egui::SidePanel::right("json_panel")
                .default_width(320.0)
                .show(ctx, |ui| {
                    let Some(a) = self.selected_automaton() else {
                        ui.label("No automaton loaded");
                        return;
                    };
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.heading("Summary");
                        ui.separator();
                        ui.label(format!("Starting state: {}", a.starting_state));
                        for state in &a.states {
                            let mark = if state.is_terminating { " (accepting)" } else { "" };
                            ui.label(format!("• {}{}", state.id, mark));
                        }
                        ui.add_space(4.0);
                        for t in &a.transitions {
                            ui.label(format!(
                                "{} → {} : {}",
                                t.from,
                                t.to,
                                display_symbol(&t.symbol)
                            ));
                        }
                        ui.add_space(8.0);
                        ui.heading("Raw JSON");
                        ui.separator();
                        let mut text = export::to_json(a).unwrap_or_default();
                        ui.add(
                            egui::TextEdit::multiline(&mut text)
                                .code_editor()
                                .desired_width(f32::INFINITY)
                                .interactive(false),
                        );
                    });
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(a) = self.selected_automaton() {
                let alphabet: Vec<String> = a
                    .alphabet()
                    .iter()
                    .map(|s| display_symbol(s).to_string())
                    .collect();
                ui.horizontal(|ui| {
                    ui.label(format!(
                        "{} · {} states · alphabet {{{}}}",
                        a.kind.label(),
                        a.states.len(),
                        alphabet.join(", ")
                    ));
                });
                ui.separator();
            }
            self.canvas(ctx, ui);
        });

        if self.stepper.is_running() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }
}
