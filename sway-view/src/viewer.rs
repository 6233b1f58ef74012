//! Interactive viewer for a swaying tree built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation state
//! (tree, wind bands, growth configuration) and implements [`eframe::App`]
//! to step it at a fixed rate and paint its geometry.

use eframe::App;
use glam::Vec2;
use rand::rng;
use sway_core::{GrowthConfig, Tree, Wind, build, leaf::Leaf};

/// Width of the simulated scene; wind bands wrap past it.
pub const SCENE_WIDTH: f32 = 1920.0;
pub const SCENE_HEIGHT: f32 = 1080.0;
/// Fixed simulation step, in seconds.
pub const DT: f32 = 0.016;

const LEAF_LENGTH: f32 = 30.0;
const LEAF_WIDTH: f32 = 30.0;
const WIND_STEP: f32 = 1.2;

/// Where the trunk is planted: bottom center of the scene.
pub fn tree_origin() -> Vec2 {
    Vec2::new(SCENE_WIDTH * 0.5, SCENE_HEIGHT)
}

/// The four bands of the demo scene, each entering from the left.
pub fn default_winds() -> Vec<Wind> {
    vec![
        Wind::new(100.0, 3.0, 700.0, None),
        Wind::new(300.0, 2.0, 1050.0, None),
        Wind::new(400.0, 3.0, 1208.0, None),
        Wind::new(500.0, 4.0, 1400.0, None),
    ]
}

/// Main application state for the viewer.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions.
/// 2. If `running` is `true`, call [`Viewer::step_once`].
/// 3. Paint branches, leaves and optional debug overlays.
///
/// ### Fields
/// - `tree` - The tree being simulated.
/// - `winds` - Wind bands sweeping across the scene.
/// - `cfg` - Growth parameters used by the next rebuild.
/// - `rng` - Random source for growth and wind.
///
/// - `running` - Whether the simulation advances every frame.
/// - `boosting` - Whether a scene-wide gust pushes every branch.
/// - `boost_force` - Strength of that gust.
/// - `zoom` - World-to-screen scale.
/// - `pan` - Screen-space offset in pixels.
///
/// - `draw_*` - Layer toggles.
/// - `frames` - Steps taken since the last rebuild.
/// - `last_error` - Message from the last failed rebuild, if any.
pub struct Viewer {
    tree: Tree,
    winds: Vec<Wind>,
    cfg: GrowthConfig,

    rng: rand::rngs::ThreadRng,

    running: bool,
    boosting: bool,
    boost_force: f32,
    zoom: f32,
    pan: egui::Vec2,

    draw_branches: bool,
    draw_leaves: bool,
    draw_debug: bool,
    draw_wind_debug: bool,

    frames: u64,
    last_error: Option<String>,
}

impl Viewer {
    /// Creates a viewer with a freshly grown tree.
    ///
    /// If `cfg` cannot grow a tree, the error is kept for display and the
    /// default configuration is used instead.
    pub fn new(cfg: GrowthConfig) -> Self {
        let mut viewer = Self {
            tree: Tree::default(),
            winds: default_winds(),
            cfg,
            rng: rng(),
            running: true,
            boosting: false,
            boost_force: 1.0,
            zoom: 0.5,
            pan: egui::vec2(0.0, 0.0),
            draw_branches: true,
            draw_leaves: true,
            draw_debug: false,
            draw_wind_debug: false,
            frames: 0,
            last_error: None,
        };
        viewer.rebuild();
        if viewer.last_error.is_some() {
            viewer.cfg = GrowthConfig::default();
            let error = viewer.last_error.take();
            viewer.rebuild();
            viewer.last_error = error;
        }
        viewer
    }

    /// Grows a new tree from the current configuration.
    ///
    /// On failure the previous tree is kept and the error is recorded.
    fn rebuild(&mut self) {
        match build(tree_origin(), &self.cfg, &mut self.rng) {
            Ok(tree) => {
                tracing::info!(
                    branches = tree.branches().len(),
                    nodes = tree.node_count(),
                    leaves = tree.leaves().len(),
                    "rebuilt tree"
                );
                self.tree = tree;
                self.frames = 0;
                self.last_error = None;
            }
            Err(err) => {
                tracing::error!(%err, "could not grow tree");
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Rebuilds the tree, puts the winds back at their start and pauses.
    fn reset(&mut self) {
        self.winds = default_winds();
        self.boosting = false;
        self.rebuild();
        self.running = false;
    }

    /// Advances the simulation by one fixed step.
    ///
    /// Winds move first, then push the tree; the optional gust is added on
    /// top before the tree integrates and propagates its motion.
    fn step_once(&mut self) {
        for wind in &mut self.winds {
            wind.update(DT, SCENE_WIDTH);
        }
        self.tree.apply_wind(&self.winds, &mut self.rng);
        if self.boosting {
            self.tree.apply_force(Vec2::X * self.boost_force);
        }
        self.tree.update(DT);
        self.frames += 1;
    }

    fn scale_winds(&mut self, factor: f32) {
        for wind in &mut self.winds {
            wind.strength *= factor;
        }
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates share the screen's orientation (y down); they are
    /// scaled by `zoom` and offset by `pan` from the top-left of `rect`.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let origin = rect.left_top();
        egui::pos2(
            origin.x + p.x * self.zoom + self.pan.x,
            origin.y + p.y * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let origin = rect.left_top();
        let x = (p.x - origin.x - self.pan.x) / self.zoom;
        let y = (p.y - origin.y - self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, wind, layers, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui.button("Rebuild").clicked() {
                    self.rebuild();
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                if ui.button("Wind +").clicked() {
                    self.scale_winds(WIND_STEP);
                }
                if ui.button("Wind -").clicked() {
                    self.scale_winds(1.0 / WIND_STEP);
                }
                ui.checkbox(&mut self.boosting, "Gust");

                ui.separator();
                ui.checkbox(&mut self.draw_branches, "Branches");
                ui.checkbox(&mut self.draw_leaves, "Leaves");
                ui.checkbox(&mut self.draw_debug, "Segments");
                ui.checkbox(&mut self.draw_wind_debug, "Wind");

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=4.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (frame count, tree size, wind).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("frames = {}", self.frames));
                ui.separator();
                ui.label(format!("branches = {}", self.tree.branches().len()));
                ui.label(format!("nodes = {}", self.tree.node_count()));
                ui.label(format!("leaves = {}", self.tree.leaves().len()));
                ui.separator();
                let strength: f32 = self.winds.iter().map(|w| w.strength).sum();
                ui.label(format!("wind = {strength:.2}"));
            });
        });
    }

    /// Builds the right-hand panel for growth parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Growth");

                ui.separator();
                ui.label("Widths");
                Self::labeled_drag_f32(ui, "branch_width:", &mut self.cfg.branch_width, 1.0..=200.0, 0.5);
                Self::labeled_drag_f32(
                    ui,
                    "branch_width_ratio:",
                    &mut self.cfg.branch_width_ratio,
                    0.5..=0.99,
                    0.005,
                );
                Self::labeled_drag_f32(
                    ui,
                    "split_width_ratio:",
                    &mut self.cfg.split_width_ratio,
                    0.1..=1.0,
                    0.01,
                );

                ui.separator();
                ui.label("Lengths");
                Self::labeled_drag_f32(ui, "branch_length:", &mut self.cfg.branch_length, 1.0..=200.0, 0.5);
                Self::labeled_drag_f32(
                    ui,
                    "branch_length_ratio:",
                    &mut self.cfg.branch_length_ratio,
                    0.5..=0.99,
                    0.005,
                );

                ui.separator();
                ui.label("Angles (rad)");
                Self::labeled_drag_f32(ui, "deviation:", &mut self.cfg.branch_deviation, 0.0..=3.0, 0.01);
                Self::labeled_drag_f32(ui, "split_angle:", &mut self.cfg.branch_split_angle, 0.0..=3.0, 0.01);
                Self::labeled_drag_f32(ui, "split_var:", &mut self.cfg.branch_split_var, 0.0..=3.0, 0.01);

                ui.separator();
                ui.label("Attraction");
                Self::labeled_drag_f32(ui, "x:", &mut self.cfg.attraction.x, -5.0..=5.0, 0.05);
                Self::labeled_drag_f32(ui, "y:", &mut self.cfg.attraction.y, -5.0..=5.0, 0.05);

                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("max_level:");
                    ui.add(egui::DragValue::new(&mut self.cfg.max_level).range(0..=12));
                });
                ui.horizontal(|ui| {
                    ui.label("leaves_per_branch:");
                    ui.add(egui::DragValue::new(&mut self.cfg.leaves_per_branch).range(0..=30));
                });
                Self::labeled_drag_f32(ui, "gust force:", &mut self.boost_force, 0.0..=100.0, 0.1);

                ui.separator();
                if ui.button("Rebuild").clicked() {
                    self.rebuild();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = GrowthConfig::default();
                }
                if let Some(err) = &self.last_error {
                    ui.colored_label(egui::Color32::LIGHT_RED, err);
                }
            });
    }

    /// Adds one tapered ribbon per branch to `mesh`.
    fn branch_mesh(&self, rect: egui::Rect, mesh: &mut egui::Mesh) {
        let color = egui::Color32::from_rgb(120, 80, 50);
        for branch in self.tree.branches() {
            let nodes = &branch.nodes;
            if nodes.len() < 2 {
                continue;
            }
            let first = mesh.vertices.len() as u32;
            for (i, node) in nodes.iter().enumerate() {
                let along = if i + 1 < nodes.len() {
                    nodes[i + 1].position - node.position
                } else {
                    node.position - nodes[i - 1].position
                };
                let normal = along.normalize_or_zero().perp() * (0.5 * node.width);
                mesh.colored_vertex(self.world_to_screen(node.position + normal, rect), color);
                mesh.colored_vertex(self.world_to_screen(node.position - normal, rect), color);
            }
            for i in 0..(nodes.len() as u32 - 1) {
                let a = first + 2 * i;
                mesh.add_triangle(a, a + 1, a + 2);
                mesh.add_triangle(a + 1, a + 3, a + 2);
            }
        }
    }

    /// Adds one quad per leaf to `mesh`, oriented along its flutter.
    fn leaf_mesh(&self, rect: egui::Rect, mesh: &mut egui::Mesh) {
        for leaf in self.tree.leaves() {
            let [r, g, b, a] = leaf.color;
            let color = egui::Color32::from_rgba_unmultiplied(r, g, b, a);
            let first = mesh.vertices.len() as u32;
            for corner in Self::leaf_corners(leaf) {
                mesh.colored_vertex(self.world_to_screen(corner, rect), color);
            }
            mesh.add_triangle(first, first + 1, first + 2);
            mesh.add_triangle(first, first + 2, first + 3);
        }
    }

    fn leaf_corners(leaf: &Leaf) -> [Vec2; 4] {
        let dir = leaf.direction().normalize_or_zero();
        let along = dir * (LEAF_LENGTH * leaf.size);
        let across = dir.perp() * (0.5 * LEAF_WIDTH * leaf.size);
        let attach = leaf.position();
        [
            attach + across,
            attach + across + along,
            attach - across + along,
            attach - across,
        ]
    }

    /// Builds the central panel where the tree is drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.1, 4.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            if self.running {
                self.step_once();
                ctx.request_repaint();
            }

            if self.draw_wind_debug {
                let fill = egui::Color32::from_rgba_unmultiplied(255, 0, 0, 60);
                for wind in &self.winds {
                    let half = 0.5 * wind.width;
                    let min = self.world_to_screen(Vec2::new(wind.pos_x - half, 0.0), rect);
                    let max = self.world_to_screen(Vec2::new(wind.pos_x + half, SCENE_HEIGHT), rect);
                    painter.rect_filled(egui::Rect::from_min_max(min, max), 0.0, fill);
                }
            }

            if self.draw_branches {
                let mut mesh = egui::Mesh::default();
                self.branch_mesh(rect, &mut mesh);
                painter.add(egui::Shape::mesh(mesh));
            }

            if self.draw_leaves {
                let mut mesh = egui::Mesh::default();
                self.leaf_mesh(rect, &mut mesh);
                painter.add(egui::Shape::mesh(mesh));
            }

            if self.draw_debug {
                let stroke = egui::Stroke::new(1.0, egui::Color32::RED);
                for branch in self.tree.branches() {
                    let a = self.world_to_screen(branch.segment.attach_point, rect);
                    let b = self.world_to_screen(branch.segment.moving_point.position, rect);
                    painter.line_segment([a, b], stroke);
                }
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
