use eframe::egui::{self, Align2, Color32, FontId, Pos2, Stroke};
use eframe::egui::epaint::CubicBezierShape;
use hourglass_sand::{GlassOutline, PointerInput, SimConfig, Simulation, math, vec2};

const BACKGROUND: Color32 = Color32::from_rgb(30, 30, 35);

fn color32(c: math::Color, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, alpha)
}

struct HourglassApp {
    sim: Simulation,
    last_frame_time: std::time::Instant,
    accumulated_time: std::time::Duration,
    simulation_rate: f32,
    last_update_time: std::time::Duration,
}

impl HourglassApp {
    fn new(_cc: &eframe::CreationContext) -> Self {
        HourglassApp {
            sim: Simulation::new(SimConfig::default()),
            last_frame_time: std::time::Instant::now(),
            accumulated_time: std::time::Duration::ZERO,
            simulation_rate: 60.0,
            last_update_time: std::time::Duration::ZERO,
        }
    }

    fn render_ui_panel(&mut self, ui: &mut egui::Ui, frame_time: f32) {
        ui.label(format!("FPS: {:.1}", 1.0 / frame_time.max(1e-6)));
        ui.label(format!("Frame Time: {:.3}ms", frame_time * 1000.0));
        ui.label(format!(
            "Step Time: {:.3}ms",
            self.last_update_time.as_secs_f64() * 1000.0
        ));
        ui.label(format!("Frame: {}", self.sim.frame()));
        ui.label(format!("Particles: {}", self.sim.system.len()));
        let settled = self
            .sim
            .system
            .particles()
            .iter()
            .filter(|p| p.settled)
            .count();
        ui.label(format!("Settled: {settled}"));

        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Simulation Rate: ");
            ui.add(egui::Slider::new(&mut self.simulation_rate, 1.0..=240.0));
        });

        ui.horizontal(|ui| {
            ui.label("Gravity: ");
            ui.add(
                egui::Slider::new(&mut self.sim.config.gravity.y, 0.0..=0.2)
                    .drag_value_speed(0.005),
            );
        });

        ui.horizontal(|ui| {
            ui.label("Repeller Strength: ");
            ui.add(egui::Slider::new(&mut self.sim.repeller.strength, -100.0..=0.0));
        });

        if ui.button("Restart").clicked() {
            self.sim = Simulation::new(self.sim.config.clone());
        }
    }

    fn draw_glass(&self, painter: &egui::Painter, origin: Pos2) {
        let cfg = &self.sim.config;
        let at = |v: math::Vec2| origin + egui::vec2(v.x, v.y);
        let stroke = Stroke::new(4.0, Color32::from_rgba_unmultiplied(200, 200, 200, 50));

        let right = GlassOutline::from_config(cfg);
        let left = right.mirrored(cfg.center_x());
        for side in [&right, &left] {
            for curve in [&side.upper, &side.lower] {
                painter.add(CubicBezierShape::from_points_stroke(
                    curve.map(at),
                    false,
                    Color32::TRANSPARENT,
                    stroke,
                ));
            }
            painter.line_segment([at(side.neck.0), at(side.neck.1)], stroke);
        }
        // Rim and floor close the outline.
        painter.line_segment([at(right.upper[0]), at(left.upper[0])], stroke);
        painter.line_segment([at(right.lower[3]), at(left.lower[3])], stroke);

        // Glass reflections.
        let shine = Stroke::new(2.0, Color32::from_rgba_unmultiplied(255, 255, 255, 30));
        let (cx, w) = (cfg.center_x(), cfg.glass_width / 2.0);
        let (top, bottom) = (cfg.top_y(), cfg.bottom_y());
        painter.line_segment(
            [at(vec2(cx - w + 20.0, top + 20.0)), at(vec2(cx - w + 20.0, top + 80.0))],
            shine,
        );
        painter.line_segment(
            [
                at(vec2(cx + w - 20.0, bottom - 80.0)),
                at(vec2(cx + w - 20.0, bottom - 20.0)),
            ],
            shine,
        );
    }

    fn draw_fields(&self, painter: &egui::Painter, origin: Pos2) {
        let at = |v: math::Vec2| origin + egui::vec2(v.x, v.y);
        for a in &self.sim.attractors {
            painter.circle_filled(at(a.position), 20.0, Color32::from_rgba_unmultiplied(100, 255, 100, 50));
            painter.circle_filled(at(a.position), 5.0, Color32::from_rgb(100, 255, 100));
        }
        let r = &self.sim.repeller;
        painter.circle_filled(at(r.position), 25.0, Color32::from_rgba_unmultiplied(255, 50, 50, 50));
        painter.circle_filled(at(r.position), 7.5, Color32::from_rgb(255, 50, 50));
    }

    fn draw_particles(&self, painter: &egui::Painter, origin: Pos2) {
        for p in self.sim.system.particles() {
            let pos = origin + egui::vec2(p.position.x, p.position.y);
            let fill = if p.settled {
                color32(p.color, 200)
            } else {
                color32(p.color, 255)
            };
            painter.circle_filled(pos, 2.0, fill);
        }
    }

    fn draw_overlay(&self, painter: &egui::Painter, origin: Pos2) {
        let lines = [
            "LIFE IN AN HOURGLASS",
            "Attractors (Goals) pull the sand.",
            "Repeller (Hardship) pushes it away.",
            "Click and drag mouse in bottom half to move the Obstacle.",
        ];
        let font = FontId::proportional(12.0);
        let color = Color32::from_gray(150);
        for (i, line) in lines.iter().enumerate() {
            painter.text(
                origin + egui::vec2(20.0, 20.0 + 20.0 * i as f32),
                Align2::LEFT_TOP,
                *line,
                font.clone(),
                color,
            );
        }
    }
}

impl eframe::App for HourglassApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let current_time = std::time::Instant::now();
        let frame_time = current_time.duration_since(self.last_frame_time);
        self.last_frame_time = current_time;
        self.accumulated_time += frame_time;
        let ts = frame_time.as_secs_f32();

        egui::SidePanel::left("Control Panel").show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_ui_panel(ui, ts);
                ui.allocate_space(ui.available_size());
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND))
            .show(ctx, |ui| {
                let canvas = egui::vec2(self.sim.config.width, self.sim.config.height);
                let (rect, _response) = ui.allocate_exact_size(canvas, egui::Sense::click_and_drag());

                // One simulation step per rendered frame, gated by the
                // fixed-rate accumulator.
                if self.accumulated_time.as_secs_f32() >= 1.0 / self.simulation_rate {
                    let step_time = 1.0 / self.simulation_rate;
                    let pointer = ctx.input(|i| {
                        let pos = i.pointer.interact_pos().unwrap_or(rect.min);
                        PointerInput {
                            pressed: i.pointer.primary_down(),
                            position: vec2(pos.x - rect.min.x, pos.y - rect.min.y),
                        }
                    });

                    let start = std::time::Instant::now();
                    self.sim.step(pointer);
                    self.last_update_time = start.elapsed();

                    self.accumulated_time -= std::time::Duration::from_secs_f32(step_time);
                }

                let painter = ui.painter_at(rect);
                self.draw_glass(&painter, rect.min);
                self.draw_fields(&painter, rect.min);
                self.draw_particles(&painter, rect.min);
                self.draw_overlay(&painter, rect.min);
            });

        ctx.request_repaint();
    }
}

fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    eframe::run_native(
        "Life in an Hourglass",
        eframe::NativeOptions {
            initial_window_size: Some(egui::vec2(1000.0, 620.0)),
            ..Default::default()
        },
        Box::new(|cc| Box::new(HourglassApp::new(cc))),
    )
}
