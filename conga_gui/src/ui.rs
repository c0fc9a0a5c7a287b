// ui.rs - Controls, grid painter and statistics for the egui front end
// Keyboard input is forwarded to the driver so both front ends share one keymap

use eframe::egui;
use egui::{Color32, Rect, Stroke, Vec2};

use conga::pattern::PATTERN_DEFS;
use conga::Key;

use crate::CongaApp;

fn translate(event: &egui::Event) -> Vec<Key> {
    match event {
        egui::Event::Text(text) => text.chars().map(Key::Char).collect(),
        egui::Event::Key { key, pressed: true, .. } => {
            let key = match key {
                egui::Key::Enter => Key::Enter,
                egui::Key::Escape => Key::Esc,
                egui::Key::Backspace => Key::Backspace,
                egui::Key::Tab => Key::Tab,
                egui::Key::ArrowUp => Key::Up,
                egui::Key::ArrowDown => Key::Down,
                egui::Key::ArrowLeft => Key::Left,
                egui::Key::ArrowRight => Key::Right,
                egui::Key::Delete => Key::Delete,
                egui::Key::Home => Key::Home,
                egui::Key::End => Key::End,
                egui::Key::PageUp => Key::PageUp,
                egui::Key::PageDown => Key::PageDown,
                _ => return Vec::new(),
            };
            vec![key]
        }
        _ => Vec::new(),
    }
}

impl eframe::App for CongaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let keys: Vec<Key> = ctx.input(|i| i.events.iter().flat_map(translate).collect());
        for key in keys {
            self.push_key(key);
        }

        if let Err(e) = self.advance() {
            log::warn!("frame update failed: {e}");
        }
        if self.conga.is_done() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("conga");

            // Controls
            ui.horizontal(|ui| {
                let paused = self.conga.is_paused();
                let button_text = if paused { "▶ Start" } else { "⏸ Pause" };
                if ui.button(button_text).clicked() {
                    self.conga.set_paused(!paused);
                    self.redraw();
                }

                if ui.button("⏹ Clear").clicked() {
                    self.clear();
                }

                if ui.button("🎲 Random").clicked() {
                    self.randomize();
                }

                ui.separator();

                ui.label("Pattern:");
                egui::ComboBox::from_id_source("pattern_selector")
                    .selected_text(PATTERN_DEFS[self.selected_pattern].name)
                    .show_ui(ui, |ui| {
                        for (i, def) in PATTERN_DEFS.iter().enumerate() {
                            ui.selectable_value(&mut self.selected_pattern, i, def.name)
                                .on_hover_text(def.desc);
                        }
                    });

                if ui.button("Apply Pattern").clicked() {
                    self.apply_selected_pattern();
                }
            });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Speed:");
                let mut speed = self.generations_per_second();
                if ui.add(egui::Slider::new(&mut speed, 1.0..=50.0).suffix(" gen/sec")).changed() {
                    self.set_generations_per_second(speed);
                }

                ui.separator();

                ui.label("Live:");
                ui.color_edit_button_srgba(&mut self.live_color);
                ui.label("Dead:");
                ui.color_edit_button_srgba(&mut self.dead_color);
            });

            ui.separator();

            ui.label("Space/Enter pause, arrows scroll, g G 0 $ o O jump, + - speed, q quit.");
            ui.label("Click cells to toggle them while paused.");

            ui.separator();

            let view = self.conga.render().viewport();
            let box_size = 15.0;
            let spacing = 0.5;

            let start_pos = ui.cursor().min;
            let total_size = Vec2::new(
                (box_size + spacing) * view.cols as f32 - spacing,
                (box_size + spacing) * view.rows as f32 - spacing,
            );

            let (response, painter) = ui.allocate_painter(total_size, egui::Sense::click());

            painter.rect_filled(
                Rect::from_min_size(start_pos, total_size),
                0.0,
                Color32::BLACK,
            );

            let click = if self.conga.is_paused() && response.clicked() {
                response.interact_pointer_pos()
            } else {
                None
            };
            let mut toggled = None;

            let grid = self.conga.engine().grid();
            for display_row in 0..view.rows {
                for display_col in 0..view.cols {
                    let row = view.top + display_row;
                    let col = view.left + display_col;

                    let x = start_pos.x + display_col as f32 * (box_size + spacing);
                    let y = start_pos.y + display_row as f32 * (box_size + spacing);
                    let rect = Rect::from_min_size(egui::pos2(x, y), Vec2::splat(box_size));

                    let cell_color = if grid.get(row, col) {
                        self.live_color
                    } else {
                        self.dead_color
                    };

                    painter.rect_filled(rect, 1.0, cell_color);
                    painter.rect_stroke(rect, 1.0, Stroke::new(0.2, Color32::from_gray(60)));

                    if click.is_some_and(|pos| rect.contains(pos)) {
                        toggled = Some((row, col));
                    }
                }
            }

            if let Some((row, col)) = toggled {
                self.toggle_cell(row, col);
            }

            ui.separator();

            let stats = self.conga.engine().stats();
            let total = self.conga.engine().grid().len();
            ui.horizontal(|ui| {
                ui.label(format!("Generation: {}", stats.generation));
                ui.label(format!("Live cells: {}", stats.alive));
                ui.label(format!("Dead cells: {}", total - stats.alive));
                ui.label(format!("Population: {:.1}%", stats.alive as f32 / total as f32 * 100.0));
            });

            let status = self.conga.status();
            ui.horizontal(|ui| {
                ui.label(format!("Rule: {}", status.rule));
                ui.label(format!("Delay: {} ms", status.delay.as_millis()));
                ui.label(format!("View: {},{}", view.top, view.left));
                if status.cycling {
                    ui.colored_label(Color32::YELLOW, "cycle");
                }
            });
        });

        ctx.request_repaint_after(self.conga.queue().tick());
    }
}
