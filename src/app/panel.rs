use eframe::egui;

use crate::codec;

use super::{AspectChoice, CropperApp, Destination};

impl CropperApp {
    pub(super) fn side_panel(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.heading("Crop Settings");
        match &self.session {
            Some(session) => ui.label(session.file_name()),
            None => ui.weak("No image loaded"),
        };
        if ui.button("Open image...").clicked() {
            self.open_dialog(ctx);
        }
        ui.separator();

        self.aspect_ui(ui);
        ui.separator();
        self.size_ui(ui);
        ui.separator();

        ui.label("Quality");
        if ui
            .add(egui::Slider::new(&mut self.quality, 1..=100).suffix("%"))
            .changed()
        {
            self.refresh_estimate();
        }
        ui.weak("Ignored for GIF and BMP output");
        ui.separator();

        let rect = self.selection();
        if rect.is_degenerate() {
            ui.weak("No selection");
        } else {
            egui::Grid::new("selection_readout")
                .num_columns(2)
                .show(ui, |ui| {
                    ui.label("X");
                    ui.label(format!("{:.0}", rect.x));
                    ui.end_row();
                    ui.label("Y");
                    ui.label(format!("{:.0}", rect.y));
                    ui.end_row();
                    ui.label("Width");
                    ui.label(format!("{:.0}", rect.width));
                    ui.end_row();
                    ui.label("Height");
                    ui.label(format!("{:.0}", rect.height));
                    ui.end_row();
                });
        }
        if let Some(bytes) = self.estimate {
            ui.group(|ui| {
                ui.label("Output size");
                ui.strong(format!("{} (estimated)", codec::format_kb(bytes)));
            });
        }
        ui.separator();

        let has_image = self.session.is_some();
        ui.horizontal(|ui| {
            if ui.add_enabled(has_image, egui::Button::new("Save")).clicked() {
                self.export(Destination::Overwrite);
            }
            if ui
                .add_enabled(has_image, egui::Button::new("Save As..."))
                .clicked()
            {
                self.export(Destination::SaveAs);
            }
        });
        ui.horizontal(|ui| {
            if ui
                .add_enabled(has_image, egui::Button::new("Reset Selection"))
                .clicked()
            {
                self.reset_selection();
            }
            if ui.button("Save settings").clicked() {
                self.persist_settings();
            }
        });

        if let Some(status) = &self.status {
            ui.separator();
            ui.label(status);
        }
    }

    fn aspect_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Aspect ratio");
        let mut choice = self.aspect_choice;
        egui::ComboBox::from_id_salt("aspect_ratio")
            .selected_text(self.aspect_label())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut choice, AspectChoice::Free, "Free");
                for (i, (label, _)) in self.presets.iter().enumerate() {
                    ui.selectable_value(&mut choice, AspectChoice::Preset(i), label.as_str());
                }
                ui.selectable_value(&mut choice, AspectChoice::Custom, "Custom");
            });
        let mut changed = choice != self.aspect_choice;
        self.aspect_choice = choice;

        if self.aspect_choice == AspectChoice::Custom {
            ui.horizontal(|ui| {
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut self.custom_w)
                            .range(0.1..=100.0)
                            .speed(0.1),
                    )
                    .changed();
                ui.label(":");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut self.custom_h)
                            .range(0.1..=100.0)
                            .speed(0.1),
                    )
                    .changed();
            });
        }
        if changed {
            self.apply_aspect_choice();
        }
    }

    fn size_ui(&mut self, ui: &mut egui::Ui) {
        let Some(session) = &mut self.session else {
            ui.weak("Width and height are set once an image is open");
            return;
        };
        let (max_w, max_h) = session.controller.canvas_size();
        let mut width_changed = false;
        let mut height_changed = false;
        ui.horizontal(|ui| {
            ui.label("W:");
            width_changed = ui
                .add(
                    egui::DragValue::new(&mut self.width_input)
                        .range(0.0..=max_w)
                        .speed(1.0),
                )
                .changed();
            ui.label("H:");
            height_changed = ui
                .add(
                    egui::DragValue::new(&mut self.height_input)
                        .range(0.0..=max_h)
                        .speed(1.0),
                )
                .changed();
        });

        if width_changed {
            session.controller.set_width(self.width_input);
        } else if height_changed {
            session.controller.set_height(self.height_input);
        } else {
            return;
        }
        let rect = session.controller.rectangle();
        self.on_commit(rect);
    }
}
