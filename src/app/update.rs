use eframe::egui;

use super::{CropperApp, Destination};

impl eframe::App for CropperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let wants_keyboard = ctx.wants_keyboard_input();
        let mut save_as = false;
        let mut save = false;
        let mut open = false;
        let mut reset = false;
        ctx.input_mut(|i| {
            if i.consume_key(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::S) {
                save_as = true;
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::S) {
                save = true;
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::O) {
                open = true;
            }
            if !wants_keyboard && i.consume_key(egui::Modifiers::NONE, egui::Key::Escape) {
                reset = true;
            }
        });

        // Dialogs block, so they run outside the input lock.
        if save_as {
            self.export(Destination::SaveAs);
        } else if save {
            self.export(Destination::Overwrite);
        }
        if open {
            self.open_dialog(ctx);
        }
        if reset {
            self.reset_selection();
        }

        egui::SidePanel::right("crop_settings")
            .resizable(true)
            .min_width(240.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.side_panel(ui, ctx);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas_ui(ui, ctx);
        });
    }
}
