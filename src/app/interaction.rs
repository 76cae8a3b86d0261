use eframe::egui;

use crate::canvas::CanvasSpace;

use super::CropperApp;
use super::render::{OverlayStyle, draw_canvas, draw_placeholder};

impl CropperApp {
    /// Draws the image with its selection and feeds pointer input to the
    /// controller.
    pub(super) fn canvas_ui(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let viewport = response.rect;
        let style = OverlayStyle::from_settings(&self.settings);

        let Some(session) = &mut self.session else {
            draw_placeholder(&painter, viewport);
            return;
        };
        let space = CanvasSpace::fit(session.image_size(), viewport);
        let display = space.display_rect();

        let (pressed, released, down, pos) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
                i.pointer.latest_pos(),
            )
        });

        let controller = &mut session.controller;
        let mut committed = None;
        match pos {
            Some(pos) => {
                let p = space.screen_to_image(pos);
                let over_image = response.hovered() && display.contains(pos);
                if pressed && over_image {
                    controller.pointer_down(p);
                } else if !controller.is_idle() {
                    controller.pointer_move(p);
                    if released || !down {
                        committed = controller.pointer_up();
                    } else if !display.contains(pos) {
                        committed = controller.pointer_leave();
                    }
                }
                if over_image {
                    ctx.set_cursor_icon(controller.cursor_hint(p).icon());
                }
            }
            None => {
                if !controller.is_idle() {
                    committed = controller.pointer_leave();
                }
            }
        }
        let selection = controller.rectangle();

        draw_canvas(
            &painter,
            viewport,
            &space,
            session.texture.id(),
            &selection,
            &style,
        );

        if let Some(rect) = committed {
            self.on_commit(rect);
        }
    }
}
