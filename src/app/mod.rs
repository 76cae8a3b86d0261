use std::path::PathBuf;

use eframe::egui;
use image::DynamicImage;
use log::info;

use crate::codec;
use crate::controller::Controller;
use crate::model::{AspectConstraint, Rectangle};

mod actions;
mod interaction;
mod native;
mod panel;
mod render;
pub mod settings;
mod update;

pub use native::run_native;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Destination {
    Overwrite,
    SaveAs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AspectChoice {
    Free,
    Preset(usize),
    Custom,
}

/// One opened image together with the controller editing its selection.
struct Session {
    path: PathBuf,
    image: DynamicImage,
    texture: egui::TextureHandle,
    controller: Controller,
}

impl Session {
    fn image_size(&self) -> egui::Vec2 {
        egui::vec2(self.image.width() as f32, self.image.height() as f32)
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

pub struct CropperApp {
    session: Option<Session>,
    settings: settings::AppSettings,
    settings_path: PathBuf,
    presets: Vec<(String, AspectConstraint)>,
    aspect_choice: AspectChoice,
    custom_w: f32,
    custom_h: f32,
    width_input: f32,
    height_input: f32,
    quality: u8,
    estimate: Option<f64>,
    status: Option<String>,
}

impl CropperApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: settings::AppSettings,
        settings_path: PathBuf,
        initial: Option<(PathBuf, DynamicImage)>,
    ) -> Self {
        let presets = settings.presets();
        let aspect = settings.initial_aspect();
        let (aspect_choice, custom_w, custom_h) = match aspect {
            AspectConstraint::Free => (AspectChoice::Free, 1.0, 1.0),
            AspectConstraint::Ratio { w, h } => {
                match presets.iter().position(|(_, c)| *c == aspect) {
                    Some(i) => (AspectChoice::Preset(i), w, h),
                    None => (AspectChoice::Custom, w, h),
                }
            }
        };

        let mut app = Self {
            session: None,
            quality: settings.default_quality.clamp(1, 100),
            settings,
            settings_path,
            presets,
            aspect_choice,
            custom_w,
            custom_h,
            width_input: 0.0,
            height_input: 0.0,
            estimate: None,
            status: None,
        };
        if let Some((path, image)) = initial {
            app.open_session(&cc.egui_ctx, path, image);
        }
        app
    }

    /// Replaces the current session; the previous controller is dropped with it.
    fn open_session(&mut self, ctx: &egui::Context, path: PathBuf, image: DynamicImage) {
        let size = [image.width() as usize, image.height() as usize];
        let rgba = image.to_rgba8();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        let texture = ctx.load_texture("crop_source", color_image, egui::TextureOptions::LINEAR);

        let mut controller = Controller::new(
            image.width() as f32,
            image.height() as f32,
            self.settings.controller_config(),
        );
        controller.set_aspect(self.current_aspect());

        info!(
            "Opened {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        self.session = Some(Session {
            path,
            image,
            texture,
            controller,
        });
        self.clear_inputs();
    }

    fn current_aspect(&self) -> AspectConstraint {
        match self.aspect_choice {
            AspectChoice::Free => AspectConstraint::Free,
            AspectChoice::Preset(i) => self
                .presets
                .get(i)
                .map(|(_, c)| *c)
                .unwrap_or(AspectConstraint::Free),
            // Custom only applies once both sides are positive.
            AspectChoice::Custom => AspectConstraint::ratio(self.custom_w, self.custom_h)
                .unwrap_or(AspectConstraint::Free),
        }
    }

    fn apply_aspect_choice(&mut self) {
        let aspect = self.current_aspect();
        if let Some(session) = &mut self.session {
            session.controller.set_aspect(aspect);
        }
    }

    fn aspect_label(&self) -> String {
        match self.aspect_choice {
            AspectChoice::Free => "Free".to_string(),
            AspectChoice::Preset(i) => self
                .presets
                .get(i)
                .map(|(label, _)| label.clone())
                .unwrap_or_else(|| "Free".to_string()),
            AspectChoice::Custom => "Custom".to_string(),
        }
    }

    fn selection(&self) -> Rectangle {
        self.session
            .as_ref()
            .map(|s| s.controller.rectangle())
            .unwrap_or(Rectangle::EMPTY)
    }

    /// Syncs the numeric inputs and the size estimate with a committed rectangle.
    fn on_commit(&mut self, rect: Rectangle) {
        self.width_input = rect.width.round();
        self.height_input = rect.height.round();
        self.refresh_estimate();
    }

    fn refresh_estimate(&mut self) {
        let rect = self.selection();
        self.estimate =
            (!rect.is_degenerate()).then(|| codec::estimated_bytes(&rect, self.quality));
    }

    fn clear_inputs(&mut self) {
        self.width_input = 0.0;
        self.height_input = 0.0;
        self.estimate = None;
    }
}
