use std::path::{Path, PathBuf};

use eframe::egui;
use log::{error, info};

use crate::error::Error;
use crate::export::export_crop;
use crate::model::{CropRequest, SUPPORTED_EXTENSIONS, TargetFormat};
use crate::{codec, storage};

use super::{CropperApp, Destination, settings};

impl CropperApp {
    /// Writes the current crop over the source file or to a picked path.
    pub(super) fn export(&mut self, destination: Destination) {
        let Some(session) = &self.session else {
            self.status = Some(Error::NoImage.to_string());
            return;
        };
        let rect = session.controller.rectangle();
        if rect.is_degenerate() {
            self.status = Some(Error::EmptySelection.to_string());
            return;
        }

        let path = match destination {
            Destination::Overwrite => session.path.clone(),
            Destination::SaveAs => match self.pick_save_path(&session.path) {
                Some(path) => path,
                None => return,
            },
        };
        let source_format = TargetFormat::from_path(&session.path).unwrap_or(TargetFormat::Png);
        let format = TargetFormat::from_path(&path).unwrap_or(source_format);
        let request = CropRequest::new(rect, self.quality, format);

        match export_crop(Some(&session.image), &request, &path) {
            Ok(written) => {
                self.status = Some(format!(
                    "Image saved successfully! Size: {}",
                    codec::format_kb(written as f64)
                ));
            }
            Err(e) => {
                error!("Export to {} failed: {e}", path.display());
                self.status = Some(format!("Failed to save image: {e}"));
            }
        }
    }

    fn pick_save_path(&self, original: &Path) -> Option<PathBuf> {
        let suggested = storage::default_save_as_path(original);
        let mut dialog = rfd::FileDialog::new().add_filter("Images", &SUPPORTED_EXTENSIONS);
        if let Some(name) = suggested.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
        if let Some(dir) = suggested.parent() {
            dialog = dialog.set_directory(dir);
        }
        dialog.save_file()
    }

    pub(super) fn open_dialog(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &SUPPORTED_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        let loaded = storage::ensure_supported(&path)
            .and_then(|_| storage::read_bytes(&path))
            .and_then(|bytes| codec::decode(&bytes));
        match loaded {
            Ok(image) => {
                self.status = Some(format!("Loaded {}", path.display()));
                self.open_session(ctx, path, image);
            }
            Err(e) => {
                error!("Opening {} failed: {e}", path.display());
                self.status = Some(format!("Failed to open image: {e}"));
            }
        }
    }

    pub(super) fn reset_selection(&mut self) {
        if let Some(session) = &mut self.session {
            session.controller.reset();
        }
        self.clear_inputs();
        self.status = None;
    }

    pub(super) fn settings_snapshot(&self) -> settings::AppSettings {
        settings::AppSettings {
            default_quality: self.quality,
            aspect: self.current_aspect().to_string(),
            ..self.settings.clone()
        }
    }

    pub(super) fn persist_settings(&mut self) {
        let snapshot = self.settings_snapshot();
        match settings::save_settings(&self.settings_path, &snapshot) {
            Ok(()) => {
                info!("Saved settings to {}", self.settings_path.display());
                self.settings = snapshot;
                self.status = Some(format!(
                    "Settings saved to {}",
                    self.settings_path.display()
                ));
            }
            Err(e) => {
                error!("Saving settings failed: {e}");
                self.status = Some(format!("Settings save failed: {e}"));
            }
        }
    }
}
