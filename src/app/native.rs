use std::path::PathBuf;

use eframe::egui;
use log::info;

use crate::model::SUPPORTED_EXTENSIONS;
use crate::{codec, storage};

use super::{CropperApp, settings};

/// Opens the cropper window. Without a path the user picks one first; a
/// cancelled pick starts with no image.
pub fn run_native(path: Option<PathBuf>) -> crate::Result<()> {
    let fallback = PathBuf::from("settings.json");
    let settings_path = settings::config_path().unwrap_or_else(|| fallback.clone());
    let settings = settings::load_settings(&settings_path)
        .or_else(|| settings::load_settings(&fallback))
        .unwrap_or_default();

    let path = path.or_else(|| {
        rfd::FileDialog::new()
            .add_filter("Images", &SUPPORTED_EXTENSIONS)
            .pick_file()
    });
    let initial = match path {
        Some(path) => {
            storage::ensure_supported(&path)?;
            let image = codec::decode(&storage::read_bytes(&path)?)?;
            Some((path, image))
        }
        None => None,
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(settings.window_size),
        ..Default::default()
    };

    info!(
        "Run with settings from {}: {settings:?}",
        settings_path.display()
    );
    eframe::run_native(
        "Image Cropper",
        options,
        Box::new(move |cc| {
            Ok(Box::new(CropperApp::new(
                cc,
                settings,
                settings_path,
                initial,
            )))
        }),
    )?;
    Ok(())
}
