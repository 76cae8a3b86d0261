pub mod app;
pub mod canvas;
pub mod codec;
pub mod controller;
pub mod error;
pub mod export;
pub mod model;
pub mod selection;
pub mod storage;

pub use app::{CropperApp, run_native};
pub use controller::{Controller, ControllerConfig, CursorHint, InteractionState};
pub use error::{Error, Result};
pub use model::{AspectConstraint, Corner, CropRequest, Driver, Point, Rectangle, TargetFormat};
pub use selection::SelectionModel;
