mod body_editor;
mod image_preview;
mod image_renderer;
mod input;
mod status_bar;

pub use body_editor::BodyEditor;
pub use image_preview::{ImagePreview, status_glyph};
pub use image_renderer::{ImageRenderer, fitted_area};
pub use input::TextInput;
pub use status_bar::{StatusBar, StatusLevel, StatusMessage};
