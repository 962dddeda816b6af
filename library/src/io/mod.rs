pub mod png_export;

pub use png_export::{export_png, to_rgba_image};
