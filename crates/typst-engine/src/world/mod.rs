//! Typst `World` for in-memory report compilation

pub mod fonts;
pub mod virtual_world;

pub use fonts::{global_font_cache, FontCache};
pub use virtual_world::VirtualWorld;
