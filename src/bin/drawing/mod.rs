mod painter;
pub mod ui;

pub use painter::*;
