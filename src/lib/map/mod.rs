mod camera;
mod flight;
mod surface;
mod view;

pub use camera::*;
pub use flight::*;
pub use surface::*;
pub use view::*;
