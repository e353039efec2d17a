extern crate nalgebra_glm as glm;

mod cache;
mod controller;
mod fetch;
mod geocode;
mod map;
mod math;
mod position;

pub use cache::*;
pub use controller::*;
pub use fetch::*;
pub use geocode::*;
pub use map::*;
pub use math::*;
pub use position::*;
