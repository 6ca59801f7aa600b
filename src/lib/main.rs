mod cache;
mod drawing;
mod error;
mod feature;
mod fetch;
mod interaction;
mod math;
mod render;
mod style;
mod vector_tile;

pub use cache::*;
pub use drawing::*;
pub use error::*;
pub use feature::*;
pub use fetch::*;
pub use interaction::*;
pub use math::*;
pub use render::*;
pub use style::*;
pub use vector_tile::*;
