mod collider;
mod collision;

pub use collider::*;
pub use collision::*;
