mod tile_id;
mod transform;

pub use tile_id::*;
pub use transform::*;
