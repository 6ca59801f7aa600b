mod job;
mod layer;
mod options;
mod painter;
mod placement;

pub use job::*;
pub use layer::*;
pub use options::*;
pub use painter::*;
pub use placement::*;
