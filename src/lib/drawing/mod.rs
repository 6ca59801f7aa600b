mod assets;
mod path_text;
mod recording;
mod surface;

pub use assets::*;
pub use path_text::*;
pub use recording::*;
pub use surface::*;
