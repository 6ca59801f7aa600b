mod color;
mod declaration;
mod font;
mod lenient;
mod resolver;
mod rules;

pub use color::*;
pub use declaration::*;
pub use font::*;
pub use resolver::*;
pub use rules::*;
