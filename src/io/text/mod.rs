mod number;
mod writer;

pub use number::format_g;
pub use writer::{spectrum_path, write};
