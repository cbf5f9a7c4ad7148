mod document;
mod sermon;

pub use document::*;
pub use sermon::*;
