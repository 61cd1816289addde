mod career;
mod raw;
mod record;
mod stats;

pub use career::*;
pub use raw::*;
pub use record::*;
pub use stats::*;
