mod compact;
mod descriptor;
mod merge;
mod types;
mod validation;

pub use compact::parse_compact;
pub use descriptor::parse_descriptor;
pub use merge::{MergeError, accepts, merge, require};
pub use types::{Simple, TypeModel};
pub use validation::conforms;
