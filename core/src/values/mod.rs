pub mod function;
mod value;

pub use function::{Function, NativeFunction};
pub use value::{Value, format_number};
