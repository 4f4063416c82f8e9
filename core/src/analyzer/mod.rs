mod analyzer;


pub use analyzer::{Analyzer, DEFAULT_MAX_DEPTH, TypeScope, analyze};
