//! Configuration options for the VM.

use crate::errors::Error;
use crate::types::{TypeModel, parse_compact, parse_descriptor};

/// Surface syntax used to read textual type descriptors.
///
/// # Example
///
/// ```
/// use typex_core::api::DescriptorSyntax;
/// use typex_core::types::TypeModel;
///
/// let verbose = DescriptorSyntax::Verbose.parse("array(optional(number))").unwrap();
/// let compact = DescriptorSyntax::Compact.parse("n?[]").unwrap();
/// assert_eq!(verbose, compact);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DescriptorSyntax {
    /// `object(name: string, tags: array(string))`
    #[default]
    Verbose,
    /// `{name: s, tags: s[]}`
    Compact,
}

impl DescriptorSyntax {
    pub fn parse(self, input: &str) -> Result<TypeModel, Error> {
        match self {
            DescriptorSyntax::Verbose => parse_descriptor(input),
            DescriptorSyntax::Compact => parse_compact(input),
        }
    }
}

/// Configuration options for expression checking and execution.
///
/// # Example
///
/// ```
/// use typex_core::api::ExecutionOptions;
///
/// let options = ExecutionOptions { max_depth: 500 };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Maximum expression nesting, for recursion protection in both the
    /// analyzer and the evaluator.
    ///
    /// Default: 1000
    pub max_depth: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            max_depth: crate::analyzer::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Configuration options for the VM.
///
/// # Example
///
/// ```
/// use typex_core::api::{DescriptorSyntax, ExecutionOptions, VmOptions};
///
/// let options = VmOptions {
///     descriptor_syntax: DescriptorSyntax::Compact,
///     execution: ExecutionOptions { max_depth: 200 },
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VmOptions {
    pub descriptor_syntax: DescriptorSyntax,
    pub execution: ExecutionOptions,
}
