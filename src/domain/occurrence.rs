//! Call occurrences found in a build script
//!
//! An occurrence is the syntax-free view of a call such as
//! `implementation(group = "g", name = "a") { isTransitive = false }`:
//! callee name, argument shapes and argument values, with byte ranges into
//! the source buffer so generated text can be written back.

use crate::domain::Expression;
use std::ops::Range;

/// One argument of a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArgument {
    /// Parameter label for `name = value` arguments
    pub name: Option<String>,
    pub value: Expression,
    /// Range of the whole argument, label included
    pub range: Range<usize>,
}

/// A call statement with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOccurrence {
    pub callee: String,
    pub callee_range: Range<usize>,
    pub arguments: Vec<CallArgument>,
    /// Range of the parenthesised argument list, parentheses included
    pub arguments_range: Range<usize>,
    /// Whether a configuration lambda follows the argument list
    pub has_trailing_lambda: bool,
    /// Range of the whole statement, trailing lambda included
    pub range: Range<usize>,
}

impl CallArgument {
    pub fn positional(value: Expression) -> Self {
        Self {
            name: None,
            value,
            range: 0..0,
        }
    }

    pub fn named(name: impl Into<String>, value: Expression) -> Self {
        Self {
            name: Some(name.into()),
            value,
            range: 0..0,
        }
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

impl CallOccurrence {
    /// Occurrence without source positions
    pub fn new(callee: impl Into<String>, arguments: Vec<CallArgument>) -> Self {
        Self {
            callee: callee.into(),
            callee_range: 0..0,
            arguments,
            arguments_range: 0..0,
            has_trailing_lambda: false,
            range: 0..0,
        }
    }

    pub fn named_count(&self) -> usize {
        self.arguments.iter().filter(|a| a.is_named()).count()
    }

    pub fn unnamed_count(&self) -> usize {
        self.arguments.len() - self.named_count()
    }

    /// Value of the argument labelled `name`
    pub fn named_argument(&self, name: &str) -> Option<&Expression> {
        self.arguments
            .iter()
            .find(|a| a.name.as_deref() == Some(name))
            .map(|a| &a.value)
    }
}
