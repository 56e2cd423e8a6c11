//! Operand domains and their rendering
//!
//! Each scalar type the assertion engine accepts implements [`Operand`],
//! which ties the type to a [`Domain`] (used for labels) and renders values
//! the way they appear in result lines and diagnostics.

use serde::{Deserialize, Serialize};

/// Scalar value domains supported by equality and array assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    /// Signed 32-bit integer
    Integer,
    /// Signed 64-bit integer
    Long,
    /// Single-precision float
    Float,
    /// Double-precision float
    Double,
    /// Single character
    Char,
}

impl Domain {
    /// Capitalised name used inside assertion labels ("Integer")
    pub fn title(&self) -> &'static str {
        match self {
            Domain::Integer => "Integer",
            Domain::Long => "Long",
            Domain::Float => "Float",
            Domain::Double => "Double",
            Domain::Char => "Char",
        }
    }

    /// Plural noun for operand descriptions ("integers")
    pub fn plural(&self) -> &'static str {
        match self {
            Domain::Integer => "integers",
            Domain::Long => "longs",
            Domain::Float => "floats",
            Domain::Double => "doubles",
            Domain::Char => "chars",
        }
    }

    /// Lowercase singular noun for array descriptions ("integer")
    pub fn singular(&self) -> &'static str {
        match self {
            Domain::Integer => "integer",
            Domain::Long => "long",
            Domain::Float => "float",
            Domain::Double => "double",
            Domain::Char => "char",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.singular())
    }
}

/// A value the assertion engine can compare and print.
///
/// Equality is the type's own `==`. Floats are compared exactly, with no
/// tolerance: `0.1 + 0.2` does not equal `0.3`, and `NaN` never equals
/// anything including itself.
pub trait Operand: Copy + PartialEq {
    const DOMAIN: Domain;

    fn render(&self) -> String;
}

impl Operand for i32 {
    const DOMAIN: Domain = Domain::Integer;

    fn render(&self) -> String {
        self.to_string()
    }
}

impl Operand for i64 {
    const DOMAIN: Domain = Domain::Long;

    fn render(&self) -> String {
        self.to_string()
    }
}

impl Operand for f32 {
    const DOMAIN: Domain = Domain::Float;

    fn render(&self) -> String {
        format!("{:.6}f", self)
    }
}

impl Operand for f64 {
    const DOMAIN: Domain = Domain::Double;

    fn render(&self) -> String {
        format!("{:.6}", self)
    }
}

impl Operand for char {
    const DOMAIN: Domain = Domain::Char;

    fn render(&self) -> String {
        format!("{:?}", self)
    }
}

/// Render a slice as `[a, b, c]`, optionally highlighting one index
pub(crate) fn render_slice<T: Operand>(
    values: &[T],
    highlight: Option<(usize, &dyn Fn(String) -> String)>,
) -> String {
    let items: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, v)| match highlight {
            Some((index, mark)) if index == i => mark(v.render()),
            _ => v.render(),
        })
        .collect();
    format!("[{}]", items.join(", "))
}
