//! Shared type definitions for the upgrade pipeline
//!
//! This module contains the value model produced by literal evaluation and
//! the ordered map aliases used for sections, so the visitor, the
//! post-processor and the writer all agree on one representation.

use std::fmt::{self, Write as _};
use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use rustc_hash::FxHasher;

/// Type alias for IndexMap with FxHasher for better performance
pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Extracted keyword values grouped by section, in insertion order
pub type SectionMap = FxIndexMap<String, FxIndexMap<String, Literal>>;

/// Post-processed sections where every value is configuration text
pub type RenderedSections = FxIndexMap<String, FxIndexMap<String, String>>;

/// A statically evaluated Python literal
///
/// This mirrors the subset of Python values that can be produced without
/// executing any code: constants and containers of constants.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    /// Integers keep their decimal text so arbitrarily large values survive
    Int(String),
    Float(f64),
    /// Imaginary literal, e.g. `2j`
    Complex(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Set(Vec<Literal>),
    /// Dictionary entries in source order
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Elements of a list, tuple or set
    pub fn as_sequence(&self) -> Option<&[Literal]> {
        match self {
            Self::List(elts) | Self::Tuple(elts) | Self::Set(elts) => Some(elts),
            _ => None,
        }
    }

    pub fn is_dict(&self) -> bool {
        matches!(self, Self::Dict(_))
    }

    /// Text used when the value is written into the configuration document.
    ///
    /// Strings are written verbatim; everything else follows Python's `str()`.
    pub fn to_config_text(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn write_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write_str_repr(f, s),
            other => fmt::Display::fmt(other, f),
        }
    }
}

/// Python `str()` rendering
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(digits) => f.write_str(digits),
            Self::Float(value) => f.write_str(&float_repr(*value)),
            Self::Complex(imag) => write!(f, "{}j", complex_part_repr(*imag)),
            Self::Str(s) => f.write_str(s),
            Self::Bytes(bytes) => write_bytes_repr(f, bytes),
            Self::List(elts) => {
                f.write_char('[')?;
                write_elements(f, elts)?;
                f.write_char(']')
            }
            Self::Tuple(elts) => {
                f.write_char('(')?;
                write_elements(f, elts)?;
                if elts.len() == 1 {
                    f.write_char(',')?;
                }
                f.write_char(')')
            }
            Self::Set(elts) if elts.is_empty() => f.write_str("set()"),
            Self::Set(elts) => {
                f.write_char('{')?;
                write_elements(f, elts)?;
                f.write_char('}')
            }
            Self::Dict(items) => {
                f.write_char('{')?;
                for (index, (key, value)) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    key.write_repr(f)?;
                    f.write_str(": ")?;
                    value.write_repr(f)?;
                }
                f.write_char('}')
            }
        }
    }
}

fn write_elements(f: &mut fmt::Formatter<'_>, elts: &[Literal]) -> fmt::Result {
    for (index, elt) in elts.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        elt.write_repr(f)?;
    }
    Ok(())
}

/// Python `repr()` of a `str`: single quotes unless only double quotes avoid escaping
fn write_str_repr(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    f.write_char(quote)?;
    for ch in s.chars() {
        match ch {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c if c.is_control() => write!(f, "\\x{:02x}", u32::from(c))?,
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

fn write_bytes_repr(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') {
        b'"'
    } else {
        b'\''
    };
    f.write_char('b')?;
    f.write_char(char::from(quote))?;
    for &byte in bytes {
        match byte {
            b'\\' => f.write_str("\\\\")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            b if b == quote => {
                f.write_char('\\')?;
                f.write_char(char::from(b))?;
            }
            0x20..=0x7e => f.write_char(char::from(byte))?,
            _ => write!(f, "\\x{byte:02x}")?,
        }
    }
    f.write_char(char::from(quote))
}

/// Python float `repr()`: shortest round-trip digits, `.0` for integral
/// values and a signed two-digit exponent outside `[1e-4, 1e16)`
fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_owned();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{value:e}");
        let Some((mantissa, exponent)) = formatted.split_once('e') else {
            return formatted;
        };
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        return format!("{mantissa}e{sign}{digits:0>2}");
    }

    let formatted = format!("{value}");
    if formatted.contains('.') {
        formatted
    } else {
        format!("{formatted}.0")
    }
}

/// Imaginary parts drop the `.0` suffix, like Python's `complex.__repr__`
fn complex_part_repr(value: f64) -> String {
    let repr = float_repr(value);
    match repr.strip_suffix(".0") {
        Some(integral) => integral.to_owned(),
        None => repr,
    }
}
