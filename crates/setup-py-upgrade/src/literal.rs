//! Safe evaluation of Python literal expressions
//!
//! Only constants and containers of constants are reduced to values. Names,
//! attribute access, arithmetic, calls, f-strings and comprehensions are not
//! evaluated; they make the whole expression non-literal.

use ruff_python_ast::{Expr, Number, UnaryOp};

use crate::types::Literal;

/// Reduce an expression to a [`Literal`], or `None` if any part of it is not a
/// constant.
pub fn literal_eval(expr: &Expr) -> Option<Literal> {
    match expr {
        Expr::StringLiteral(string_lit) => Some(Literal::Str(string_lit.value.to_str().to_string())),
        Expr::BytesLiteral(bytes_lit) => Some(Literal::Bytes(bytes_lit.value.bytes().collect())),
        Expr::NumberLiteral(number) => Some(number_literal(&number.value)),
        Expr::BooleanLiteral(boolean) => Some(Literal::Bool(boolean.value)),
        Expr::NoneLiteral(_) => Some(Literal::None),
        Expr::List(list) => eval_elements(&list.elts).map(Literal::List),
        Expr::Tuple(tuple) => eval_elements(&tuple.elts).map(Literal::Tuple),
        Expr::Set(set) => {
            let mut elts: Vec<Literal> = Vec::with_capacity(set.elts.len());
            for elt in &set.elts {
                let value = literal_eval(elt)?;
                if !is_hashable(&value) {
                    return None;
                }
                if !elts.contains(&value) {
                    elts.push(value);
                }
            }
            Some(Literal::Set(elts))
        }
        Expr::Dict(dict) => {
            let mut items: Vec<(Literal, Literal)> = Vec::with_capacity(dict.items.len());
            for item in &dict.items {
                // `**mapping` entries have no key
                let key = literal_eval(item.key.as_ref()?)?;
                if !is_hashable(&key) {
                    return None;
                }
                let value = literal_eval(&item.value)?;
                // A repeated key keeps its first position and takes the last value
                match items.iter_mut().find(|(existing, _)| *existing == key) {
                    Some((_, slot)) => *slot = value,
                    None => items.push((key, value)),
                }
            }
            Some(Literal::Dict(items))
        }
        Expr::UnaryOp(unary) => {
            let Expr::NumberLiteral(number) = unary.operand.as_ref() else {
                return None;
            };
            let value = number_literal(&number.value);
            match unary.op {
                UnaryOp::UAdd => Some(value),
                UnaryOp::USub => negate(value),
                UnaryOp::Not | UnaryOp::Invert => None,
            }
        }
        _ => None,
    }
}

fn eval_elements(elts: &[Expr]) -> Option<Vec<Literal>> {
    elts.iter().map(literal_eval).collect()
}

fn number_literal(number: &Number) -> Literal {
    match number {
        Number::Int(int) => Literal::Int(int.to_string()),
        Number::Float(value) => Literal::Float(*value),
        Number::Complex { imag, .. } => Literal::Complex(*imag),
    }
}

fn negate(value: Literal) -> Option<Literal> {
    match value {
        Literal::Int(digits) if digits == "0" => Some(Literal::Int(digits)),
        Literal::Int(digits) => Some(Literal::Int(format!("-{digits}"))),
        Literal::Float(value) => Some(Literal::Float(-value)),
        Literal::Complex(imag) => Some(Literal::Complex(-imag)),
        _ => None,
    }
}

/// Python refuses mutable containers as dict keys
fn is_hashable(value: &Literal) -> bool {
    match value {
        Literal::List(_) | Literal::Set(_) | Literal::Dict(_) => false,
        Literal::Tuple(elts) => elts.iter().all(is_hashable),
        _ => true,
    }
}
