//! Validators and converters behind each rule form.

use super::{Form, Rule};
use crate::ast::Node;
use crate::error::{CompileError, Result};
use crate::syntax::parser::Parser;
use crate::types::Ty;

/// Characters that can never appear in an identifier.
const IDENT_FORBIDDEN: &str = " ,'\"()!@#$%^&*[]}{\\|?<>.`~-=+";

/// Characters after which an operator token is a sign, not a binary operator.
const OPERATOR_CHARS: &str = "+-=<>!";

const VAL_PREFIX: &str = "val ";
const TYPE_SEPARATOR: char = ':';
const ASSIGN: char = '=';

pub(super) fn ungroup(inner: Node) -> Node {
    inner
}

/// Byte offsets of every occurrence of `token` outside parentheses.
pub(super) fn top_level_matches(text: &str, token: &str) -> Vec<usize> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth == 0 && text[i..].starts_with(token) {
            out.push(i);
        }
    }
    out
}

/// The last top-level occurrence of `token` that has an operand on its left.
pub(super) fn split_point(text: &str, token: &str) -> Option<usize> {
    top_level_matches(text, token)
        .into_iter()
        .rev()
        .find(|&pos| match text[..pos].trim_end().chars().last() {
            Some(prev) => !OPERATOR_CHARS.contains(prev),
            None => false,
        })
}

/// Byte offset of the `)` closing the `(` at `open`.
fn closing_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

pub(super) fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || IDENT_FORBIDDEN.contains(c))
}

/// Decimal digits with an optional leading minus, whether or not the value
/// fits an `i64`.
fn is_numeric(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn int_literal_matches(text: &str) -> Result<bool> {
    if text.parse::<i64>().is_ok() {
        Ok(true)
    } else if is_numeric(text) {
        Err(CompileError::parse(text, "integer literal out of range"))
    } else {
        Ok(false)
    }
}

fn call_matches(text: &str, start: &str, end: &str, min_body: usize) -> Result<bool> {
    if text.len() < start.len() + end.len() || !text.starts_with(start) || !text.ends_with(end) {
        return Ok(false);
    }
    if start.ends_with('(') && closing_paren(text, start.len() - 1) != Some(text.len() - 1) {
        return Ok(false);
    }
    let body = &text[start.len()..text.len() - end.len()];
    if body.trim().chars().count() < min_body {
        return Err(CompileError::parse(
            text,
            format!("expected {start}<at least {min_body} character(s)>{end}"),
        ));
    }
    Ok(true)
}

/// Pieces of a binding statement: name, declared type, value text.
struct BindingParts<'a> {
    name: &'a str,
    ty: Option<Ty>,
    value: &'a str,
}

fn binding_parts(text: &str) -> Result<Option<BindingParts<'_>>> {
    let Some(rest) = text.strip_prefix(VAL_PREFIX) else {
        return Ok(None);
    };
    let Some((head, value)) = rest.split_once(ASSIGN) else {
        return Ok(None);
    };
    let (name, ty_name) = match head.split_once(TYPE_SEPARATOR) {
        Some((name, ty)) => (name.trim(), Some(ty.trim())),
        None => (head.trim(), None),
    };
    if !is_identifier(name) || is_numeric(name) || matches!(name, "true" | "false") {
        return Err(CompileError::parse(text, format!("'{name}' is not a valid name")));
    }
    let ty = match ty_name {
        None => None,
        Some(ty_name) => match Ty::from_name(ty_name) {
            Some(Ty::Void) => {
                return Err(CompileError::parse(text, "cannot store a void value"));
            }
            Some(ty) => Some(ty),
            None => {
                return Err(CompileError::parse(text, format!("unknown type '{ty_name}'")));
            }
        },
    };
    Ok(Some(BindingParts { name, ty, value }))
}

/// Validate every non-infix form. Infix rules need the registry's symbol
/// table and are handled by `Registry::matches`.
pub(super) fn validate(rule: &Rule, text: &str) -> Result<bool> {
    match rule.form {
        Form::Binding => Ok(binding_parts(text)?.is_some()),
        Form::Call {
            start,
            end,
            min_body,
            ..
        } => call_matches(text, start, end, min_body),
        Form::Infix { token, .. } => Ok(split_point(text, token).is_some()),
        Form::IntLiteral => int_literal_matches(text),
        Form::BoolLiteral => Ok(matches!(text, "true" | "false")),
        Form::Identifier => Ok(is_identifier(text)),
    }
}

impl Rule {
    /// Build the node for text this rule has already validated.
    pub fn convert(&self, parser: &Parser<'_>, text: &str) -> Result<Node> {
        match self.form {
            Form::Binding => {
                let parts = binding_parts(text)?
                    .ok_or_else(|| CompileError::parse(text, "not a binding"))?;
                let value = parser.decode(parts.value)?;
                Ok(Node::bind(parts.name, parts.ty, value))
            }
            Form::Call {
                start, end, build, ..
            } => {
                let body = text
                    .get(start.len()..text.len().saturating_sub(end.len()))
                    .ok_or_else(|| CompileError::parse(text, "truncated bracketed form"))?;
                Ok(build(parser.decode(body)?))
            }
            Form::Infix { token, op } => {
                let pos = split_point(text, token).ok_or_else(|| {
                    CompileError::parse(text, format!("no top-level '{token}' to split on"))
                })?;
                let lhs = parser.decode(&text[..pos])?;
                let rhs = parser.decode(&text[pos + token.len()..])?;
                Ok(Node::binop(op, lhs, rhs))
            }
            Form::IntLiteral => text
                .parse::<i64>()
                .map(Node::Int)
                .map_err(|e| CompileError::parse(text, e.to_string())),
            Form::BoolLiteral => Ok(Node::Bool(text == "true")),
            Form::Identifier => Ok(Node::ident(text)),
        }
    }
}
