//! Path-expression parsing and literal quoting.
//!
//! The addressing language is the XPath-like subset engines use for
//! line-record files: absolute `/`-separated segments, each either a label or
//! `*`, optionally narrowed by one predicate. Expressions are parsed up front
//! into [`Expr`] so resolution never works on raw strings, and literals only
//! enter an expression through [`quote`].

use lazy_static::lazy_static;
use regex::Regex;

use crate::Error;

/// A parsed absolute path expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Expr {
    pub steps: Vec<Step>,
}

/// One `/`-separated segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Step {
    pub label: Label,
    pub pred: Option<Pred>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Label {
    /// `*` — any child.
    Any,
    /// A literal label.
    Name(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Pred {
    /// `[n]` — 1-based position among same-labeled siblings.
    Index(usize),
    /// `[last()]` — the highest-positioned same-labeled sibling.
    Last,
    /// `[last()+1]` — matches nothing; a creation target for `set`.
    AfterLast,
    /// `[child = 'literal']` — nodes with a child of that label and value.
    ChildEq(String, String),
}

/// Quote a literal for use in a `[child = …]` predicate.
///
/// The grammar has no escape syntax, so a literal containing both quote
/// characters cannot be represented. Callers must treat `None` as a hard
/// error; raw strings are never spliced into an expression.
pub fn quote(literal: &str) -> Option<String> {
    if !literal.contains('\'') {
        Some(format!("'{}'", literal))
    } else if !literal.contains('"') {
        Some(format!("\"{}\"", literal))
    } else {
        None
    }
}

pub(crate) fn parse(expr: &str) -> Result<Expr, Error> {
    let segments = split_segments(expr)?;
    let steps = segments
        .iter()
        .map(|s| parse_segment(s, expr))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Expr { steps })
}

fn invalid(expr: &str, message: impl Into<String>) -> Error {
    Error::Expr {
        expr: expr.to_string(),
        message: message.into(),
    }
}

/// Split on `/`, honoring quotes and brackets so a mountpoint like `/data`
/// inside a predicate literal does not break the segment structure.
fn split_segments(expr: &str) -> Result<Vec<String>, Error> {
    let body = expr
        .strip_prefix('/')
        .ok_or_else(|| invalid(expr, "expression must be absolute"))?;

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut quote_char: Option<char> = None;
    let mut in_pred = false;

    for c in body.chars() {
        if let Some(q) = quote_char {
            current.push(c);
            if c == q {
                quote_char = None;
            }
            continue;
        }
        match c {
            '\'' | '"' if in_pred => {
                quote_char = Some(c);
                current.push(c);
            }
            '[' => {
                if in_pred {
                    return Err(invalid(expr, "nested predicate"));
                }
                in_pred = true;
                current.push(c);
            }
            ']' => {
                if !in_pred {
                    return Err(invalid(expr, "unbalanced ']'"));
                }
                in_pred = false;
                current.push(c);
            }
            '/' if !in_pred => {
                if current.is_empty() {
                    return Err(invalid(expr, "empty segment"));
                }
                segments.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }

    if quote_char.is_some() {
        return Err(invalid(expr, "unterminated quote"));
    }
    if in_pred {
        return Err(invalid(expr, "unterminated predicate"));
    }
    if current.is_empty() {
        return Err(invalid(expr, "empty segment"));
    }
    segments.push(current);
    Ok(segments)
}

fn parse_segment(segment: &str, expr: &str) -> Result<Step, Error> {
    let (label_part, pred_part) = match segment.find('[') {
        Some(i) => {
            let inner = segment[i + 1..]
                .strip_suffix(']')
                .ok_or_else(|| invalid(expr, "predicate must end the segment"))?;
            if scan_contains_close(inner) {
                return Err(invalid(expr, "at most one predicate per segment"));
            }
            (&segment[..i], Some(inner))
        }
        None => (segment, None),
    };

    let label = match label_part {
        "" => return Err(invalid(expr, "missing label")),
        "*" => Label::Any,
        name => Label::Name(name.to_string()),
    };
    let pred = pred_part.map(|p| parse_pred(p, expr)).transpose()?;
    Ok(Step { label, pred })
}

/// True when `inner` holds a `]` outside quotes, i.e. the segment carried more
/// than one bracketed expression.
fn scan_contains_close(inner: &str) -> bool {
    let mut quote_char: Option<char> = None;
    for c in inner.chars() {
        match quote_char {
            Some(q) => {
                if c == q {
                    quote_char = None;
                }
            }
            None => match c {
                '\'' | '"' => quote_char = Some(c),
                ']' => return true,
                _ => {}
            },
        }
    }
    false
}

fn parse_pred(inner: &str, expr: &str) -> Result<Pred, Error> {
    let trimmed = inner.trim();
    if trimmed == "last()" {
        return Ok(Pred::Last);
    }
    if trimmed == "last()+1" {
        return Ok(Pred::AfterLast);
    }
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        let n: usize = trimmed
            .parse()
            .map_err(|_| invalid(expr, "position out of range"))?;
        if n == 0 {
            return Err(invalid(expr, "positions are 1-based"));
        }
        return Ok(Pred::Index(n));
    }

    lazy_static! {
        static ref CHILD_EQ: Regex =
            Regex::new(r#"^([^=\s\[\]'"]+)\s*=\s*(?:'([^']*)'|"([^"]*)")$"#).unwrap();
    }
    if let Some(caps) = CHILD_EQ.captures(trimmed) {
        let child = caps[1].to_string();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map_or("", |m| m.as_str())
            .to_string();
        return Ok(Pred::ChildEq(child, value));
    }

    Err(invalid(expr, format!("unsupported predicate '[{}]'", inner)))
}
