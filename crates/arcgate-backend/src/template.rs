//! Positional request templates.
//!
//! Backends describe their requests with `{0}`-style placeholders:
//!
//! ```text
//! https://example.com/hasJoined?username={0}&serverId={1}{2}
//! ```
//!
//! Quoting follows the familiar message-format rules: text between single
//! quotes is literal (so `'{0}'` is not a placeholder) and `''` is one
//! literal quote. A template is parsed once, at config load, for a fixed
//! number of arguments; any placeholder outside that range is an error
//! then, never at request time.

use std::fmt;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Arg(usize),
}

/// A parsed positional template.
#[derive(Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    arity: usize,
    segments: Vec<Segment>,
}

impl Template {
    /// Parses `source` for exactly `arity` positional arguments.
    ///
    /// # Errors
    /// [`ConfigError::InvalidTemplate`] on an unterminated quote, an
    /// unmatched `{`, a non-numeric placeholder, or an index `>= arity`.
    pub fn parse(
        source: impl Into<String>,
        arity: usize,
    ) -> Result<Self, ConfigError> {
        let source = source.into();
        let segments = parse_segments(&source, arity)
            .map_err(|detail| {
                ConfigError::InvalidTemplate(format!("{detail} in {source:?}"))
            })?;
        Ok(Self { source, arity, segments })
    }

    /// The template as written in config.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of positional arguments this template was parsed for.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Substitutes `args` into the template. Missing trailing arguments
    /// render as empty strings.
    pub fn format(&self, args: &[&str]) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Arg(index) => {
                    out.push_str(args.get(*index).copied().unwrap_or(""));
                }
            }
        }
        out
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Template").field(&self.source).finish()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_segments(source: &str, arity: usize) -> Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.chars().peekable();
    let mut quoted = false;

    while let Some(c) = chars.next() {
        match c {
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                literal.push('\'');
            }
            '\'' => quoted = !quoted,
            '{' if !quoted => {
                let mut index = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(d) => index.push(d),
                        None => return Err("unmatched braces".into()),
                    }
                }
                let index: usize = index
                    .trim()
                    .parse()
                    .map_err(|_| format!("bad argument index {index:?}"))?;
                if index >= arity {
                    return Err(format!(
                        "argument {{{index}}} out of range (template takes {arity})"
                    ));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Arg(index));
            }
            other => literal.push(other),
        }
    }

    if quoted {
        return Err("unterminated quote".into());
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
