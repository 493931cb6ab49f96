//! Route patterns and structural matching.

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use percent_encoding::percent_decode_str;

use crate::{error::PatternError, param::ParamType};

/// A named, typed variable segment of a route pattern.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Placeholder {
    name: String,
    ty: ParamType,
}

impl Placeholder {
    /// Create a placeholder.
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Returns the placeholder name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    #[inline]
    pub fn ty(&self) -> ParamType {
        self.ty
    }
}

/// One segment of a route pattern.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// Matches any non-empty path segment.
    Placeholder(Placeholder),
}

/// A parsed route pattern such as `/blog/{id:int}/comments`.
///
/// # Syntax
///
/// - The pattern starts with `/`; `/` alone is the root.
/// - `{name}` captures a segment as text, `{name:type}` declares one of
///   `str`, `int`, `float` or `bool`.
/// - Any other segment is a literal, compared case-sensitively. Literals
///   may be percent-encoded and are stored decoded.
/// - A trailing `/` is significant: `/blog/` and `/blog` are different
///   patterns.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a route pattern.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let rest = pattern
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(pattern.to_string()))?;

        let mut segments = Vec::new();
        if !rest.is_empty() {
            let parts: Vec<&str> = rest.split('/').collect();
            let last = parts.len() - 1;

            for (idx, part) in parts.into_iter().enumerate() {
                if part.is_empty() && idx != last {
                    return Err(PatternError::EmptySegment(pattern.to_string()));
                }
                let segment = parse_segment(part)?;
                if let Segment::Placeholder(placeholder) = &segment {
                    if segments.iter().any(|s| match s {
                        Segment::Placeholder(p) => p.name == placeholder.name,
                        Segment::Literal(_) => false,
                    }) {
                        return Err(PatternError::DuplicateName(placeholder.name.clone()));
                    }
                }
                segments.push(segment);
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// Returns the pattern text it was parsed from.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the segments in order.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the placeholders in order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(p) => Some(p),
            Segment::Literal(_) => None,
        })
    }

    /// Check whether `path` matches this pattern, ignoring placeholder
    /// types.
    ///
    /// On success returns the captured text of every placeholder, in
    /// pattern order.
    pub(crate) fn match_segments<'p, 's>(
        &'p self,
        path: &'s [Cow<'s, str>],
    ) -> Option<Vec<(&'p Placeholder, &'s str)>> {
        if path.len() != self.segments.len() {
            return None;
        }

        let mut captures = Vec::new();
        for (segment, value) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(lit) if lit.as_str() == &**value => {}
                Segment::Placeholder(p) if !value.is_empty() => {
                    captures.push((p, &**value));
                }
                _ => return None,
            }
        }
        Some(captures)
    }
}

impl FromStr for PathPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for PathPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_segment(part: &str) -> Result<Segment, PatternError> {
    if !part.contains(|c: char| c == '{' || c == '}') {
        // request segments are compared after decoding
        let decoded = percent_decode_str(part)
            .decode_utf8()
            .map_err(|_| PatternError::InvalidEncoding(part.to_string()))?;
        return Ok(Segment::Literal(decoded.into_owned()));
    }

    let inner = part
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .filter(|s| !s.contains(|c: char| c == '{' || c == '}'))
        .ok_or_else(|| PatternError::MalformedPlaceholder(part.to_string()))?;

    let (name, ty) = match inner.split_once(':') {
        Some((name, ty)) => {
            let ty = ty.parse::<ParamType>().map_err(|_| PatternError::UnknownType {
                name: name.to_string(),
                ty: ty.to_string(),
            })?;
            (name, ty)
        }
        None => (inner, ParamType::Str),
    };

    if !is_identifier(name) {
        return Err(PatternError::InvalidName(name.to_string()));
    }

    Ok(Segment::Placeholder(Placeholder::new(name, ty)))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split a request path into percent-decoded segments.
///
/// Returns `None` if the path does not start with `/`. Decoding happens
/// after splitting, so an encoded `%2F` stays inside its segment.
pub(crate) fn split_path(path: &str) -> Option<Vec<Cow<'_, str>>> {
    let rest = path.strip_prefix('/')?;
    if rest.is_empty() {
        return Some(Vec::new());
    }
    Some(
        rest.split('/')
            .map(|s| percent_decode_str(s).decode_utf8_lossy())
            .collect(),
    )
}
