//! URL building from a section and a `{placeholder}` command template.
//!
//! # Design
//! Templates are parsed into literal and placeholder segments before any
//! substitution happens, so malformed syntax is rejected the same way no
//! matter which parameters are supplied. Substitution is strict in both
//! directions: every placeholder needs a parameter and every parameter
//! needs a placeholder. Values are inserted verbatim without percent
//! encoding.

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// A validated command template such as `{slug}/logs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate<'a> {
    source: &'a str,
    segments: Vec<Segment<'a>>,
}

impl<'a> CommandTemplate<'a> {
    pub fn parse(source: &'a str) -> Result<Self, ApiError> {
        if source.is_empty() {
            return Err(ApiError::invalid_template(source, "template is empty"));
        }

        let mut segments = Vec::new();
        let mut rest = source;
        while !rest.is_empty() {
            match rest.find(['{', '}']) {
                None => {
                    segments.push(Segment::Literal(rest));
                    break;
                }
                Some(pos) if rest.as_bytes()[pos] == b'}' => {
                    return Err(ApiError::invalid_template(source, "unmatched `}`"));
                }
                Some(pos) => {
                    if pos > 0 {
                        segments.push(Segment::Literal(&rest[..pos]));
                    }
                    let after = &rest[pos + 1..];
                    let close = after
                        .find(['{', '}'])
                        .filter(|&end| after.as_bytes()[end] == b'}')
                        .ok_or_else(|| ApiError::invalid_template(source, "unclosed `{`"))?;
                    let name = &after[..close];
                    if !is_identifier(name) {
                        return Err(ApiError::invalid_template(
                            source,
                            format!("`{{{name}}}` is not a valid placeholder"),
                        ));
                    }
                    segments.push(Segment::Placeholder(name));
                    rest = &after[close + 1..];
                }
            }
        }

        Ok(Self { source, segments })
    }

    pub fn as_str(&self) -> &'a str {
        self.source
    }

    /// Placeholder names in order of appearance, duplicates included.
    pub fn placeholders(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(*name),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, params: &[(&str, &str)]) -> Result<String, ApiError> {
        if let Some((unknown, _)) = params
            .iter()
            .find(|(key, _)| !self.placeholders().any(|name| name == *key))
        {
            return Err(ApiError::UnknownPathParam(unknown.to_string()));
        }

        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = params
                        .iter()
                        .find(|(key, _)| key == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| ApiError::MissingPathParam(name.to_string()))?;
                    if value.trim_matches('/').is_empty() {
                        return Err(ApiError::InvalidPathParam(name.to_string()));
                    }
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Join `base`, `section` and the rendered `template` with single slashes.
///
/// Fails with [`ApiError::InvalidEndpoint`] on an empty base and with a
/// template error when the template is malformed, the parameters do not
/// line up with its placeholders, or a value is empty.
///
/// Only the template's own leading slash is dropped; the rendered path is
/// appended unchanged so a parameter value never alters the route.
pub fn build_url(
    base: &str,
    section: &str,
    template: &str,
    params: &[(&str, &str)],
) -> Result<String, ApiError> {
    let base = base.trim();
    if base.is_empty() {
        return Err(ApiError::InvalidEndpoint {
            reason: "endpoint is empty".to_string(),
        });
    }

    let path = CommandTemplate::parse(template.trim_start_matches('/'))?.render(params)?;

    let mut url = base.trim_end_matches('/').to_string();
    let section = section.trim_matches('/');
    if !section.is_empty() {
        url.push('/');
        url.push_str(section);
    }
    url.push('/');
    url.push_str(&path);
    Ok(url)
}
