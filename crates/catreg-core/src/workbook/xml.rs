//! Just enough XML scanning for SpreadsheetML parts: elements by tag name,
//! attribute lookup and entity unescaping.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use regex::Regex;

use super::WorkbookError;

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([\w:.-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("attribute pattern is valid")
});

static PHONETIC_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<(?:\w+:)?rPh\b.*?</(?:\w+:)?rPh\s*>").expect("phonetic pattern is valid")
});

/// Element patterns by tag name; a sheet scan asks for the same few tags per row.
static ELEMENT_PATTERNS: Lazy<Mutex<HashMap<String, Regex>>> = Lazy::new(Default::default);

/// One element occurrence: raw attribute text and inner XML (None when self-closing).
#[derive(Debug, Clone)]
pub(crate) struct Element<'a> {
    attrs: &'a str,
    inner: Option<&'a str>,
}

impl<'a> Element<'a> {
    pub(crate) fn attr(&self, name: &str) -> Option<String> {
        ATTRIBUTE
            .captures_iter(self.attrs)
            .find(|caps| &caps[1] == name)
            .and_then(|caps| caps.get(2).or_else(|| caps.get(3)))
            .map(|m| unescape(m.as_str()))
    }

    pub(crate) fn inner(&self) -> &'a str {
        self.inner.unwrap_or("")
    }
}

fn element_pattern(tag: &str) -> Result<Regex, WorkbookError> {
    let mut cache = ELEMENT_PATTERNS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(re) = cache.get(tag) {
        return Ok(re.clone());
    }
    let pattern = format!(
        r"(?s)<(?:\w+:)?{tag}\b([^>]*?)(?:/>|>(.*?)</(?:\w+:)?{tag}\s*>)",
        tag = regex::escape(tag)
    );
    let re = Regex::new(&pattern).map_err(|e| WorkbookError::Xml(e.to_string()))?;
    cache.insert(tag.to_string(), re.clone());
    Ok(re)
}

/// All `tag` elements in `xml`, in document order. Matches an optional
/// namespace prefix. Elements of the same name must not nest.
pub(crate) fn elements<'a>(xml: &'a str, tag: &str) -> Result<Vec<Element<'a>>, WorkbookError> {
    Ok(element_pattern(tag)?
        .captures_iter(xml)
        .map(|c| Element {
            attrs: c.get(1).map_or("", |m| m.as_str()),
            inner: c.get(2).map(|m| m.as_str()),
        })
        .collect())
}

/// First `tag` element, if any.
pub(crate) fn first<'a>(xml: &'a str, tag: &str) -> Result<Option<Element<'a>>, WorkbookError> {
    Ok(elements(xml, tag)?.into_iter().next())
}

/// Concatenated text of every `<t>` run, skipping phonetic (`rPh`) runs.
pub(crate) fn text_runs(xml: &str) -> Result<String, WorkbookError> {
    let mut out = String::new();
    let cleaned = PHONETIC_RUN.replace_all(xml, "");
    for t in elements(&cleaned, "t")? {
        out.push_str(&unescape(t.inner()));
    }
    Ok(out)
}

/// Decode the five predefined entities and numeric character references.
pub(crate) fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let decoded = tail.find(';').and_then(|end| {
            let entity = &tail[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
                }
                _ if entity.starts_with('#') => {
                    entity[1..].parse::<u32>().ok().and_then(char::from_u32)
                }
                _ => None,
            };
            ch.map(|c| (c, end + 1))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
