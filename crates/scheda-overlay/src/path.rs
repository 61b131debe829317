//! Dotted, bracket-indexed field selectors over the document tree.
//!
//! A selector like `a.b[2].c` is consumed one segment at a time, left to
//! right. Human-facing indices are 1-based; negative indices address from
//! the end (`-1` is the last element). An empty bracket (`name[]`) appends:
//! the written value on a terminal segment, a placeholder mapping on an
//! intermediate one. Missing intermediate mappings are created on demand;
//! sequences are never created implicitly without an explicit `[]`.

use serde_json::{Map, Value, json};

use crate::alias::AliasRegistry;
use crate::error::{OverlayError, Result};

/// Key under which a placeholder appended by a non-terminal `[]` segment
/// records its 1-based position.
pub const POSITION_KEY: &str = "posizione";

/// Whether a traversal step found existing structure or had to create it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    Found,
    Created,
}

/// Result of a successful mutation: the canonical path actually written,
/// with every list position materialized as a 1-based index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub canonical: String,
    pub traversal: Traversal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegIndex {
    /// Plain mapping key.
    None,
    /// 1-based index, negative means from the end.
    At(i64),
    /// Empty bracket: append.
    Append,
}

#[derive(Debug, Clone, Copy)]
struct Segment<'s> {
    name: &'s str,
    index: SegIndex,
    raw: &'s str,
}

#[derive(Debug, Clone, Copy)]
enum Op<'v> {
    Set(&'v Value),
    Delete,
}

/// Resolves selectors against a mutable document tree, translating alias
/// tokens through the registry before traversal.
pub struct PathSelector<'a> {
    aliases: &'a AliasRegistry,
}

impl<'a> PathSelector<'a> {
    pub fn new(aliases: &'a AliasRegistry) -> Self {
        Self { aliases }
    }

    /// Read the value at `selector`. Missing mapping keys read as `None`;
    /// indexing mistakes are selector errors, same as in mutation.
    pub fn get(&self, root: &Value, selector: &str) -> Result<Option<Value>> {
        let expanded = rewrite_selector(self.aliases, selector);
        let mut current = root;
        let mut remaining = expanded.as_str();
        loop {
            let (raw, rest) = split_head(remaining);
            let segment = parse_segment(raw, &expanded)?;
            let next = match segment.index {
                SegIndex::None => match current {
                    Value::Object(map) => match map.get(segment.name) {
                        Some(value) => value,
                        None => return Ok(None),
                    },
                    Value::Null => return Ok(None),
                    _ => {
                        return Err(selector_error(
                            &expanded,
                            segment.raw,
                            "cannot descend into a non-mapping value",
                        ));
                    }
                },
                SegIndex::At(human) => {
                    let items = sequence_at(current, &segment, &expanded)?;
                    let idx = storage_index(human, items.len(), &expanded, segment.raw)?;
                    &items[idx]
                }
                SegIndex::Append => {
                    return Err(selector_error(
                        &expanded,
                        segment.raw,
                        "append segment is not meaningful when reading",
                    ));
                }
            };
            match rest {
                None => return Ok(Some(next.clone())),
                Some(rest_path) => {
                    current = next;
                    remaining = rest_path;
                }
            }
        }
    }

    /// Write `value` at `selector`, creating intermediate mappings (and
    /// appending list placeholders for `[]` segments) as needed.
    pub fn set(&self, root: &mut Value, selector: &str, value: Value) -> Result<Applied> {
        self.apply(root, selector, Op::Set(&value))
    }

    /// Clear the slot at `selector` by writing an empty mapping over it.
    /// Distinct from setting `null`, which records an explicit empty value.
    pub fn delete(&self, root: &mut Value, selector: &str) -> Result<Applied> {
        self.apply(root, selector, Op::Delete)
    }

    fn apply(&self, root: &mut Value, selector: &str, op: Op<'_>) -> Result<Applied> {
        let expanded = rewrite_selector(self.aliases, selector);
        let mut current = root;
        let mut remaining = expanded.as_str();
        let mut canonical = String::new();
        let mut traversal = Traversal::Found;
        loop {
            let (raw, rest) = split_head(remaining);
            let segment = parse_segment(raw, &expanded)?;
            match rest {
                None => {
                    terminal_step(
                        current,
                        &segment,
                        op,
                        &expanded,
                        &mut canonical,
                    )?;
                    return Ok(Applied {
                        canonical,
                        traversal,
                    });
                }
                Some(rest_path) => {
                    current = descend_step(
                        current,
                        &segment,
                        &expanded,
                        &mut canonical,
                        &mut traversal,
                    )?;
                    remaining = rest_path;
                }
            }
        }
    }
}

/// First-dot-only split: one segment consumed per step.
fn split_head(selector: &str) -> (&str, Option<&str>) {
    match selector.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (selector, None),
    }
}

fn parse_segment<'s>(raw: &'s str, selector: &str) -> Result<Segment<'s>> {
    let Some(open) = raw.find('[') else {
        return Ok(Segment {
            name: raw,
            index: SegIndex::None,
            raw,
        });
    };
    let Some(inner) = raw[open..].strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
        return Err(selector_error(selector, raw, "unterminated bracket index"));
    };
    let index = if inner.is_empty() {
        SegIndex::Append
    } else {
        let human: i64 = inner
            .parse()
            .map_err(|_| selector_error(selector, raw, "bracket index is not a number"))?;
        SegIndex::At(human)
    };
    Ok(Segment {
        name: &raw[..open],
        index,
        raw,
    })
}

/// Rewrite every segment name through the alias registry before traversal.
/// An alias may expand to a multi-segment canonical path; the expansion is
/// spliced in textually and consumed like any other selector text.
pub fn rewrite_selector(aliases: &AliasRegistry, selector: &str) -> String {
    let mut out = String::with_capacity(selector.len());
    for (idx, token) in selector.split('.').enumerate() {
        if idx > 0 {
            out.push('.');
        }
        let (name, suffix) = match token.find('[') {
            Some(open) => (&token[..open], &token[open..]),
            None => (token, ""),
        };
        out.push_str(aliases.resolve(name));
        out.push_str(suffix);
    }
    out
}

/// Convert a 1-based human index into a storage index. Negative indices
/// count from the end and skip the off-by-one adjustment.
fn storage_index(human: i64, len: usize, selector: &str, token: &str) -> Result<usize> {
    let idx = if human > 0 {
        human - 1
    } else if human < 0 {
        len as i64 + human
    } else {
        return Err(selector_error(
            selector,
            token,
            "index 0 is out of range (indices are 1-based)",
        ));
    };
    if idx < 0 || idx as usize >= len {
        return Err(selector_error(
            selector,
            token,
            format!("index {human} is out of range for a sequence of {len}"),
        ));
    }
    Ok(idx as usize)
}

fn selector_error(selector: &str, token: &str, message: impl Into<String>) -> OverlayError {
    OverlayError::Selector {
        selector: selector.to_string(),
        token: token.to_string(),
        message: message.into(),
    }
}

fn sequence_at<'v>(
    container: &'v Value,
    segment: &Segment<'_>,
    selector: &str,
) -> Result<&'v Vec<Value>> {
    let slot = match container {
        Value::Object(map) => map.get(segment.name),
        _ => None,
    };
    match slot {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(selector_error(
            selector,
            segment.raw,
            "indexing into a non-sequence value",
        )),
        None => Err(selector_error(
            selector,
            segment.raw,
            "indexing into a missing sequence",
        )),
    }
}

/// Make sure `container` is a mapping, turning `null` into an empty one.
fn ensure_mapping<'v>(
    container: &'v mut Value,
    selector: &str,
    token: &str,
) -> Result<&'v mut Map<String, Value>> {
    if container.is_null() {
        *container = Value::Object(Map::new());
    }
    match container {
        Value::Object(map) => Ok(map),
        _ => Err(selector_error(
            selector,
            token,
            "cannot descend into a non-mapping value",
        )),
    }
}

fn push_canonical(canonical: &mut String, name: &str, position: Option<usize>) {
    if !canonical.is_empty() {
        canonical.push('.');
    }
    canonical.push_str(name);
    if let Some(pos) = position {
        canonical.push('[');
        canonical.push_str(&pos.to_string());
        canonical.push(']');
    }
}

fn descend_step<'v>(
    container: &'v mut Value,
    segment: &Segment<'_>,
    selector: &str,
    canonical: &mut String,
    traversal: &mut Traversal,
) -> Result<&'v mut Value> {
    match segment.index {
        SegIndex::None => {
            let map = ensure_mapping(container, selector, segment.raw)?;
            push_canonical(canonical, segment.name, None);
            let entry = map
                .entry(segment.name.to_string())
                .or_insert(Value::Null);
            if entry.is_null() {
                *entry = Value::Object(Map::new());
                *traversal = Traversal::Created;
            }
            match entry {
                Value::Object(_) | Value::Array(_) => Ok(entry),
                _ => Err(selector_error(
                    selector,
                    segment.raw,
                    "cannot descend into a non-container value",
                )),
            }
        }
        SegIndex::At(human) => {
            let map = ensure_mapping(container, selector, segment.raw)?;
            let items = match map.get_mut(segment.name) {
                Some(Value::Array(items)) => items,
                Some(_) => {
                    return Err(selector_error(
                        selector,
                        segment.raw,
                        "indexing into a non-sequence value",
                    ));
                }
                None => {
                    return Err(selector_error(
                        selector,
                        segment.raw,
                        "indexing into a missing sequence",
                    ));
                }
            };
            let idx = storage_index(human, items.len(), selector, segment.raw)?;
            push_canonical(canonical, segment.name, Some(idx + 1));
            Ok(&mut items[idx])
        }
        SegIndex::Append => {
            let map = ensure_mapping(container, selector, segment.raw)?;
            let slot = map
                .entry(segment.name.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if slot.is_null() {
                *slot = Value::Array(Vec::new());
            }
            let Value::Array(items) = slot else {
                return Err(selector_error(
                    selector,
                    segment.raw,
                    "appending to a non-sequence value",
                ));
            };
            let position = items.len() + 1;
            items.push(json!({ POSITION_KEY: position }));
            *traversal = Traversal::Created;
            push_canonical(canonical, segment.name, Some(position));
            let idx = items.len() - 1;
            Ok(&mut items[idx])
        }
    }
}

fn terminal_step(
    container: &mut Value,
    segment: &Segment<'_>,
    op: Op<'_>,
    selector: &str,
    canonical: &mut String,
) -> Result<()> {
    match segment.index {
        SegIndex::None => {
            let map = ensure_mapping(container, selector, segment.raw)?;
            push_canonical(canonical, segment.name, None);
            let written = match op {
                Op::Set(value) => value.clone(),
                Op::Delete => Value::Object(Map::new()),
            };
            map.insert(segment.name.to_string(), written);
            Ok(())
        }
        SegIndex::At(human) => {
            let map = ensure_mapping(container, selector, segment.raw)?;
            let items = match map.get_mut(segment.name) {
                Some(Value::Array(items)) => items,
                Some(_) => {
                    return Err(selector_error(
                        selector,
                        segment.raw,
                        "indexing into a non-sequence value",
                    ));
                }
                None => {
                    return Err(selector_error(
                        selector,
                        segment.raw,
                        "indexing into a missing sequence",
                    ));
                }
            };
            let idx = storage_index(human, items.len(), selector, segment.raw)?;
            push_canonical(canonical, segment.name, Some(idx + 1));
            items[idx] = match op {
                Op::Set(value) => value.clone(),
                Op::Delete => Value::Object(Map::new()),
            };
            Ok(())
        }
        SegIndex::Append => {
            let map = ensure_mapping(container, selector, segment.raw)?;
            let slot = map
                .entry(segment.name.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if slot.is_null() {
                *slot = Value::Array(Vec::new());
            }
            let Value::Array(items) = slot else {
                return Err(selector_error(
                    selector,
                    segment.raw,
                    "appending to a non-sequence value",
                ));
            };
            items.push(match op {
                Op::Set(value) => value.clone(),
                Op::Delete => Value::Object(Map::new()),
            });
            push_canonical(canonical, segment.name, Some(items.len()));
            Ok(())
        }
    }
}
