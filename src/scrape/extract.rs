//! Byte-token extraction.
//!
//! These helpers scan raw page bytes for fixed anchor tokens. They are not an HTML
//! parser: they only understand the handful of delimiters GitHub's overview markup uses.

use std::collections::BTreeMap;

use crate::foundation::error::{ExtractError, GifhubError, GifhubResult};

/// Return the bytes of `s` between the first `left` and the first `right` after it.
pub fn extract_between<'a>(
    s: &'a [u8],
    left: &[u8],
    right: &[u8],
) -> Result<&'a [u8], ExtractError> {
    let left_idx = find(s, left).ok_or_else(|| ExtractError::left_not_found(left))?;

    let left_offset = left_idx + left.len();
    if left_offset > s.len() {
        return Err(ExtractError::out_of_range(left));
    }

    let rest = &s[left_offset..];
    let right_idx = find(rest, right).ok_or_else(|| ExtractError::right_not_found(right))?;
    Ok(&rest[..right_idx])
}

/// Byte offset of the first occurrence of `needle` in `haystack`.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Remove every occurrence of `token` from `s`.
pub fn strip_token(s: &[u8], token: &[u8]) -> Vec<u8> {
    if token.is_empty() {
        return s.to_vec();
    }
    let mut out = Vec::with_capacity(s.len());
    let mut rest = s;
    while let Some(idx) = find(rest, token) {
        out.extend_from_slice(&rest[..idx]);
        rest = &rest[idx + token.len()..];
    }
    out.extend_from_slice(rest);
    out
}

/// Extract labelled percentages from a `label:value<sep>label:value<last>` container.
///
/// The label that occurs furthest into `container` is the last field, so its value runs up to
/// `last_terminator` instead of `separator`. Which label that is depends on the document, not on
/// the order of `fields`; when two labels match at the same offset the earlier one in `fields`
/// wins.
///
/// Only non-zero values are returned. A value span that is empty, contains anything other than
/// ASCII digits, or exceeds 100 is a [`GifhubError::Parse`].
pub fn extract_fields<K: Copy + Ord>(
    container: &[u8],
    fields: &[(K, &[u8])],
    separator: &[u8],
    last_terminator: &[u8],
) -> GifhubResult<BTreeMap<K, u8>> {
    let Some(&(_, first_label)) = fields.first() else {
        return Ok(BTreeMap::new());
    };

    let mut last: Option<(usize, usize)> = None;
    for (i, (_, label)) in fields.iter().enumerate() {
        if let Some(idx) = find(container, label)
            && last.is_none_or(|(_, best)| idx > best)
        {
            last = Some((i, idx));
        }
    }
    let Some((last_field, _)) = last else {
        return Err(ExtractError::left_not_found(first_label).into());
    };

    let mut out = BTreeMap::new();
    for (i, &(key, label)) in fields.iter().enumerate() {
        let terminator = if i == last_field {
            last_terminator
        } else {
            separator
        };
        let span = extract_between(container, label, terminator)?;
        let value = parse_percentage(label, span)?;
        if value != 0 {
            out.insert(key, value);
        }
    }
    Ok(out)
}

fn parse_percentage(label: &[u8], span: &[u8]) -> GifhubResult<u8> {
    if span.is_empty() || !span.iter().all(u8::is_ascii_digit) {
        return Err(GifhubError::parse(label, span));
    }
    let mut value = 0u32;
    for &b in span {
        value = value.saturating_mul(10).saturating_add(u32::from(b - b'0'));
    }
    if value > 100 {
        return Err(GifhubError::parse(label, span));
    }
    Ok(value as u8)
}

#[cfg(test)]
#[path = "../../tests/unit/scrape/extract.rs"]
mod tests;
