//! Substring-substitution compression for short JSON documents
//!
//! The compressor works in two passes:
//!
//! 1. JSON punctuation is swapped for characters that survive
//!    percent-encoding unescaped (`"` becomes `'`, `{` becomes `(` ...).
//! 2. Repeated substrings are replaced, one at a time, by a character that
//!    does not occur in the text yet. Each replacement appends
//!    `<char><substring>` to the text and records `<char>` in a key list.
//!
//! The crushed form is `body [U+0001 keys] _`. Expansion walks the key list
//! (newest first): split on the key, pop the last piece, join with it.

use crate::error::DecodeError;
use crate::trace_log;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Separates the body from the key list.
pub(crate) const DELIMITER: char = '\u{1}';

/// Terminates every crushed string. Never used as a key.
pub(crate) const SENTINEL: char = '_';

/// Longest substring considered for replacement.
pub const DEFAULT_MAX_SUBSTRING_LEN: usize = 50;

/// Texts longer than this, in chars, are swapped but not substituted.
const MAX_SUBSTITUTION_LEN: usize = 2048;

/// Upper bound, in bytes, on the text substitutions may expand to. Crushing
/// only substitutes in texts of at most [`MAX_SUBSTITUTION_LEN`] chars and
/// every substitution shrinks the text, so real tokens stay far below it.
pub(crate) const MAX_EXPANDED_LEN: usize = 64 * 1024;

/// Applied in order when crushing, in reverse order when expanding.
const SWAP_GROUPS: [(&str, &str); 5] = [
    ("\"", "'"),
    ("':", "!"),
    (",'", "~"),
    ("}", ")"),
    ("{", "("),
];

const UNESCAPED_MARKS: &str = "-_.!~*'()";

/// Characters that keep their meaning when a host decodes the path first.
const RESERVED_KEYS: &str = "%/?#\\";

/// Whether `c` passes through percent-encoding untouched.
pub(crate) fn is_unescaped(c: char) -> bool {
    c.is_ascii_alphanumeric() || UNESCAPED_MARKS.contains(c)
}

fn escaped_len(c: char) -> i64 {
    if is_unescaped(c) {
        1
    } else {
        3 * c.len_utf8() as i64
    }
}

fn escaped_len_of(chars: &[char]) -> i64 {
    chars.iter().map(|&c| escaped_len(c)).sum()
}

/// Key characters in the order they are tried: cheap ones first.
fn key_candidates() -> impl Iterator<Item = char> {
    let unescaped = ('!'..='~').filter(|&c| is_unescaped(c) && c != SENTINEL);
    let extended = (' '..='\u{fe}')
        .filter(|&c| !is_unescaped(c) && !c.is_control() && !RESERVED_KEYS.contains(c));
    unescaped.chain(extended)
}

// ============================================================================
// Punctuation swap
// ============================================================================

/// Exchange every occurrence of `a` with `b` and vice versa, scanning left
/// to right and preferring `a`. Applying it twice gives back the input.
fn swap_pair(text: &str, a: &str, b: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix(a) {
            out.push_str(b);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix(b) {
            out.push_str(a);
            rest = tail;
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    out
}

fn swap(text: &str, forward: bool) -> String {
    let mut out = text.to_string();
    if forward {
        for (a, b) in SWAP_GROUPS {
            out = swap_pair(&out, a, b);
        }
    } else {
        for (a, b) in SWAP_GROUPS.iter().rev() {
            out = swap_pair(&out, a, b);
        }
    }
    out
}

// ============================================================================
// Substitution
// ============================================================================

fn replace_all(haystack: &[char], needle: &[char], with: char) -> Vec<char> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut i = 0;
    while i < haystack.len() {
        if !needle.is_empty()
            && i + needle.len() <= haystack.len()
            && haystack[i..i + needle.len()] == *needle
        {
            out.push(with);
            i += needle.len();
        } else {
            out.push(haystack[i]);
            i += 1;
        }
    }
    out
}

/// Bump a left-to-right, non-overlapping tally for a match at `start`.
fn tally(entry: &mut (usize, usize), start: usize, len: usize) {
    let (count, free_from) = entry;
    if start >= *free_from {
        *count += 1;
        *free_from = start + len;
    }
}

/// Every substring of length `2..max_len` occurring more than once, with
/// its count, in first-seen order.
fn count_repeats(text: &[char], max_len: usize) -> IndexMap<Vec<char>, usize> {
    let mut counts: IndexMap<&[char], (usize, usize)> = IndexMap::new();

    for len in 2..max_len {
        if len > text.len() {
            break;
        }
        for start in 0..=text.len() - len {
            let entry = counts.entry(&text[start..start + len]).or_insert((0, 0));
            tally(entry, start, len);
        }
    }

    counts
        .into_iter()
        .filter(|(_, (count, _))| *count > 1)
        .map(|(substring, (count, _))| (substring.to_vec(), count))
        .collect()
}

/// Rewrite candidates after `replaced` became `key` and count them again,
/// one scan of `text` per distinct candidate length.
fn recount(
    counts: &IndexMap<Vec<char>, usize>,
    replaced: &[char],
    key: char,
    text: &[char],
) -> IndexMap<Vec<char>, usize> {
    let mut next: IndexMap<Vec<char>, (usize, usize)> = counts
        .keys()
        .map(|substring| (replace_all(substring, replaced, key), (0, 0)))
        .filter(|(substring, _)| substring.len() > 1)
        .collect();
    let lengths: BTreeSet<usize> = next.keys().map(Vec::len).collect();

    for len in lengths {
        if len > text.len() {
            break;
        }
        for start in 0..=text.len() - len {
            if let Some(entry) = next.get_mut(&text[start..start + len]) {
                tally(entry, start, len);
            }
        }
    }

    next.into_iter()
        .filter(|(_, (count, _))| *count > 1)
        .map(|(substring, (count, _))| (substring, count))
        .collect()
}

/// Returns the rewritten text and the keys, newest first.
fn substitute(mut text: Vec<char>, max_len: usize) -> (Vec<char>, Vec<char>) {
    let mut keys: Vec<char> = Vec::new();
    let mut counts = count_repeats(&text, max_len);
    let mut candidates = key_candidates();

    loop {
        let Some(key) = candidates.by_ref().find(|c| !text.contains(c)) else {
            break;
        };
        let key_len = escaped_len(key);
        let delimiter_cost = if keys.is_empty() {
            escaped_len(DELIMITER)
        } else {
            0
        };

        // Saving = removed occurrences minus the appended definition and the key.
        let mut best: Option<(Vec<char>, i64)> = None;
        counts.retain(|substring, count| {
            let count = *count as i64;
            let saving = (count - 1) * escaped_len_of(substring)
                - (count + 2) * key_len
                - delimiter_cost;
            if saving <= 0 {
                return false;
            }
            if best.as_ref().map_or(true, |(_, top)| saving > *top) {
                best = Some((substring.clone(), saving));
            }
            true
        });

        let Some((substring, saving)) = best else {
            break;
        };

        text = replace_all(&text, &substring, key);
        text.push(key);
        text.extend_from_slice(&substring);
        keys.insert(0, key);

        trace_log!(
            "crush: replaced {} chars with {:?}, saving {} bytes",
            substring.len(),
            key,
            saving
        );

        counts = recount(&counts, &substring, key, &text);
    }

    (text, keys)
}

// ============================================================================
// Public entry points
// ============================================================================

/// Compress `text`. It must not contain [`DELIMITER`]; JSON produced by
/// `serde_json` never does because control characters are escaped.
pub(crate) fn crush(text: &str, max_substring_len: usize) -> String {
    debug_assert!(!text.contains(DELIMITER));

    let swapped: Vec<char> = swap(text, true).chars().collect();
    let (body, keys) = if swapped.len() > MAX_SUBSTITUTION_LEN {
        trace_log!("crush: {} chars, skipping substitution", swapped.len());
        (swapped, Vec::new())
    } else {
        substitute(swapped, max_substring_len)
    };

    let mut out: String = body.into_iter().collect();
    if !keys.is_empty() {
        out.push(DELIMITER);
        out.extend(keys);
    }
    out.push(SENTINEL);
    out
}

/// Reverse [`crush`]. Fails instead of letting substitutions expand the
/// text past [`MAX_EXPANDED_LEN`].
pub(crate) fn uncrush(crushed: &str) -> Result<String, DecodeError> {
    let payload = crushed
        .strip_suffix(SENTINEL)
        .ok_or(DecodeError::Corrupt("missing terminator"))?;

    let mut sections = payload.split(DELIMITER);
    let body = sections.next().unwrap_or_default();
    let keys = sections.next();
    if sections.next().is_some() {
        return Err(DecodeError::Corrupt("more than one key section"));
    }

    let mut text = body.to_string();
    if let Some(keys) = keys {
        if keys.is_empty() {
            return Err(DecodeError::Corrupt("empty key section"));
        }
        for key in keys.chars() {
            let (head, substring) = text
                .rsplit_once(key)
                .ok_or(DecodeError::Corrupt("substitution key missing from body"))?;
            let occurrences = head.matches(key).count();
            let expanded = (head.len() - occurrences * key.len_utf8())
                .saturating_add(occurrences.saturating_mul(substring.len()));
            if expanded > MAX_EXPANDED_LEN {
                return Err(DecodeError::Corrupt("payload expands too far"));
            }
            text = head.replace(key, substring);
        }
    }

    Ok(swap(&text, false))
}
