// file: src/search/text.rs
// description: case-insensitive literal matching, snippet windows and highlight segments
// reference: matches are reported in character offsets of the original text

use serde::Serialize;
use std::ops::Range;

/// Lowercased view of a text that remembers which original character each
/// folded character came from.
pub struct FoldedText {
    original: Vec<char>,
    folded: Vec<char>,
    origin: Vec<usize>,
}

impl FoldedText {
    pub fn new(text: &str) -> Self {
        let original: Vec<char> = text.chars().collect();
        let mut folded = Vec::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len());

        for (index, c) in original.iter().enumerate() {
            for lower in c.to_lowercase() {
                folded.push(lower);
                origin.push(index);
            }
        }

        Self {
            original,
            folded,
            origin,
        }
    }

    pub fn char_len(&self) -> usize {
        self.original.len()
    }

    /// Non-overlapping, left-to-right matches of `needle` as original character ranges.
    pub fn find_all(&self, needle: &str) -> Vec<Range<usize>> {
        let needle: Vec<char> = needle.to_lowercase().chars().collect();
        let mut matches = Vec::new();

        if needle.is_empty() || needle.len() > self.folded.len() {
            return matches;
        }

        let mut i = 0;
        while i + needle.len() <= self.folded.len() {
            if self.folded[i..i + needle.len()] == needle[..] {
                let start = self.origin[i];
                let end = self.origin[i + needle.len() - 1] + 1;
                matches.push(start..end);
                i += needle.len();
            } else {
                i += 1;
            }
        }

        matches
    }

    pub fn find_first(&self, needle: &str) -> Option<Range<usize>> {
        self.find_all(needle).into_iter().next()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.find_all(needle).len()
    }

    /// Window of `before` characters ahead of the match and `after` past its end,
    /// with `...` marking each truncated side.
    pub fn snippet(&self, anchor: Range<usize>, before: usize, after: usize) -> String {
        let len = self.original.len();
        let start = anchor.start.saturating_sub(before);
        let end = anchor.end.saturating_add(after).min(len);

        let mut snippet = String::new();
        if start > 0 {
            snippet.push_str("...");
        }
        snippet.extend(&self.original[start..end]);
        if end < len {
            snippet.push_str("...");
        }
        snippet
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

/// Splits `text` into plain and highlighted runs for every token occurrence.
pub fn highlight(text: &str, tokens: &[String]) -> Vec<Segment> {
    let folded = FoldedText::new(text);
    let mut ranges: Vec<Range<usize>> = tokens
        .iter()
        .flat_map(|token| folded.find_all(token))
        .collect();
    ranges.sort_by_key(|range| (range.start, range.end));

    let mut merged: Vec<Range<usize>> = Vec::new();
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }

    let mut segments = Vec::new();
    let mut cursor = 0;
    for range in merged {
        if range.start > cursor {
            segments.push(Segment {
                text: folded.original[cursor..range.start].iter().collect(),
                highlighted: false,
            });
        }
        segments.push(Segment {
            text: folded.original[range.clone()].iter().collect(),
            highlighted: true,
        });
        cursor = range.end;
    }
    if cursor < folded.char_len() {
        segments.push(Segment {
            text: folded.original[cursor..].iter().collect(),
            highlighted: false,
        });
    }

    segments
}
