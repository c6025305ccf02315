//! Rich-text run model for text widgets.
//!
//! # Responsibility
//! - Represent formatted content as an ordered list of (text, tags) runs.
//! - Apply/remove/toggle formatting over character ranges.
//! - Translate tag sets to and from their stored string names.
//!
//! # Invariants
//! - Runs concatenate to the full content with no gaps or overlaps.
//! - Adjacent runs with identical tag sets are coalesced by `normalize`.
//! - Range operations are char-indexed and tolerate out-of-range input by
//!   clamping to the content length.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static SIZE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^size(\d{1,3})$").expect("valid size tag regex"));

/// One formatting attribute attached to a run.
///
/// Ordering is derived so serialized tag lists come out deterministic
/// (`bold` before `italic` before `sizeN`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatTag {
    Bold,
    Italic,
    /// Font size in points.
    Size(u32),
}

impl FormatTag {
    /// Stored string name for this tag (`bold`, `italic`, `size24`).
    pub fn name(&self) -> String {
        match self {
            Self::Bold => "bold".to_string(),
            Self::Italic => "italic".to_string(),
            Self::Size(points) => format!("size{points}"),
        }
    }
}

/// Parses one stored tag name into its component tags.
///
/// Legacy documents carry compound names such as `size24_bold` or
/// `bold_italic` (one toolkit tag per combination); these expand into their
/// component tags. Unknown components are dropped with a debug log so an old
/// or hand-edited document still loads.
pub fn parse_tag_name(name: &str) -> Vec<FormatTag> {
    let mut tags = Vec::new();
    for part in name.split('_') {
        match part {
            "bold" => tags.push(FormatTag::Bold),
            "italic" => tags.push(FormatTag::Italic),
            other => {
                if let Some(caps) = SIZE_TAG_RE.captures(other) {
                    if let Ok(points) = caps[1].parse::<u32>() {
                        tags.push(FormatTag::Size(points));
                        continue;
                    }
                }
                if !other.is_empty() {
                    debug!("event=tag_parse module=text status=skipped tag={other}");
                }
            }
        }
    }
    tags
}

/// Converts a tag set into its stored string names, in deterministic order.
pub fn tag_names(tags: &BTreeSet<FormatTag>) -> Vec<String> {
    tags.iter().map(FormatTag::name).collect()
}

/// A contiguous span of identically formatted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub tags: BTreeSet<FormatTag>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tags: BTreeSet::new(),
        }
    }

    pub fn tagged(text: impl Into<String>, tags: impl IntoIterator<Item = FormatTag>) -> Self {
        Self {
            text: text.into(),
            tags: tags.into_iter().collect(),
        }
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Formatted widget content as an ordered run sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichText {
    runs: Vec<TextRun>,
}

impl RichText {
    /// Builds unformatted content from a plain string.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            runs: vec![TextRun::plain(text)],
        }
    }

    /// Builds content from pre-split runs, coalescing where possible.
    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        let mut rich = Self { runs };
        rich.normalize();
        rich
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Full content with formatting stripped.
    pub fn content(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn char_len(&self) -> usize {
        self.runs.iter().map(TextRun::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Replaces the whole content with plain text, discarding formatting.
    pub fn set_plain(&mut self, text: impl Into<String>) {
        *self = Self::plain(text);
    }

    /// Adds `tag` to every character in `[start, end)`.
    pub fn apply_tag(&mut self, start: usize, end: usize, tag: FormatTag) {
        self.mutate_range(start, end, |tags| {
            insert_tag(tags, tag);
        });
    }

    /// Removes `tag` from every character in `[start, end)`.
    pub fn remove_tag(&mut self, start: usize, end: usize, tag: FormatTag) {
        self.mutate_range(start, end, |tags| {
            tags.remove(&tag);
        });
    }

    /// Toggles `tag` over `[start, end)`.
    ///
    /// When every character in the range already carries the tag it is
    /// removed everywhere, otherwise it is added everywhere. Other tags on
    /// the range are untouched, so toggling bold over an italic span yields
    /// bold+italic and toggling it again leaves italic only.
    pub fn toggle_tag(&mut self, start: usize, end: usize, tag: FormatTag) {
        if self.range_has_tag(start, end, tag) {
            self.remove_tag(start, end, tag);
        } else {
            self.apply_tag(start, end, tag);
        }
    }

    /// Sets the font size for the selection `[start, end)`.
    ///
    /// An empty selection is a no-op: size changes are selection-scoped only.
    pub fn set_size(&mut self, start: usize, end: usize, points: u32) {
        if start >= end {
            return;
        }
        self.apply_tag(start, end, FormatTag::Size(points));
    }

    /// Reports whether every character of a non-empty `[start, end)` carries
    /// `tag`. Empty or fully out-of-range selections report `false`.
    pub fn range_has_tag(&self, start: usize, end: usize, tag: FormatTag) -> bool {
        let end = end.min(self.char_len());
        if start >= end {
            return false;
        }

        let mut offset = 0;
        for run in &self.runs {
            let run_end = offset + run.char_len();
            if run_end > start && offset < end && !run.tags.contains(&tag) {
                return false;
            }
            offset = run_end;
            if offset >= end {
                break;
            }
        }
        true
    }

    /// Coalesces adjacent runs with identical tag sets and drops empty runs.
    pub fn normalize(&mut self) {
        let mut merged: Vec<TextRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.tags == run.tags => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }

    /// Rewrites the run list so `[start, end)` forms whole runs, then applies
    /// `mutate` to the tag set of each covered run.
    fn mutate_range<F: FnMut(&mut BTreeSet<FormatTag>)>(
        &mut self,
        start: usize,
        end: usize,
        mut mutate: F,
    ) {
        let end = end.min(self.char_len());
        if start >= end {
            return;
        }

        let mut rebuilt: Vec<TextRun> = Vec::with_capacity(self.runs.len() + 2);
        let mut offset = 0;
        for run in self.runs.drain(..) {
            let run_len = run.char_len();
            let run_start = offset;
            let run_end = offset + run_len;
            offset = run_end;

            if run_end <= start || run_start >= end {
                rebuilt.push(run);
                continue;
            }

            let split_from = start.saturating_sub(run_start).min(run_len);
            let split_to = (end - run_start).min(run_len);

            let chars: Vec<char> = run.text.chars().collect();
            if split_from > 0 {
                rebuilt.push(TextRun {
                    text: chars[..split_from].iter().collect(),
                    tags: run.tags.clone(),
                });
            }

            let mut covered_tags = run.tags.clone();
            mutate(&mut covered_tags);
            rebuilt.push(TextRun {
                text: chars[split_from..split_to].iter().collect(),
                tags: covered_tags,
            });

            if split_to < run_len {
                rebuilt.push(TextRun {
                    text: chars[split_to..].iter().collect(),
                    tags: run.tags,
                });
            }
        }

        self.runs = rebuilt;
        self.normalize();
    }
}

/// Inserts a tag, keeping at most one `Size` entry in the set.
fn insert_tag(tags: &mut BTreeSet<FormatTag>, tag: FormatTag) {
    if matches!(tag, FormatTag::Size(_)) {
        tags.retain(|existing| !matches!(existing, FormatTag::Size(_)));
    }
    tags.insert(tag);
}

#[cfg(test)]
mod tests {
    use super::{parse_tag_name, tag_names, FormatTag, RichText, TextRun};

    #[test]
    fn plain_content_round_trips() {
        let text = RichText::plain("Hello");
        assert_eq!(text.content(), "Hello");
        assert_eq!(text.runs().len(), 1);
        assert!(text.runs()[0].tags.is_empty());
    }

    #[test]
    fn apply_tag_splits_runs_at_range_boundaries() {
        let mut text = RichText::plain("hello world");
        text.apply_tag(6, 11, FormatTag::Bold);

        assert_eq!(text.runs().len(), 2);
        assert_eq!(text.runs()[0].text, "hello ");
        assert!(text.runs()[0].tags.is_empty());
        assert_eq!(text.runs()[1].text, "world");
        assert!(text.runs()[1].tags.contains(&FormatTag::Bold));
        assert_eq!(text.content(), "hello world");
    }

    #[test]
    fn toggle_bold_over_italic_yields_both_then_italic_only() {
        let mut text = RichText::plain("abcdef");
        text.apply_tag(0, 6, FormatTag::Italic);

        text.toggle_tag(2, 4, FormatTag::Bold);
        assert!(text.range_has_tag(2, 4, FormatTag::Bold));
        assert!(text.range_has_tag(2, 4, FormatTag::Italic));

        text.toggle_tag(2, 4, FormatTag::Bold);
        assert!(!text.range_has_tag(2, 4, FormatTag::Bold));
        assert!(text.range_has_tag(0, 6, FormatTag::Italic));
        // Removing the bold split leaves a single italic run again.
        assert_eq!(text.runs().len(), 1);
    }

    #[test]
    fn toggle_adds_when_range_is_only_partially_tagged() {
        let mut text = RichText::plain("abcdef");
        text.apply_tag(0, 3, FormatTag::Bold);
        text.toggle_tag(0, 6, FormatTag::Bold);
        assert!(text.range_has_tag(0, 6, FormatTag::Bold));
    }

    #[test]
    fn set_size_replaces_previous_size_and_ignores_empty_selection() {
        let mut text = RichText::plain("abcd");
        text.set_size(0, 4, 18);
        text.set_size(0, 4, 24);
        assert!(text.range_has_tag(0, 4, FormatTag::Size(24)));
        assert!(!text.range_has_tag(0, 4, FormatTag::Size(18)));

        let before = text.clone();
        text.set_size(2, 2, 36);
        assert_eq!(text, before);
    }

    #[test]
    fn normalize_coalesces_adjacent_runs_with_equal_tags() {
        let text = RichText::from_runs(vec![
            TextRun::plain("foo"),
            TextRun::plain("bar"),
            TextRun::tagged("baz", [FormatTag::Bold]),
        ]);
        assert_eq!(text.runs().len(), 2);
        assert_eq!(text.runs()[0].text, "foobar");
    }

    #[test]
    fn range_operations_clamp_to_content_length() {
        let mut text = RichText::plain("ab");
        text.apply_tag(1, 99, FormatTag::Bold);
        assert!(text.range_has_tag(1, 2, FormatTag::Bold));
        assert_eq!(text.content(), "ab");
    }

    #[test]
    fn compound_legacy_tag_names_expand_to_component_tags() {
        assert_eq!(
            parse_tag_name("size24_bold"),
            vec![FormatTag::Size(24), FormatTag::Bold]
        );
        assert_eq!(
            parse_tag_name("bold_italic"),
            vec![FormatTag::Bold, FormatTag::Italic]
        );
        assert!(parse_tag_name("wavy").is_empty());
    }

    #[test]
    fn tag_names_are_deterministic() {
        let mut text = RichText::plain("x");
        text.apply_tag(0, 1, FormatTag::Size(24));
        text.apply_tag(0, 1, FormatTag::Bold);
        assert_eq!(tag_names(&text.runs()[0].tags), vec!["bold", "size24"]);
    }

    #[test]
    fn multibyte_content_splits_on_char_boundaries() {
        let mut text = RichText::plain("héllo");
        text.apply_tag(1, 2, FormatTag::Bold);
        assert_eq!(text.content(), "héllo");
        assert_eq!(text.runs()[1].text, "é");
    }
}
