//! Chapter and verse segmentation for plain-text scripture books.
//!
//! The input is the markup-free text of one book; the output is an ordered
//! mapping of chapter labels to verse labels to verse text. The scan is a
//! single forward pass over the lines with three states: before the first
//! chapter header, inside a chapter with no verse yet, and inside a verse.
//! Unrecognized content is absorbed or dropped, never an error, so a damaged
//! source still yields whatever could be read from it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Chapter header keywords recognized when the configuration does not
/// provide its own set. Psalms use "Salmo" instead of "Capítulo".
pub const DEFAULT_CHAPTER_KEYWORDS: &[&str] = &["Capítulo", "Salmo"];

static VERSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\s+(.*)").unwrap());

/// What to do with a non-empty line that is neither a chapter header nor a
/// verse line while a verse is open.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ContinuationMode {
    /// Append the line to the open verse, joined with a single space.
    #[default]
    Merge,
    /// Drop the line.
    Discard,
}

/// Segments the plain text of one book into chapters and verses.
#[derive(Debug, Clone)]
pub struct Segmenter {
    chapter_re: Regex,
    continuation: ContinuationMode,
}

/// One book's text, ordered by first appearance of each chapter and verse
/// label. Serializes as `{chapter: {verse: text}}` with keys in insertion
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookText {
    chapters: Vec<ChapterEntry>,
}

#[derive(Debug, Clone, PartialEq)]
struct ChapterEntry {
    label: String,
    verses: Vec<VerseEntry>,
}

#[derive(Debug, Clone, PartialEq)]
struct VerseEntry {
    label: String,
    text: String,
}

enum LineKind<'a> {
    ChapterHeader(&'a str),
    Verse { label: &'a str, text: &'a str },
    Other(&'a str),
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    NoChapter,
    InChapter { chapter: usize },
    InVerse { chapter: usize, verse: usize },
}

impl Segmenter {
    /// Build a segmenter recognizing the given chapter keywords. An empty
    /// keyword list falls back to [`DEFAULT_CHAPTER_KEYWORDS`].
    pub fn new(keywords: &[String], continuation: ContinuationMode) -> Self {
        let mut alternatives: Vec<String> =
            keywords.iter().map(|keyword| regex::escape(keyword)).collect();
        if alternatives.is_empty() {
            alternatives = DEFAULT_CHAPTER_KEYWORDS
                .iter()
                .map(|keyword| regex::escape(keyword))
                .collect();
        }
        // Escaped alternatives cannot produce an invalid pattern.
        let chapter_re =
            Regex::new(&format!(r"(?i)^(?:{})\s+(\d+)", alternatives.join("|"))).unwrap();
        Self {
            chapter_re,
            continuation,
        }
    }

    /// Segment a whole document, splitting on line breaks.
    pub fn segment(&self, text: &str) -> BookText {
        self.segment_lines(text.lines())
    }

    /// Segment an already-split sequence of lines.
    pub fn segment_lines<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> BookText {
        let mut book = BookText::default();
        let mut state = ScanState::NoChapter;

        for raw in lines {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            state = self.step(&mut book, state, line);
        }

        book
    }

    fn step(&self, book: &mut BookText, state: ScanState, line: &str) -> ScanState {
        match self.classify(line) {
            LineKind::ChapterHeader(label) => {
                // A header line never carries verse content; re-entering a
                // previously seen label merges into the existing chapter.
                let chapter = book.chapter_index(label);
                ScanState::InChapter { chapter }
            }
            LineKind::Verse { label, text } => match state {
                // Verse text before any chapter header has nowhere to go.
                ScanState::NoChapter => ScanState::NoChapter,
                ScanState::InChapter { chapter } | ScanState::InVerse { chapter, .. } => {
                    let verse = book.chapters[chapter].upsert(label, text);
                    ScanState::InVerse { chapter, verse }
                }
            },
            LineKind::Other(text) => {
                if let ScanState::InVerse { chapter, verse } = state {
                    if self.continuation == ContinuationMode::Merge {
                        book.chapters[chapter].append(verse, text);
                    }
                }
                state
            }
        }
    }

    fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        if let Some(caps) = self.chapter_re.captures(line) {
            if let Some(label) = caps.get(1) {
                return LineKind::ChapterHeader(label.as_str());
            }
        }
        if let Some(caps) = VERSE_RE.captures(line) {
            if let (Some(label), Some(text)) = (caps.get(1), caps.get(2)) {
                return LineKind::Verse {
                    label: label.as_str(),
                    text: text.as_str().trim(),
                };
            }
        }
        LineKind::Other(line)
    }
}

impl BookText {
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn verse_count(&self) -> usize {
        self.chapters.iter().map(|chapter| chapter.verses.len()).sum()
    }

    fn chapter_index(&mut self, label: &str) -> usize {
        if let Some(position) = self
            .chapters
            .iter()
            .position(|chapter| chapter.label == label)
        {
            return position;
        }
        self.chapters.push(ChapterEntry {
            label: label.to_string(),
            verses: Vec::new(),
        });
        self.chapters.len() - 1
    }
}

impl ChapterEntry {
    /// Record a verse, overwriting the text of an existing label in place so
    /// the label keeps its first-seen position.
    fn upsert(&mut self, label: &str, text: &str) -> usize {
        if let Some(position) = self.verses.iter().position(|verse| verse.label == label) {
            self.verses[position].text = text.to_string();
            return position;
        }
        self.verses.push(VerseEntry {
            label: label.to_string(),
            text: text.to_string(),
        });
        self.verses.len() - 1
    }

    fn append(&mut self, verse: usize, line: &str) {
        let text = &mut self.verses[verse].text;
        text.push(' ');
        text.push_str(line);
    }
}

impl Serialize for BookText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.chapters.len()))?;
        for chapter in &self.chapters {
            map.serialize_entry(&chapter.label, &VerseMap(&chapter.verses))?;
        }
        map.end()
    }
}

struct VerseMap<'a>(&'a [VerseEntry]);

impl Serialize for VerseMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for verse in self.0 {
            map.serialize_entry(&verse.label, &verse.text)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge_segmenter() -> Segmenter {
        Segmenter::new(&[], ContinuationMode::Merge)
    }

    fn segment(lines: &[&str]) -> BookText {
        merge_segmenter().segment_lines(lines.iter().copied())
    }

    fn as_value(book: &BookText) -> serde_json::Value {
        serde_json::to_value(book).expect("book should serialize")
    }

    #[test]
    fn empty_input_yields_empty_mapping() {
        let book = segment(&[]);
        assert!(book.is_empty());
        assert_eq!(serde_json::to_string(&book).expect("serialize"), "{}");
    }

    #[test]
    fn continuation_lines_are_space_joined() {
        let book = segment(&["Capítulo 1", "1 In the", "beginning"]);
        assert_eq!(as_value(&book), serde_json::json!({"1": {"1": "In the beginning"}}));
    }

    #[test]
    fn discard_mode_drops_continuation_lines() {
        let segmenter = Segmenter::new(&[], ContinuationMode::Discard);
        let book = segmenter.segment_lines(["Capítulo 1", "1 In the", "beginning"]);
        assert_eq!(as_value(&book), serde_json::json!({"1": {"1": "In the"}}));
    }

    #[test]
    fn repeated_verse_label_is_last_write_wins() {
        let book = segment(&["Capítulo 1", "1 First", "1 Second"]);
        assert_eq!(as_value(&book), serde_json::json!({"1": {"1": "Second"}}));
    }

    #[test]
    fn new_chapter_resets_verse_state() {
        let book = segment(&["Capítulo 1", "1 Text", "Capítulo 2", "1 Other"]);
        assert_eq!(
            as_value(&book),
            serde_json::json!({"1": {"1": "Text"}, "2": {"1": "Other"}})
        );
    }

    #[test]
    fn lines_before_first_chapter_are_dropped() {
        let book = segment(&["stray text", "3 early verse", "Capítulo 1", "1 Verse"]);
        assert_eq!(as_value(&book), serde_json::json!({"1": {"1": "Verse"}}));
    }

    #[test]
    fn continuation_without_open_verse_is_dropped() {
        let book = segment(&["Capítulo 1", "prose before any verse", "1 Verse"]);
        assert_eq!(as_value(&book), serde_json::json!({"1": {"1": "Verse"}}));
    }

    #[test]
    fn digits_only_line_is_not_a_verse() {
        let book = segment(&["Capítulo 1", "1 Verse", "23"]);
        assert_eq!(as_value(&book), serde_json::json!({"1": {"1": "Verse 23"}}));
    }

    #[test]
    fn chapter_header_carries_no_verse_content() {
        let book = segment(&["Capítulo 1 y algo más", "1 Verse"]);
        assert_eq!(as_value(&book), serde_json::json!({"1": {"1": "Verse"}}));
    }

    #[test]
    fn reentering_a_chapter_merges_into_the_existing_entry() {
        let book = segment(&[
            "Capítulo 1",
            "1 Uno",
            "Capítulo 2",
            "1 Dos",
            "Capítulo 1",
            "2 Tres",
        ]);
        assert_eq!(
            as_value(&book),
            serde_json::json!({"1": {"1": "Uno", "2": "Tres"}, "2": {"1": "Dos"}})
        );
        assert_eq!(book.chapter_count(), 2);
    }

    #[test]
    fn salmo_headers_and_case_folding_are_recognized() {
        let book = segment(&["SALMO 23", "1 Jehová es mi pastor", "cApÍtUlO 2", "1 x"]);
        assert_eq!(
            as_value(&book),
            serde_json::json!({"23": {"1": "Jehová es mi pastor"}, "2": {"1": "x"}})
        );
    }

    #[test]
    fn configured_keywords_replace_the_default_set() {
        let segmenter = Segmenter::new(&["Chapter".to_string()], ContinuationMode::Merge);
        let book = segmenter.segment_lines(["Salmo 1", "1 dropped", "Chapter 2", "1 kept"]);
        assert_eq!(as_value(&book), serde_json::json!({"2": {"1": "kept"}}));
    }

    #[test]
    fn labels_keep_their_original_spelling() {
        let book = segment(&["Capítulo 007", "08 Verse"]);
        assert_eq!(as_value(&book), serde_json::json!({"007": {"08": "Verse"}}));
    }

    #[test]
    fn keys_serialize_in_first_seen_order() {
        let book = segment(&[
            "Capítulo 2",
            "10 diez",
            "2 dos",
            "Capítulo 10",
            "1 uno",
            "Capítulo 1",
            "1 uno",
        ]);
        let json = serde_json::to_string(&book).expect("serialize");
        assert_eq!(
            json,
            r#"{"2":{"10":"diez","2":"dos"},"10":{"1":"uno"},"1":{"1":"uno"}}"#
        );
    }

    #[test]
    fn all_keys_are_decimal_and_texts_non_empty() {
        let book = segment(&[
            "noise",
            "Salmo 119",
            "1 Bienaventurados los perfectos",
            "de camino",
            "2 Bienaventurados",
            "Capítulo 3",
            "7 texto",
        ]);
        let value = as_value(&book);
        let chapters = value.as_object().expect("outer object");
        for (chapter, verses) in chapters {
            assert!(chapter.chars().all(|ch| ch.is_ascii_digit()));
            for (verse, text) in verses.as_object().expect("inner object") {
                assert!(verse.chars().all(|ch| ch.is_ascii_digit()));
                assert!(!text.as_str().expect("verse text").is_empty());
            }
        }
    }

    #[test]
    fn segmentation_is_a_pure_function_of_its_input() {
        let lines = ["Capítulo 1", "1 In the", "beginning", "2 and then"];
        let segmenter = merge_segmenter();
        let first = segmenter.segment_lines(lines);
        let second = segmenter.segment_lines(lines);
        assert_eq!(first, second);
    }

    #[test]
    fn whitespace_around_lines_is_ignored() {
        let book = segment(&["  Capítulo 1  ", "\t1   Verse text  ", "   ", "  tail  "]);
        assert_eq!(as_value(&book), serde_json::json!({"1": {"1": "Verse text tail"}}));
    }
}
