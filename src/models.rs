//! Domain models for the bundled study content. These types stay light-weight
//! data holders: they are deserialized once at startup and only ever borrowed
//! afterwards, so the selector and the views can hand out references instead
//! of cloning entries around.

use std::fmt;

use log::warn;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ContentError;

/// Standardized proficiency tier (HSK 1 through HSK 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub struct HskLevel(u8);

impl HskLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;
    /// Entry level, also the level the patterns tab is pinned to by default.
    pub const FIRST: HskLevel = HskLevel(1);

    /// Build a level, rejecting anything outside `1..=6`.
    pub fn new(level: u8) -> Result<Self, ContentError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ContentError::InvalidLevel(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every level in ascending order.
    pub fn all() -> impl Iterator<Item = HskLevel> {
        (Self::MIN..=Self::MAX).map(HskLevel)
    }
}

impl TryFrom<u8> for HskLevel {
    type Error = ContentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        HskLevel::new(value)
    }
}

/// Reads an optional level without failing the record. Anything that is not
/// an integer in `1..=6` is logged and treated as unleveled.
fn lenient_level<'de, D>(deserializer: D) -> Result<Option<HskLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| level_from_value(&value)))
}

fn level_from_value(value: &Value) -> Option<HskLevel> {
    let number = match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    let level = number
        .and_then(|number| u8::try_from(number).ok())
        .and_then(|number| HskLevel::new(number).ok());
    if level.is_none() {
        warn!("event=invalid_level value={value}");
    }
    level
}

impl fmt::Display for HskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HSK {}", self.0)
    }
}

/// Top-level content axis, one per tab in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Conversation,
    Vocabulary,
    Patterns,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Conversation,
        Category::Vocabulary,
        Category::Patterns,
    ];

    /// Neighbouring tab, wrapping around at both ends.
    pub fn cycle(self, offset: isize) -> Category {
        let len = Self::ALL.len() as isize;
        let current = Self::ALL
            .iter()
            .position(|category| *category == self)
            .unwrap_or(0) as isize;
        let next = (current + offset).rem_euclid(len);
        Self::ALL[next as usize]
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Conversation => "Conversation",
            Category::Vocabulary => "Vocabulary",
            Category::Patterns => "Patterns",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A sample sentence attached to a usage note or a grammar pattern.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Example {
    /// Optional short tag shown above the sentence ("At the office", ...).
    pub label: Option<String>,
    #[serde(alias = "chinese")]
    pub target_text: String,
    #[serde(alias = "pinyin")]
    pub pronunciation_guide: String,
    #[serde(alias = "burmese", alias = "english")]
    pub translation: String,
}

/// Extended explanation for a vocabulary entry, shown in the usage overlay.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UsageNote {
    pub title: String,
    pub meaning: String,
    #[serde(alias = "pattern")]
    pub grammar_pattern: String,
    #[serde(alias = "daily")]
    pub daily_examples: Vec<Example>,
    #[serde(alias = "work")]
    pub work_examples: Vec<Example>,
}

impl UsageNote {
    /// Look up an example card by its reveal key.
    pub fn example(&self, key: CardKey) -> Option<&Example> {
        match key.section {
            ExampleSection::Daily => self.daily_examples.get(key.index),
            ExampleSection::Work => self.work_examples.get(key.index),
        }
    }

    /// Card keys in display order: daily examples first, then work examples.
    pub fn card_keys(&self) -> Vec<CardKey> {
        let daily = (0..self.daily_examples.len()).map(|index| CardKey {
            section: ExampleSection::Daily,
            index,
        });
        let work = (0..self.work_examples.len()).map(|index| CardKey {
            section: ExampleSection::Work,
            index,
        });
        daily.chain(work).collect()
    }
}

/// Which example list of a usage note a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExampleSection {
    Daily,
    Work,
}

/// Identifies one example card inside a usage note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardKey {
    pub section: ExampleSection,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VocabularyEntry {
    pub id: i64,
    #[serde(default, alias = "chinese")]
    pub headword: String,
    #[serde(default, alias = "pinyin")]
    pub pronunciation_guide: String,
    #[serde(default, alias = "burmese", alias = "english")]
    pub translation: String,
    #[serde(default, alias = "hsk", deserialize_with = "lenient_level")]
    pub hsk_level: Option<HskLevel>,
    #[serde(default)]
    pub usage: Option<UsageNote>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversationEntry {
    pub id: i64,
    #[serde(default, alias = "chinese")]
    pub target_text: String,
    #[serde(default, alias = "burmese", alias = "english")]
    pub translation: String,
    #[serde(default, alias = "pinyin")]
    pub pronunciation_guide: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PatternEntry {
    pub id: i64,
    /// A pattern without a usable level never matches the pinned level.
    #[serde(default, alias = "hsk", deserialize_with = "lenient_level")]
    pub hsk_level: Option<HskLevel>,
    #[serde(default, alias = "pattern", alias = "chinese")]
    pub pattern_text: String,
    #[serde(default, alias = "pinyin")]
    pub pronunciation_guide: String,
    #[serde(default, alias = "burmese", alias = "english")]
    pub translation: String,
    #[serde(default)]
    pub structure: String,
    #[serde(default)]
    pub examples: Vec<Example>,
}

/// All bundled collections, loaded once at startup and never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub vocabulary: Vec<VocabularyEntry>,
    pub conversation: Vec<ConversationEntry>,
    pub patterns: Vec<PatternEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_rejects_out_of_range_values() {
        assert!(HskLevel::new(0).is_err());
        assert!(HskLevel::new(7).is_err());
        assert_eq!(HskLevel::new(6).map(HskLevel::get).ok(), Some(6));
        assert_eq!(HskLevel::all().count(), 6);
    }

    #[test]
    fn category_cycle_wraps() {
        assert_eq!(Category::Conversation.cycle(-1), Category::Patterns);
        assert_eq!(Category::Patterns.cycle(1), Category::Conversation);
        assert_eq!(Category::Vocabulary.cycle(1), Category::Patterns);
    }

    #[test]
    fn vocabulary_accepts_legacy_field_names() {
        let json = r#"{"id": 4, "chinese": "你好", "pinyin": "nǐ hǎo", "burmese": "hello", "hsk": 1}"#;
        let entry: VocabularyEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.headword, "你好");
        assert_eq!(entry.pronunciation_guide, "nǐ hǎo");
        assert_eq!(entry.translation, "hello");
        assert_eq!(entry.hsk_level, HskLevel::new(1).ok());
        assert!(entry.usage.is_none());
    }

    #[test]
    fn unusable_levels_load_as_unleveled() {
        for raw in [r#"7"#, r#"0"#, r#"-1"#, r#""two""#, r#"1.5"#, r#"null"#] {
            let json = format!(r#"{{"id": 1, "headword": "我", "hsk_level": {raw}}}"#);
            let entry: VocabularyEntry = serde_json::from_str(&json).unwrap();
            assert_eq!(entry.hsk_level, None, "level {raw}");
            assert_eq!(entry.headword, "我");
        }
        let entry: VocabularyEntry =
            serde_json::from_str(r#"{"id": 1, "hsk_level": "3"}"#).unwrap();
        assert_eq!(entry.hsk_level, HskLevel::new(3).ok());
    }

    #[test]
    fn pattern_without_level_still_loads() {
        let entry: PatternEntry =
            serde_json::from_str(r#"{"id": 5, "pattern_text": "A 是 B"}"#).unwrap();
        assert_eq!(entry.hsk_level, None);
        assert_eq!(entry.pattern_text, "A 是 B");
    }

    #[test]
    fn missing_text_fields_render_blank() {
        let entry: ConversationEntry = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(entry.target_text.is_empty());
        assert!(entry.translation.is_empty());
    }

    #[test]
    fn card_keys_list_daily_before_work() {
        let note = UsageNote {
            daily_examples: vec![Example::default(), Example::default()],
            work_examples: vec![Example::default()],
            ..UsageNote::default()
        };
        let keys = note.card_keys();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0].section, ExampleSection::Daily);
        assert_eq!(keys[2], CardKey { section: ExampleSection::Work, index: 0 });
        assert!(note.example(keys[2]).is_some());
        assert!(note.example(CardKey { section: ExampleSection::Work, index: 1 }).is_none());
    }
}
