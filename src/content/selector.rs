use clap::ValueEnum;

use crate::models::{
    Category, ConversationEntry, Dataset, HskLevel, PatternEntry, UsageNote, VocabularyEntry,
};

/// How the vocabulary tab behaves while no level filter is selected. The two
/// variants are alternative configurations; only one is active per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum VocabularyPolicy {
    /// Show every word until a level is picked.
    #[default]
    All,
    /// Show only words that carry no HSK level until a level is picked.
    Unleveled,
}

/// Everything the selector needs to know besides the dataset itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filters {
    pub category: Category,
    pub hsk_level: Option<HskLevel>,
    pub policy: VocabularyPolicy,
    /// Level the patterns tab is pinned to.
    pub pattern_level: HskLevel,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            category: Category::Conversation,
            hsk_level: None,
            policy: VocabularyPolicy::default(),
            pattern_level: HskLevel::FIRST,
        }
    }
}

/// Stable identity of a rendered card. Ids are only unique within their own
/// collection, so the category is part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub category: Category,
    pub id: i64,
}

/// A borrowed view over one entry of any collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item<'a> {
    Conversation(&'a ConversationEntry),
    Vocabulary(&'a VocabularyEntry),
    Pattern(&'a PatternEntry),
}

impl<'a> Item<'a> {
    pub fn key(&self) -> ItemKey {
        match self {
            Item::Conversation(entry) => ItemKey {
                category: Category::Conversation,
                id: entry.id,
            },
            Item::Vocabulary(entry) => ItemKey {
                category: Category::Vocabulary,
                id: entry.id,
            },
            Item::Pattern(entry) => ItemKey {
                category: Category::Patterns,
                id: entry.id,
            },
        }
    }

    /// Target-language text, also what gets spoken.
    pub fn headword(&self) -> &'a str {
        match self {
            Item::Conversation(entry) => &entry.target_text,
            Item::Vocabulary(entry) => &entry.headword,
            Item::Pattern(entry) => &entry.pattern_text,
        }
    }

    pub fn pronunciation_guide(&self) -> &'a str {
        match self {
            Item::Conversation(entry) => &entry.pronunciation_guide,
            Item::Vocabulary(entry) => &entry.pronunciation_guide,
            Item::Pattern(entry) => &entry.pronunciation_guide,
        }
    }

    pub fn translation(&self) -> &'a str {
        match self {
            Item::Conversation(entry) => &entry.translation,
            Item::Vocabulary(entry) => &entry.translation,
            Item::Pattern(entry) => &entry.translation,
        }
    }

    pub fn hsk_level(&self) -> Option<HskLevel> {
        match self {
            Item::Conversation(_) => None,
            Item::Vocabulary(entry) => entry.hsk_level,
            Item::Pattern(entry) => entry.hsk_level,
        }
    }

    /// Usage note, if this entry has one. Only vocabulary carries notes.
    pub fn usage(&self) -> Option<&'a UsageNote> {
        match self {
            Item::Vocabulary(entry) => entry.usage.as_ref(),
            _ => None,
        }
    }
}

/// Derive the ordered list of entries to render for `filters`.
///
/// The result is always a subsequence of the matching collection in its
/// stored order. An empty result is a normal outcome and is rendered as an
/// empty state by the caller.
pub fn select<'a>(dataset: &'a Dataset, filters: &Filters) -> Vec<Item<'a>> {
    match filters.category {
        Category::Conversation => dataset.conversation.iter().map(Item::Conversation).collect(),
        Category::Vocabulary => dataset
            .vocabulary
            .iter()
            .filter(|entry| match (filters.hsk_level, filters.policy) {
                (Some(level), _) => entry.hsk_level == Some(level),
                (None, VocabularyPolicy::All) => true,
                (None, VocabularyPolicy::Unleveled) => entry.hsk_level.is_none(),
            })
            .map(Item::Vocabulary)
            .collect(),
        Category::Patterns => dataset
            .patterns
            .iter()
            .filter(|entry| entry.hsk_level == Some(filters.pattern_level))
            .map(Item::Pattern)
            .collect(),
    }
}
