#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use hsk_flashcards::models::{
    ConversationEntry, Example, PatternEntry, UsageNote, VocabularyEntry,
};
use hsk_flashcards::{Dataset, HskLevel, SpeechEngine, SpeechError, SpeechRequest};

/// Everything a `FakeEngine` was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Cancel,
    Speak(SpeechRequest),
}

/// Speech engine that records calls and models a single audio channel.
#[derive(Clone, Default)]
pub struct FakeEngine {
    pub calls: Rc<RefCell<Vec<Call>>>,
    pub audible: Rc<RefCell<Option<String>>>,
    pub fail: bool,
}

impl FakeEngine {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Speak(request) => Some(request.text.clone()),
                Call::Cancel => None,
            })
            .collect()
    }
}

impl SpeechEngine for FakeEngine {
    fn speak(&mut self, request: &SpeechRequest) -> Result<(), SpeechError> {
        self.calls.borrow_mut().push(Call::Speak(request.clone()));
        if self.fail {
            return Err(SpeechError::UnsupportedLocale(request.locale.to_string()));
        }
        *self.audible.borrow_mut() = Some(request.text.clone());
        Ok(())
    }

    fn cancel_all(&mut self) {
        self.calls.borrow_mut().push(Call::Cancel);
        *self.audible.borrow_mut() = None;
    }
}

pub fn level(value: u8) -> HskLevel {
    HskLevel::new(value).unwrap()
}

pub fn word(id: i64, headword: &str, hsk: Option<u8>) -> VocabularyEntry {
    VocabularyEntry {
        id,
        headword: headword.to_string(),
        pronunciation_guide: format!("pinyin-{id}"),
        translation: format!("meaning-{id}"),
        hsk_level: hsk.map(level),
        usage: None,
    }
}

pub fn example(text: &str) -> Example {
    Example {
        label: None,
        target_text: text.to_string(),
        pronunciation_guide: format!("{text}-pinyin"),
        translation: format!("{text}-translation"),
    }
}

pub fn usage_note() -> UsageNote {
    UsageNote {
        title: "Usage of 是".to_string(),
        meaning: "Links a subject to a noun.".to_string(),
        grammar_pattern: "Subject + 是 + Noun".to_string(),
        daily_examples: vec![example("我是学生。"), example("这是书。")],
        work_examples: vec![example("他是经理。")],
    }
}

pub fn phrase(id: i64, text: &str) -> ConversationEntry {
    ConversationEntry {
        id,
        target_text: text.to_string(),
        translation: format!("phrase-{id}"),
        pronunciation_guide: format!("phrase-pinyin-{id}"),
    }
}

pub fn pattern(id: i64, hsk: u8) -> PatternEntry {
    PatternEntry {
        id,
        hsk_level: Some(level(hsk)),
        pattern_text: format!("pattern-{id}"),
        pronunciation_guide: String::new(),
        translation: format!("pattern-meaning-{id}"),
        structure: "A + B".to_string(),
        examples: vec![example("例子")],
    }
}

/// Small dataset covering every collection: three phrases, words at levels
/// 1, 2, 1 plus one unleveled word with a usage note, and patterns at levels
/// 1, 2, 1.
pub fn sample_dataset() -> Dataset {
    let mut noted = word(4, "是", None);
    noted.usage = Some(usage_note());
    Dataset {
        vocabulary: vec![
            word(1, "我", Some(1)),
            word(2, "觉得", Some(2)),
            word(3, "你", Some(1)),
            noted,
        ],
        conversation: vec![phrase(1, "你好"), phrase(2, "谢谢"), phrase(3, "再见")],
        patterns: vec![pattern(1, 1), pattern(2, 2), pattern(3, 1)],
    }
}
