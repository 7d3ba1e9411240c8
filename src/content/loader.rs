use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::de::DeserializeOwned;

use crate::error::ContentError;
use crate::models::{ConversationEntry, Dataset, PatternEntry, VocabularyEntry};

/// File names looked up inside an override data directory.
const VOCABULARY_FILE: &str = "vocabulary.json";
const CONVERSATION_FILE: &str = "conversation.json";
const PATTERNS_FILE: &str = "patterns.json";

/// Collections compiled into the binary so the app works without any files on
/// disk.
const BUNDLED_VOCABULARY: &str = include_str!("../../data/vocabulary.json");
const BUNDLED_CONVERSATION: &str = include_str!("../../data/conversation.json");
const BUNDLED_PATTERNS: &str = include_str!("../../data/patterns.json");

/// Parse the collections shipped with the binary.
pub fn load_bundled() -> Result<Dataset, ContentError> {
    load_dataset(None)
}

/// Load every collection, preferring files from `data_dir` when they exist and
/// falling back to the bundled copy per file.
pub fn load_dataset(data_dir: Option<&Path>) -> Result<Dataset, ContentError> {
    let vocabulary: Vec<VocabularyEntry> =
        read_collection(data_dir, VOCABULARY_FILE, BUNDLED_VOCABULARY)?;
    let conversation: Vec<ConversationEntry> =
        read_collection(data_dir, CONVERSATION_FILE, BUNDLED_CONVERSATION)?;
    let patterns: Vec<PatternEntry> = read_collection(data_dir, PATTERNS_FILE, BUNDLED_PATTERNS)?;

    warn_duplicate_ids(VOCABULARY_FILE, vocabulary.iter().map(|entry| entry.id));
    warn_duplicate_ids(CONVERSATION_FILE, conversation.iter().map(|entry| entry.id));
    warn_duplicate_ids(PATTERNS_FILE, patterns.iter().map(|entry| entry.id));

    info!(
        "event=content_loaded vocabulary={} conversation={} patterns={}",
        vocabulary.len(),
        conversation.len(),
        patterns.len()
    );

    Ok(Dataset {
        vocabulary,
        conversation,
        patterns,
    })
}

fn read_collection<T: DeserializeOwned>(
    data_dir: Option<&Path>,
    file_name: &str,
    bundled: &str,
) -> Result<Vec<T>, ContentError> {
    if let Some(dir) = data_dir {
        let path = dir.join(file_name);
        if path.is_file() {
            let raw = fs::read_to_string(&path).map_err(|source| ContentError::Io {
                path: path.clone(),
                source,
            })?;
            info!("event=content_override file={}", path.display());
            return parse_collection(&path.display().to_string(), &raw);
        }
    }
    parse_collection(file_name, bundled)
}

fn parse_collection<T: DeserializeOwned>(name: &str, raw: &str) -> Result<Vec<T>, ContentError> {
    serde_json::from_str(raw).map_err(|source| ContentError::Json {
        name: name.to_string(),
        source,
    })
}

/// Ids are expected to be unique per collection. A clash only confuses which
/// card is expanded, so it is reported rather than rejected.
fn warn_duplicate_ids(name: &str, ids: impl Iterator<Item = i64>) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            warn!("event=duplicate_id file={name} id={id}");
        }
    }
}
