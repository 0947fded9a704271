use serde::Serialize;

use crate::modules::language::model::{LanguageEntry, LanguageTable};

/// Which capability a grouping splits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Tts,
    Stt,
}

impl Capability {
    pub fn supported_by(self, entry: &LanguageEntry) -> bool {
        match self {
            Capability::Tts => entry.tts_supported,
            Capability::Stt => entry.stt_supported,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LanguagePartition {
    pub supported: Vec<&'static LanguageEntry>,
    pub text_only: Vec<&'static LanguageEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub code: &'static str,
    pub label: String,
}

pub fn partition(table: &LanguageTable, capability: Capability) -> LanguagePartition {
    let (supported, text_only): (Vec<_>, Vec<_>) = table
        .entries()
        .iter()
        .partition(|entry| capability.supported_by(entry));

    LanguagePartition {
        supported,
        text_only,
    }
}

pub fn partition_by_tts(table: &LanguageTable) -> LanguagePartition {
    partition(table, Capability::Tts)
}

pub fn partition_by_stt(table: &LanguageTable) -> LanguagePartition {
    partition(table, Capability::Stt)
}

pub fn label(entry: &LanguageEntry, capability: Capability) -> String {
    if capability.supported_by(entry) {
        entry.name.to_string()
    } else {
        format!("{} (Text Only)", entry.name)
    }
}

pub fn source_options(table: &LanguageTable) -> Vec<LanguageOption> {
    options(table, Capability::Stt)
}

pub fn target_options(table: &LanguageTable) -> Vec<LanguageOption> {
    options(table, Capability::Tts)
}

fn options(table: &LanguageTable, capability: Capability) -> Vec<LanguageOption> {
    table
        .entries()
        .iter()
        .map(|entry| LanguageOption {
            code: entry.code,
            label: label(entry, capability),
        })
        .collect()
}
