use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageEntry {
    pub code: &'static str,
    pub name: &'static str,
    pub tts_supported: bool,
    pub stt_supported: bool,
}

impl LanguageEntry {
    const fn full(code: &'static str, name: &'static str) -> Self {
        Self {
            code,
            name,
            tts_supported: true,
            stt_supported: true,
        }
    }

    const fn text_only(code: &'static str, name: &'static str) -> Self {
        Self {
            code,
            name,
            tts_supported: false,
            stt_supported: false,
        }
    }
}

pub const DEFAULT_SOURCE_LANG: &str = "en";
pub const DEFAULT_TARGET_LANG: &str = "hi";

static LANGUAGES: [LanguageEntry; 26] = [
    LanguageEntry::full("en", "English"),
    // Popular international languages
    LanguageEntry::full("es", "Spanish"),
    LanguageEntry::full("fr", "French"),
    LanguageEntry::full("de", "German"),
    LanguageEntry::full("it", "Italian"),
    LanguageEntry::full("pt", "Portuguese"),
    LanguageEntry::full("ru", "Russian"),
    LanguageEntry::full("ja", "Japanese"),
    LanguageEntry::full("ko", "Korean"),
    LanguageEntry::full("zh", "Chinese"),
    LanguageEntry::full("ar", "Arabic"),
    // Indian languages
    LanguageEntry::full("hi", "Hindi"),
    LanguageEntry::full("bn", "Bengali"),
    LanguageEntry::full("te", "Telugu"),
    LanguageEntry::full("mr", "Marathi"),
    LanguageEntry::full("ta", "Tamil"),
    LanguageEntry::full("ur", "Urdu"),
    LanguageEntry::full("gu", "Gujarati"),
    LanguageEntry::full("kn", "Kannada"),
    LanguageEntry::full("ml", "Malayalam"),
    LanguageEntry::full("pa", "Punjabi"),
    LanguageEntry::full("ne", "Nepali"),
    // Text only
    LanguageEntry::text_only("tr", "Turkish"),
    LanguageEntry::text_only("pl", "Polish"),
    LanguageEntry::text_only("nl", "Dutch"),
    LanguageEntry::text_only("sv", "Swedish"),
];

#[derive(Debug, Clone, Copy)]
pub struct LanguageTable {
    entries: &'static [LanguageEntry],
}

impl LanguageTable {
    pub fn builtin() -> Self {
        Self { entries: &LANGUAGES }
    }

    #[cfg(test)]
    pub(crate) fn from_static(entries: &'static [LanguageEntry]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [LanguageEntry] {
        self.entries
    }

    pub fn lookup(&self, code: &str) -> Option<&'static LanguageEntry> {
        self.entries.iter().find(|entry| entry.code == code)
    }

    pub fn tts_supported(&self, code: &str) -> bool {
        self.lookup(code).is_some_and(|entry| entry.tts_supported)
    }

    pub fn stt_supported(&self, code: &str) -> bool {
        self.lookup(code).is_some_and(|entry| entry.stt_supported)
    }

    pub fn display_name(&self, code: &str) -> &'static str {
        self.lookup(code).map(|entry| entry.name).unwrap_or("this language")
    }
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::builtin()
    }
}
