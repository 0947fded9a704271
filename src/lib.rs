use config::settings::Settings;
use modules::language::model::LanguageTable;
use modules::translation::controller::ReducerContext;

pub mod config;
pub mod modules;
pub mod platform;
pub mod services;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub languages: LanguageTable,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            languages: LanguageTable::builtin(),
        }
    }

    pub fn reducer_context(&self) -> ReducerContext {
        ReducerContext {
            languages: self.languages,
            policy: self.settings.submit_policy,
            speech_available: false,
        }
    }
}
