use std::sync::Mutex;

pub trait Prompter: Send + Sync {
    fn alert(&self, message: &str);

    fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug)]
pub struct RecordingPrompter {
    reply: bool,
    alerts: Mutex<Vec<String>>,
    confirms: Mutex<Vec<String>>,
}

impl RecordingPrompter {
    pub fn accepting() -> Self {
        Self::replying(true)
    }

    pub fn declining() -> Self {
        Self::replying(false)
    }

    fn replying(reply: bool) -> Self {
        Self {
            reply,
            alerts: Mutex::new(Vec::new()),
            confirms: Mutex::new(Vec::new()),
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().map(|a| a.clone()).unwrap_or_default()
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Prompter for RecordingPrompter {
    fn alert(&self, message: &str) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(message.to_string());
        }
    }

    fn confirm(&self, message: &str) -> bool {
        if let Ok(mut confirms) = self.confirms.lock() {
            confirms.push(message.to_string());
        }
        self.reply
    }
}
