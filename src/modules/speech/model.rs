#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListeningState {
    #[default]
    Idle,
    Requested,
    Listening,
}

impl ListeningState {
    pub fn is_active(&self) -> bool {
        !matches!(self, ListeningState::Idle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    Started,
    /// First final alternative of the first result.
    Result(String),
    Error(String),
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionOutput {
    Transcript(String),
    Alert(String),
}
