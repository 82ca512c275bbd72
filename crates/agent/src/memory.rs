/// Single-slot conversational memory: the explanation for the most recent
/// answer, replaced wholesale by the next one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationMemory {
    last_explanation: Option<String>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember(&mut self, explanation: String) {
        self.last_explanation = Some(explanation);
    }

    pub fn last_explanation(&self) -> Option<&str> {
        self.last_explanation.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.last_explanation.is_none()
    }
}
