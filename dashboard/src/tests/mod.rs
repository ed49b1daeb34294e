mod api_client_test;

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use agenda_shared::conflict::ConflictLevel;
use agenda_shared::models::ConflictBrief;

use crate::orchestrator::OverridePrompt;

/// Prompt with pre-scripted answers; every invocation is recorded so
/// tests can assert what the user was shown. Panics when asked more
/// questions than scripted.
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    seen: Mutex<Vec<(ConflictLevel, Vec<ConflictBrief>)>>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        ScriptedPrompt {
            answers: Mutex::new(answers.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// A prompt that must never fire.
    pub fn unreachable() -> Self {
        Self::new([])
    }

    pub fn seen(&self) -> Vec<(ConflictLevel, Vec<ConflictBrief>)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl OverridePrompt for ScriptedPrompt {
    async fn confirm_override(&self, level: ConflictLevel, conflicts: &[ConflictBrief]) -> bool {
        self.seen.lock().unwrap().push((level, conflicts.to_vec()));
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .expect("prompt invoked but no answer was scripted")
    }
}
