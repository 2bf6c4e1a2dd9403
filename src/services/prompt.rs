//! Prompt formatting for the chat and code modes.
//!
//! Chat renders the transcript as `Human:` / `Assistant:` lines and leaves a
//! trailing `Assistant:` cue for the model to continue from. Code wraps one
//! instruction in a fixed template ending in a `Code:` cue.

use crate::error::ErrorCode;
use crate::types::ConversationTurn;

/// Cue the model continues after in chat mode.
pub const CHAT_CUE: &str = "Assistant:";

/// Cue the model continues after in code mode.
pub const CODE_CUE: &str = "Code:";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("transcript is empty")]
    EmptyTranscript,
    #[error("instruction is empty")]
    EmptyInstruction,
}

impl ErrorCode for PromptError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyTranscript => "E_EMPTY_TRANSCRIPT",
            Self::EmptyInstruction => "E_EMPTY_INSTRUCTION",
        }
    }
}

/// Render a transcript, oldest turn first, followed by the `Assistant:` cue.
///
/// # Errors
///
/// Returns [`PromptError::EmptyTranscript`] when there are no turns.
pub fn format_chat(transcript: &[ConversationTurn]) -> Result<String, PromptError> {
    if transcript.is_empty() {
        return Err(PromptError::EmptyTranscript);
    }

    let mut prompt = transcript
        .iter()
        .map(|turn| format!("{}: {}", turn.role.prompt_label(), turn.content))
        .collect::<Vec<_>>()
        .join("\n");
    prompt.push('\n');
    prompt.push_str(CHAT_CUE);
    Ok(prompt)
}

/// Wrap a single instruction in the code-generation template.
///
/// # Errors
///
/// Returns [`PromptError::EmptyInstruction`] when the instruction is blank.
pub fn format_code(instruction: &str) -> Result<String, PromptError> {
    let instruction = instruction.trim();
    if instruction.is_empty() {
        return Err(PromptError::EmptyInstruction);
    }

    Ok(format!(
        "You are an expert code generation assistant. Write clean, working code for this request:\n\n\
         {instruction}\n\n\
         Reply with the code only, keeping comments brief and useful. Follow the usual conventions of the \
         language and make the result ready to use.\n\n\
         {CODE_CUE}"
    ))
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
