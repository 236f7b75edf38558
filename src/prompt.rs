//! Prompt composition.
//!
//! Transcript text and the question are embedded verbatim; nothing is
//! truncated or escaped.

use crate::transcript::Transcript;

/// Build the single instruction sent to the model
pub fn compose_prompt(transcript: &Transcript, question: &str) -> String {
    match transcript {
        Transcript::Found(text) => {
            format!("Based on this transcript: {}, answer: {}", text, question)
        }
        Transcript::Unavailable => format!(
            "The transcript for this video could not be retrieved. \
             Answer the following question using your general knowledge: {}",
            question
        ),
    }
}
