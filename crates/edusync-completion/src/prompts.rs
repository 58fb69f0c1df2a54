use crate::{CompletionClient, CompletionError, CompletionRequest};

pub const SUMMARY_INSTRUCTION: &str = "You are a helpful lecture summarizer. \
     Summarize the transcript clearly, structured with key points and takeaways.";
pub const SUMMARY_MAX_TOKENS: u32 = 400;

pub const QUIZ_INSTRUCTION: &str = "You are a quiz generator. \
     Create 5 multiple-choice questions (A-D) from the transcript. \
     Return a valid JSON with structure: \
     {\"questions\":[{\"question\":\"...\",\"options\":[\"A\",\"B\",\"C\",\"D\"],\"answer\":\"...\"}]}";
pub const QUIZ_MAX_TOKENS: u32 = 600;

/// Prose summary of a transcript.
pub async fn summarize(
    client: &dyn CompletionClient,
    transcript: &str,
) -> Result<String, CompletionError> {
    client
        .complete(CompletionRequest {
            instruction: SUMMARY_INSTRUCTION,
            content: transcript,
            max_tokens: SUMMARY_MAX_TOKENS,
        })
        .await
}

/// Five-question multiple-choice quiz. The reply is returned as the model
/// wrote it; it is expected, but not checked, to be JSON.
pub async fn generate_quiz(
    client: &dyn CompletionClient,
    transcript: &str,
) -> Result<String, CompletionError> {
    client
        .complete(CompletionRequest {
            instruction: QUIZ_INSTRUCTION,
            content: transcript,
            max_tokens: QUIZ_MAX_TOKENS,
        })
        .await
}
