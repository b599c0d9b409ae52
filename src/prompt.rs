//! Prompt construction for content generation.
//!
//! The prompt asks for an exact word count, but that is only an instruction to
//! the model. Nothing downstream truncates, pads, or checks the length.

use crate::content::{Format, GenerationRequest, Tone, WordCount};

/// Builds the instruction sent to the text provider.
///
/// Pure and deterministic: identical inputs always produce the same string.
/// The caller is responsible for rejecting an empty topic first.
pub fn build_prompt(topic: &str, word_count: WordCount, tone: Tone, format: Format) -> String {
    format!(
        "Create a highly engaging, {tone}-toned {format} about \"{topic}\" that's EXACTLY {words} words long. \
This is very important - the final output MUST be {words} words, no more, no less. \
Please follow these guidelines:

1. Write in a {tone} tone while maintaining readability
2. Structure the content appropriately for a {format} format
3. Include relevant LSI keywords and semantic variations
4. Break content into logical sections with proper transitions
5. Use personal pronouns (I, we, you) and active voice where appropriate
6. Add real-world examples and specific details
7. Incorporate rhetorical questions and dialogue-like elements
8. Vary paragraph lengths and writing rhythm
9. Add emotional triggers and personal insights
10. Maintain proper keyword density without stuffing
11. Ensure the final word count is exactly {words} words

Separate paragraphs with a blank line. \
Make it feel like it was written by a human expert in the field, \
and remember to make it exactly {words} words long.",
        tone = tone.as_str(),
        format = format.as_str(),
        topic = topic,
        words = word_count.get(),
    )
}

/// Convenience wrapper over [`build_prompt`] for a whole request.
pub fn build_request_prompt(request: &GenerationRequest) -> String {
    build_prompt(
        &request.topic,
        request.word_count,
        request.tone,
        request.format,
    )
}
