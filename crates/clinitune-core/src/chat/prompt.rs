//! Prompt construction for the wellness assistant.

use clinitune_types::chat::ChatMessage;

/// Render messages as `sender: text` lines.
pub fn transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(ChatMessage::transcript_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The last `n` messages of a transcript.
pub fn tail(messages: &[ChatMessage], n: usize) -> &[ChatMessage] {
    &messages[messages.len().saturating_sub(n)..]
}

/// Prompt asking for a short supportive reply to the patient's message.
///
/// `context` holds the messages that preceded `message`.
pub fn reply_prompt(context: &[ChatMessage], message: &str) -> String {
    let recent = transcript(context);
    let context_block = if recent.is_empty() {
        String::new()
    } else {
        format!("Recent context:\n{recent}\n")
    };

    format!(
        "You are a supportive AI wellness assistant for therapy patients.\n\
         \n\
         Be empathetic and supportive. Keep responses to 2-3 sentences. Never give medical advice.\n\
         \n\
         {context_block}\n\
         Patient: {message}\n\
         \n\
         AI Response:"
    )
}

/// Prompt asking for a JSON clinical analysis of the window.
pub fn analysis_prompt(window: &[ChatMessage]) -> String {
    let recent = transcript(window);
    format!(
        r#"Analyze these patient messages for clinical insights and emotional state. Pay special attention to concerning language:

{recent}

Provide a JSON response with:
1. "summary": Brief clinical summary for therapist
2. "alertLevel": "none", "low", "medium", or "high"
3. "concerns": Array of specific concerns found
4. "emotionalState": Current emotional assessment

CRITICAL DETECTION PRIORITIES:
- HIGH RISK: Any mention of death, dying, suicide, self-harm, "no point living", hopelessness, worthlessness
- MEDIUM RISK: Depression symptoms, severe anxiety, panic, isolation, desperation
- LOW RISK: Stress, sadness, worry, mild emotional distress

Look for variations and misspellings like "dieing" (dying), "cant go on", etc.

If ANY concerning language is detected, do NOT classify as "neutral" - assign appropriate risk level.

Respond only with valid JSON:"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinitune_types::chat::Sender;
    use uuid::Uuid;

    fn msgs(texts: &[(Sender, &str)]) -> Vec<ChatMessage> {
        let session = Uuid::now_v7();
        texts
            .iter()
            .map(|(s, t)| ChatMessage::new(session, *s, *t))
            .collect()
    }

    #[test]
    fn test_reply_prompt_without_context() {
        let prompt = reply_prompt(&[], "hello");
        assert!(!prompt.contains("Recent context"));
        assert!(prompt.contains("Patient: hello"));
        assert!(prompt.ends_with("AI Response:"));
    }

    #[test]
    fn test_reply_prompt_includes_context_lines() {
        let history = msgs(&[(Sender::Patient, "hi"), (Sender::Ai, "Hello there")]);
        let prompt = reply_prompt(&history, "I slept badly");
        assert!(prompt.contains("Recent context:\npatient: hi\nai: Hello there\n"));
        assert!(prompt.contains("Patient: I slept badly"));
    }

    #[test]
    fn test_tail_shorter_than_window() {
        let history = msgs(&[(Sender::Patient, "one")]);
        assert_eq!(tail(&history, 3).len(), 1);
        assert!(tail(&[], 2).is_empty());
    }

    #[test]
    fn test_analysis_prompt_embeds_window() {
        let window = msgs(&[(Sender::Patient, "I feel numb")]);
        let prompt = analysis_prompt(&window);
        assert!(prompt.contains("patient: I feel numb"));
        assert!(prompt.trim_end().ends_with("Respond only with valid JSON:"));
    }
}
