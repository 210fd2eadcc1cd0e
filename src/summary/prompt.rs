/// Provider-agnostic summary prompt
use crate::llm::ChatMessage;
use crate::youtube::VideoData;

const SYSTEM_PROMPT: &str =
    "You analyze video content and generate structured JSON summaries. Always respond with valid JSON only.";

/// System and user messages asking for a summary of `video`
pub fn build_messages(video: &VideoData) -> Vec<ChatMessage> {
    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(build_prompt(video))]
}

/// Summary request for `video`, based on the transcript when there is one and the
/// description otherwise
pub fn build_prompt(video: &VideoData) -> String {
    let (source, content) = if video.has_transcript && !video.transcript.is_empty() {
        ("transcript", video.transcript.as_str())
    } else {
        ("description", video.description.as_str())
    };

    let note = if source == "description" {
        "\nNote: Full transcript not available, using video description only.\n"
    } else {
        ""
    };

    format!(
        r#"You are analyzing a podcast/video {source}.

Video Title: {title}
{note}
Based on the {source} below, generate a JSON response with:

1. "title": Use the actual video title: "{title}"
2. "description": A 2-3 sentence engaging description of what this episode covers
3. "keyTakeaways": An array of 5-6 key insights or takeaways from the discussion
4. "topics": An array of 5-8 main topics discussed (short phrases)
5. "highlights": An array of 2-3 notable quotes or interesting moments (brief excerpts)

IMPORTANT:
- Keep responses concise and punchy
- Write in an engaging, professional tone
- Focus on the most valuable insights
- Avoid generic statements
- Return ONLY valid JSON, no markdown code blocks

CONTENT:
{content}"#,
        title = video.title,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(transcript: &str) -> VideoData {
        VideoData {
            video_id: "9WNieaqHx7I".to_string(),
            title: "Yann LeCun leaves Meta".to_string(),
            description: "AI news of the week".to_string(),
            transcript: transcript.to_string(),
            has_transcript: !transcript.is_empty(),
        }
    }

    #[test]
    fn test_prompt_prefers_transcript() {
        let prompt = build_prompt(&video("LeCun is starting a world-model company"));
        assert!(prompt.starts_with("You are analyzing a podcast/video transcript."));
        assert!(prompt.ends_with("CONTENT:\nLeCun is starting a world-model company"));
        assert!(!prompt.contains("Full transcript not available"));
        assert!(!prompt.contains("AI news of the week"));
    }

    #[test]
    fn test_prompt_falls_back_to_description() {
        let prompt = build_prompt(&video(""));
        assert!(prompt.contains("podcast/video description"));
        assert!(prompt.contains("Full transcript not available"));
        assert!(prompt.ends_with("CONTENT:\nAI news of the week"));
    }

    #[test]
    fn test_prompt_requests_shape() {
        let prompt = build_prompt(&video("x"));
        for field in ["\"title\"", "\"description\"", "\"keyTakeaways\"", "\"topics\"", "\"highlights\""] {
            assert!(prompt.contains(field), "missing {}", field);
        }
        assert!(prompt.contains("no markdown code blocks"));
        assert!(prompt.contains("Use the actual video title: \"Yann LeCun leaves Meta\""));
    }

    #[test]
    fn test_messages() {
        let messages = build_messages(&video("x"));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
    }
}
