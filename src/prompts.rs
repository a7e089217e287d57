// Prompt text and response schema for hashtag generation.

use serde_json::{Value, json};

/// Placeholder replaced by the topic in custom prompt templates.
pub const TOPIC_PLACEHOLDER: &str = "{topic}";

pub fn hashtag_prompt(topic: &str) -> String {
    format!(
        r#"You are a social media marketing expert. For the topic "{topic}", generate a list of relevant hashtags suitable for platforms like Instagram, X (formerly Twitter), and TikTok. Categorize them into four groups: 'popular' (high-volume, broad reach), 'niche' (specific, targeted), 'community' (used by specific online groups), and 'trending' (currently viral or time-sensitive). Return the result as a JSON object with keys for each category, where each key holds an array of 5-7 hashtag strings. Do not include the '#' prefix in the strings."#,
        topic = topic
    )
}

/// Fills a user supplied template. Templates without a placeholder get the
/// topic appended on its own line.
pub fn render_template(template: &str, topic: &str) -> String {
    if template.contains(TOPIC_PLACEHOLDER) {
        template.replace(TOPIC_PLACEHOLDER, topic)
    } else {
        format!("{}\n\nTopic: {}", template.trim_end(), topic)
    }
}

fn string_array(description: &str) -> Value {
    json!({
        "type": "ARRAY",
        "description": description,
        "items": { "type": "STRING" }
    })
}

/// Schema passed as `responseSchema` so the service answers with exactly
/// four string arrays.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "popular": string_array("Popular, high-volume hashtags for broad reach."),
            "niche": string_array("Specific, targeted hashtags for a smaller, more relevant audience."),
            "community": string_array("Hashtags used by specific online communities related to the topic."),
            "trending": string_array("Currently trending or viral hashtags related to the topic. If none, this can be an empty array."),
        },
        "required": ["popular", "niche", "community", "trending"]
    })
}
