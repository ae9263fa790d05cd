//! OpenAI model name mapping
//!
//! Maps the display names used in episode configs to chat-completions model
//! ids. Raw ids are passed through.

/// Display name → model id
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("GPT-4o-mini", "gpt-4o-mini"),
    ("GPT-3.5-turbo", "gpt-3.5-turbo"),
    ("GPT-4o", "gpt-4o-2024-08-06"),
];

/// Resolve a configured model name to an OpenAI model id.
///
/// Display names are matched exactly. Anything that already looks like an
/// OpenAI id (`gpt-*`, `o1*`, `o3*`, `ft:*`) is returned unchanged. Returns
/// `None` for everything else.
pub fn to_openai_model_id(name: &str) -> Option<String> {
    let name = name.trim();
    if let Some((_, id)) = DISPLAY_NAMES.iter().find(|(display, _)| *display == name) {
        return Some((*id).to_string());
    }
    if is_raw_model_id(name) {
        return Some(name.to_string());
    }
    None
}

fn is_raw_model_id(name: &str) -> bool {
    ["gpt-", "o1", "o3", "o4", "ft:"]
        .iter()
        .any(|prefix| name.starts_with(prefix))
}
