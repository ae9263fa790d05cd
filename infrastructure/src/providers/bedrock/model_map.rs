//! Bedrock model ID mapping
//!
//! Maps the display names used in episode configs to Bedrock model
//! identifiers, with an optional cross-region inference prefix.

/// Display name → Bedrock base model id
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("Claude 3 Sonnet", "anthropic.claude-3-sonnet-20240229-v1:0"),
    ("Claude 3 Haiku", "anthropic.claude-3-haiku-20240307-v1:0"),
    ("Claude 3.5 Sonnet", "anthropic.claude-3-5-sonnet-20240620-v1:0"),
    ("Command-R", "cohere.command-r-v1:0"),
    ("Command-R Plus", "cohere.command-r-plus-v1:0"),
    ("LLaMA-3-8B-Instruct", "meta.llama3-8b-instruct-v1:0"),
    ("LLaMA-3-70B-Instruct", "meta.llama3-70b-instruct-v1:0"),
    ("Mistral-7B-Instruct", "mistral.mistral-7b-instruct-v0:2"),
    ("Mixtral-8x7B-Instruct", "mistral.mixtral-8x7b-instruct-v0:1"),
    ("Mistral Large", "mistral.mistral-large-2402-v1:0"),
    ("Mistral Small", "mistral.mistral-small-2402-v1:0"),
];

/// Vendor prefixes of raw Bedrock model ids
const VENDORS: &[&str] = &["anthropic.", "cohere.", "meta.", "mistral.", "amazon.", "ai21."];

/// Whether Converse accepts a system block for this model.
///
/// The small Mistral instruct models reject it; their preamble is folded
/// into the first user turn instead.
pub fn supports_system_prompt(model_id: &str) -> bool {
    let base = strip_region_prefix(model_id);
    !(base.starts_with("mistral.mistral-7b-instruct")
        || base.starts_with("mistral.mixtral-8x7b-instruct"))
}

/// Resolve a configured model name to a Bedrock model id.
///
/// - Display names map through the table above.
/// - Raw ids (`anthropic.…`, `meta.…`, an `arn:` or an already-prefixed
///   `us.anthropic.…`) are accepted as-is.
/// - When `cross_region` is true, table entries get the inference profile
///   prefix for `region` (`us-east-1` → `us.`).
///
/// Returns `None` for unknown names.
pub fn to_bedrock_model_id(name: &str, cross_region: bool, region: &str) -> Option<String> {
    let name = name.trim();
    if let Some((_, base_id)) = DISPLAY_NAMES.iter().find(|(display, _)| *display == name) {
        return Some(if cross_region {
            format!("{}.{}", inference_profile_prefix(region), base_id)
        } else {
            (*base_id).to_string()
        });
    }
    if name.starts_with("arn:") || VENDORS.iter().any(|v| strip_region_prefix(name).starts_with(v))
    {
        return Some(name.to_string());
    }
    None
}

/// Derive the inference profile region group from an AWS region string.
///
/// Cross-region inference profiles use continent-level prefixes:
/// `us-east-1` → `us`, `eu-west-1` → `eu`, `ap-northeast-1` → `ap`, etc.
fn inference_profile_prefix(region: &str) -> &str {
    match region.split('-').next() {
        Some(prefix @ ("us" | "eu" | "ap" | "me" | "sa" | "ca" | "af")) => prefix,
        _ => "us",
    }
}

fn strip_region_prefix(model_id: &str) -> &str {
    match model_id.split_once('.') {
        Some((prefix, rest)) if prefix.len() == 2 => rest,
        _ => model_id,
    }
}
