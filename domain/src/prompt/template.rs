//! Directive prompt templates for the therapeutic dialogue scenario

/// Templates rendered by catalog-driven strategies
pub struct PromptTemplate;

impl PromptTemplate {
    /// Plain therapeutic directive, used when technique injection is off
    pub fn therapy(previous_message: &str, word_limit: usize) -> String {
        format!(
            r#"As a therapist, your role is to create a safe, supportive environment where the
patient feels comfortable expressing their thoughts and feelings. Here is the patient's
response "{previous_message}".
Here are some steps to follow in a therapy session:

1. Begin the therapy session with a warm, welcoming greeting to establish rapport. For example,
a gentle opener like, "What brings you here today?" can encourage openness.
2. During the session, gather relevant information by asking questions that explore
the patient's thoughts, feelings, and behaviors related to their primary concerns. Only ask
one question at a time.
3. Conclude by offering tailored coping strategies, therapeutic recommendations, or
discussing potential treatment options if appropriate, including referrals when needed.
Summarize key insights and set clear next steps to provide structure and continuity.
4. The response should be natural, concise, and not exceed {word_limit} words."#
        )
    }

    /// Persuasion-augmented directive.
    ///
    /// `techniques` is the rendered catalog (see
    /// [`TechniqueCatalog::render_options`](crate::catalog::TechniqueCatalog::render_options)).
    /// The model is asked to answer with `<technique>` and `<response>` tags.
    pub fn therapy_with_techniques(
        previous_message: &str,
        techniques: &str,
        word_limit: usize,
    ) -> String {
        format!(
            r#"As a therapist, your role is to create a safe, supportive environment where the
patient feels comfortable expressing their thoughts and feelings. Follow these steps:

1. First, analyze the patient's previous response "{previous_message}" and determine if persuasion techniques would be helpful:
- Is the patient hesitant to share important details?
- Is the patient showing resistance to therapeutic suggestions?
- Would building more trust and rapport be beneficial?

2. If persuasion techniques would be valuable, select the most appropriate one from these options:
{techniques}

Consider:
- Which technique matches the current therapeutic needs?
- What would help the patient feel most comfortable sharing?
- How can you maintain therapeutic boundaries while using persuasion?

3. Craft your response:
- If using persuasion: Apply the chosen technique naturally while maintaining a therapeutic focus
- If not using persuasion: Respond with standard therapeutic approaches

4. The response should follow the output format below:
<technique>[Name of persuasion technique being used, or "None" if not using persuasion]</technique>
<response>[Your response to the patient]</response>

Remember: Any persuasion techniques should serve the therapeutic goal of helping the patient share and process their experiences safely.
The response should be natural, concise, and not exceed {word_limit} words."#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_template_embeds_message_and_limit() {
        let prompt = PromptTemplate::therapy("I feel stuck.", 80);
        assert!(prompt.contains("\"I feel stuck.\""));
        assert!(prompt.contains("not exceed 80 words"));
        assert!(!prompt.contains("<technique>"));
    }

    #[test]
    fn test_persuasion_template_lists_techniques_and_format() {
        let prompt = PromptTemplate::therapy_with_techniques(
            "",
            "1. Logical Appeal: Using logic.",
            100,
        );
        assert!(prompt.contains("1. Logical Appeal: Using logic."));
        assert!(prompt.contains("<technique>"));
        assert!(prompt.contains("<response>"));
        assert!(prompt.contains("not exceed 100 words"));
    }
}
