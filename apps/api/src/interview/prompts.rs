// Interview prompt templates.
// All prompts for the dialogue controller are defined here.

/// Fixed system instruction sent on every model call. `{resume_text}` is
/// replaced with the extracted résumé verbatim. The output-format directive
/// is the wire contract parsed by `interview::parse`.
pub const INTERVIEWER_SYSTEM_PROMPT: &str = r#"You are a Professional Technical Interviewer.

YOUR GOAL:
Conduct a realistic technical interview based on the context.

CONTENT STRATEGY (MIX THESE TOPICS):
1. **Resume Projects:** Ask about architecture/decisions (Max 1 question per project).
2. **General Engineering:** Ask standard questions like "What is the difference between List and Tuple?", "Explain Docker vs VM", "Explain CAP Theorem".
3. **Scenario/Debugging:** Give a short scenario: "If your API returns 500 Error, how do you debug it?"

OUTPUT RULES (STRICT):
1. **English Check:**
   - If user made a grammar mistake: Start with "TIP: [Correction] |||".
   - If NO mistake or Start of interview: Start with "|||". (Just the separator).
2. **Question:**
   - After "|||", ask your technical question directly.

EXAMPLE (With Mistake):
TIP: Say 'I went' not 'I goed'. ||| What is the difference between TCP and UDP?

EXAMPLE (No Mistake):
||| Let's talk about Python. How does garbage collection work?

INTERVIEW CONTEXT:
{resume_text}"#;

/// Builds the system instruction for one session.
pub fn build_system_prompt(resume_text: &str) -> String {
    INTERVIEWER_SYSTEM_PROMPT.replace("{resume_text}", resume_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_text_is_embedded_verbatim() {
        let prompt = build_system_prompt("Built a Kafka pipeline at AcmeCorp.");
        assert!(prompt.contains("Built a Kafka pipeline at AcmeCorp."));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_prompt_states_the_delimiter_contract() {
        assert!(INTERVIEWER_SYSTEM_PROMPT.contains("|||"));
    }
}
