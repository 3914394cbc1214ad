//! Prompts for chunk summarization and transcript composition.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tweaking the narration style or the
//!    summary depth requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without
//!    spinning up a real model, making prompt regressions easy to catch.

use crate::config::Complexity;

/// Base prompt for summarizing a single chunk of extracted paper text.
///
/// The target is 3–4 sentences per chunk; the complexity addendum scales the
/// register, never the factual content.
pub const CHUNK_SUMMARY_PROMPT: &str = r#"You are an expert research communicator with mastery across scientific, technical, and scholarly domains.
Summarize the following passage in 3-4 sentences, ensuring you capture:

- The key concepts or theoretical ideas being introduced
- Any important methods, formulas, models, arguments, or analytical approaches
- Critical data, claims, or findings
- The role this passage plays in the overall structure or argument of the paper

Maintain precision and preserve nuanced details.
Make the summary clear and engaging, but do not simplify away essential complexity."#;

/// Prompt for composing the podcast transcript from the ordered summaries.
///
/// The narrative arc is fixed (problem, motivation, method, experiments,
/// findings, limitations, future directions) and the output must carry no
/// list structure or headers — it is read aloud verbatim.
pub const TRANSCRIPT_PROMPT: &str = r#"Transform the following summary into a podcast-style narrative that feels natural, flowing, and genuinely human.
Write it as if a knowledgeable expert is speaking to an enthusiastic listener—conversational, confident, and easy to follow, without sounding scripted or segmented.

Requirements:
- Preserve all meaningful technical details, concepts, methods, equations, data, and results
- Explain ideas smoothly using natural transitions, helpful analogies, and intuitive explanations
- Maintain a narrative arc that organically covers:
    • the problem or question the paper addresses
    • why this problem matters
    • how the authors approached it (step-by-step, but not explicitly numbered)
    • what experiments or analyses were done
    • what was discovered (results, data, insights)
    • what limitations or uncertainties remain
    • what future directions or implications emerge

Guidelines:
- Do NOT use list structures, numbered points, headers, or explicit section labels
- Avoid phrases like "first," "second," "in conclusion," "this section argues," etc.
- Make the flow feel like continuous storytelling rather than a report
- Tone should be smooth, engaging, and conversational—like a well-produced research explainer podcast
- Aim for 8-15 minutes of spoken content depending on the depth, maintaining clarity without shortening essential details"#;

/// Instruction appended to the summary prompt for a given complexity level.
pub fn complexity_instruction(level: Complexity) -> &'static str {
    match level {
        Complexity::Beginner => {
            "Write for a curious listener with no background in this field: \
             prefer plain language, define every technical term the moment it appears, \
             and lean on everyday analogies."
        }
        Complexity::Intermediate => {
            "Write for a listener with general technical literacy: \
             use standard technical vocabulary, adding background only where the \
             passage would otherwise be opaque."
        }
        Complexity::Advanced => {
            "Write for a specialist listener: keep the full technical depth, \
             including method names, quantitative results, and stated assumptions."
        }
    }
}

/// Build the full summarization prompt for one chunk.
pub fn chunk_summary_prompt(level: Complexity, chunk: &str) -> String {
    format!(
        "{CHUNK_SUMMARY_PROMPT}\n\n{}\n\nInput Text Chunk:\n{chunk}",
        complexity_instruction(level)
    )
}

/// Build the full transcript-composition prompt from the ordered summaries.
///
/// The summaries are embedded as a JSON array, preserving their order and
/// making chunk boundaries unambiguous to the model.
pub fn transcript_prompt(summaries: &[String]) -> String {
    let encoded = serde_json::to_string(summaries).unwrap_or_else(|_| "[]".to_string());
    format!("{TRANSCRIPT_PROMPT}\n\nChunk-based summaries of the paper:\n{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prompt_embeds_chunk_and_level() {
        let p = chunk_summary_prompt(Complexity::Beginner, "Transformers use attention.");
        assert!(p.contains("3-4 sentences"));
        assert!(p.contains("plain language"));
        assert!(p.ends_with("Transformers use attention."));
    }

    #[test]
    fn each_complexity_level_produces_a_distinct_prompt() {
        let chunk = "same chunk";
        let prompts: Vec<String> = Complexity::ALL
            .iter()
            .map(|l| chunk_summary_prompt(*l, chunk))
            .collect();
        assert_ne!(prompts[0], prompts[1]);
        assert_ne!(prompts[1], prompts[2]);
    }

    #[test]
    fn transcript_prompt_forbids_structure_and_keeps_order() {
        let summaries = vec!["alpha summary".to_string(), "beta summary".to_string()];
        let p = transcript_prompt(&summaries);
        assert!(p.contains("Do NOT use list structures"));
        assert!(p.contains("8-15 minutes"));
        let alpha = p.find("alpha summary").unwrap();
        let beta = p.find("beta summary").unwrap();
        assert!(alpha < beta, "summary order must be preserved in the prompt");
    }

    #[test]
    fn transcript_prompt_encodes_summaries_as_json() {
        let summaries = vec!["a \"quoted\" claim".to_string()];
        let p = transcript_prompt(&summaries);
        assert!(p.contains(r#"["a \"quoted\" claim"]"#));
    }
}
