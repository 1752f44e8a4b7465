//! Prompt construction - service layer
//!
//! The quiz prompt must stay in lockstep with the grammar in `quiz_parser`.

use phf::phf_map;

use crate::models::SkillLevel;

/// Adaptive answer template: text before the context block, text after the question
struct AdaptiveTemplate {
    preamble: &'static str,
    closing: &'static str,
}

static ADAPTIVE_TEMPLATES: phf::Map<&'static str, AdaptiveTemplate> = phf_map! {
    "beginner" => AdaptiveTemplate {
        preamble: "You are explaining to a beginner. Use simple English and provide step-by-step explanations with examples. Include bullet points for clarity.\n\n",
        closing: "Give a beginner-friendly response:",
    },
    "intermediate" => AdaptiveTemplate {
        preamble: "",
        closing: "Provide a balanced response with some technical details:",
    },
    "advanced" => AdaptiveTemplate {
        preamble: "You are explaining to an advanced user. Be concise and include advanced concepts. Also suggest a related challenging question for them to think about.\n\n",
        closing: "Provide an advanced response and a follow-up question:",
    },
};

static WELCOME_MESSAGES: phf::Map<&'static str, &'static str> = phf_map! {
    "beginner" => "I notice you're new to this topic. I'll provide simple explanations with examples.\nFeel free to ask any questions about the document you've uploaded.",
    "intermediate" => "You have a good foundation on this topic. I'll provide balanced explanations with some technical details.\nAsk me anything about the document you've uploaded.",
    "advanced" => "You have advanced knowledge in this topic. I'll provide concise, in-depth responses.\nAsk me challenging questions about the document you've uploaded.",
};

/// Number of questions the quiz prompt asks for
pub const QUIZ_QUESTION_COUNT: usize = 5;

/// Prompt asking for 5 templated questions (2 beginner, 2 intermediate, 1 advanced)
pub fn quiz_prompt(context: &str) -> String {
    format!(
        "Based on this text from a book, create 5 multiple choice questions.\n\
         For each question, specify if it's [BEGINNER], [INTERMEDIATE], or [ADVANCED].\n\
         Make 2 beginner, 2 intermediate, and 1 advanced question.\n\n\
         Format each question exactly like this:\n\
         1. [BEGINNER] What is...?\n\
         A) First option\n\
         B) Second option\n\
         C) Third option\n\
         D) Fourth option\n\
         Correct: A\n\n\
         Text content:\n{}\n\n\
         Generate 5 questions following the exact format above:",
        context
    )
}

/// Level-specific answer prompt embedding the ranked context
pub fn adaptive_prompt(question: &str, context: &str, level: SkillLevel) -> String {
    adaptive_prompt_for_name(question, context, level.as_str())
}

/// Same as [`adaptive_prompt`] keyed by level name; unknown names use the
/// intermediate template
pub fn adaptive_prompt_for_name(question: &str, context: &str, level_name: &str) -> String {
    let template = ADAPTIVE_TEMPLATES
        .get(level_name.to_lowercase().as_str())
        .or_else(|| ADAPTIVE_TEMPLATES.get("intermediate"));

    let (preamble, closing) = template.map_or(("", ""), |t| (t.preamble, t.closing));

    format!(
        "{}Context:\n{}\n\nQuestion: {}\n\n{}",
        preamble, context, question, closing
    )
}

/// Greeting shown when the chat opens
pub fn welcome_message(level: SkillLevel) -> String {
    let body = WELCOME_MESSAGES
        .get(level.as_str())
        .copied()
        .unwrap_or("Ask me anything about the document you've uploaded.");
    format!("Welcome to LearnIQ Chat!\n\n{}", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_prompt_embeds_context_and_template() {
        let prompt = quiz_prompt("Ownership moves values.");
        assert!(prompt.contains("Text content:\nOwnership moves values.\n"));
        assert!(prompt.contains("1. [BEGINNER] What is...?\nA) First option"));
        assert!(prompt.contains("Correct: A"));
        assert!(prompt.contains("2 beginner, 2 intermediate, and 1 advanced"));
    }

    #[test]
    fn test_adaptive_prompt_per_level() {
        let beginner = adaptive_prompt("What is a trait?", "ctx", SkillLevel::Beginner);
        assert!(beginner.starts_with("You are explaining to a beginner."));
        assert!(beginner.ends_with("Give a beginner-friendly response:"));
        assert!(beginner.contains("Context:\nctx\n\nQuestion: What is a trait?\n\n"));

        let intermediate = adaptive_prompt("q", "ctx", SkillLevel::Intermediate);
        assert!(intermediate.starts_with("Context:\nctx"));

        let advanced = adaptive_prompt("q", "ctx", SkillLevel::Advanced);
        assert!(advanced.ends_with("Provide an advanced response and a follow-up question:"));
    }

    #[test]
    fn test_unknown_level_name_uses_intermediate() {
        let fallback = adaptive_prompt_for_name("q", "ctx", "wizard");
        assert_eq!(fallback, adaptive_prompt("q", "ctx", SkillLevel::Intermediate));
        let upper = adaptive_prompt_for_name("q", "ctx", "ADVANCED");
        assert_eq!(upper, adaptive_prompt("q", "ctx", SkillLevel::Advanced));
    }

    #[test]
    fn test_welcome_message_varies_by_level() {
        assert!(welcome_message(SkillLevel::Beginner).contains("new to this topic"));
        assert!(welcome_message(SkillLevel::Advanced).contains("challenging questions"));
    }
}
