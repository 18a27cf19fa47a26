use std::fmt;
use std::sync::Arc;

use crate::knowledge::KnowledgeBase;

/// The instruction + knowledge text sent as the first message of every completion.
/// Built once at startup; clones share the same allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrompt(Arc<str>);

impl SystemPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SystemPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn build_system_prompt(institution: &str, knowledge: &KnowledgeBase) -> SystemPrompt {
    let prompt = format!(
        r#"You are a friendly and helpful admissions assistant chatbot for {institution}.

Your role is to help students explore academic programs, eligibility criteria, fees, entrance exams, specializations, duration, and career scope across various departments at {institution}.

**RULES:**
1. ONLY answer questions using the university data provided below. Do NOT make up or guess any information.
2. If a student asks something not covered in the data, OR if you cannot understand their message, respond with a friendly reminder of your purpose. For example:
   "I'm the {institution} Admissions Assistant! I can help you with:
   • Academic programs and specializations
   • Eligibility criteria
   • Fee structures
   • Entrance exams
   • Career scope and opportunities
   • Duration of programs
   Try asking something like 'Tell me about B.Tech' or 'What are the MBA fees?'"
3. Keep responses concise, clear, and well-formatted.
4. Use bullet points for lists.
5. Be warm and encouraging, like a real university admissions counselor.
6. If the student greets you, introduce yourself as {institution}'s admissions assistant and suggest what they can ask about.
7. Always frame your responses in the context of {institution}.

**UNIVERSITY DATA:**
{knowledge}
"#,
        knowledge = knowledge.format_for_prompt(),
    );

    SystemPrompt(Arc::from(prompt))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn prompt_embeds_institution_rules_and_formatted_knowledge() {
        let knowledge = KnowledgeBase::from_value(json!({
            "management": {"programs": {"mba": {"name": "MBA", "duration": "2 years"}}}
        }))
        .expect("knowledge should parse");

        let prompt = build_system_prompt("Riverside College", &knowledge);
        let text = prompt.as_str();

        assert!(text.starts_with(
            "You are a friendly and helpful admissions assistant chatbot for Riverside College."
        ));
        assert!(text.contains("ONLY answer questions using the university data"));
        assert!(text.contains("**UNIVERSITY DATA:**\n\n## Department of Management"));
        assert!(text.contains("### MBA\n- Duration: 2 years"));
    }

    #[test]
    fn clones_share_the_same_text() {
        let knowledge = KnowledgeBase::from_value(json!({})).expect("empty knowledge");
        let prompt = build_system_prompt("Riverside College", &knowledge);
        let cloned = prompt.clone();
        assert!(Arc::ptr_eq(&prompt.0, &cloned.0));
    }
}
