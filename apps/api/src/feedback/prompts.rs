// Prompt templates for résumé feedback.

pub const FEEDBACK_SYSTEM: &str = "You are a concise resume coach.";

/// Placeholders: {jd_text}, {resume_text}, {missing_skills}
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"Given the Job Description and Candidate Resume, provide:
1) Up to 3 short, actionable suggestions (each <= 20 words) to make the resume more relevant.
2) A one-line verdict: "Strong fit", "Partial fit", or "Weak fit".

Return JSON like:
{"suggestions":["...","..."], "verdict":"..."}

Job Description:
{jd_text}

Resume:
{resume_text}

Missing skills: {missing_skills}
"#;

pub fn build_feedback_prompt(jd_text: &str, resume_text: &str, missing: &[String]) -> String {
    let missing_skills = if missing.is_empty() {
        "None".to_string()
    } else {
        missing.join(", ")
    };
    fill_template(
        FEEDBACK_PROMPT_TEMPLATE,
        &[
            ("jd_text", jd_text),
            ("resume_text", resume_text),
            ("missing_skills", &missing_skills),
        ],
    )
}

/// Substitutes `{name}` placeholders in a single pass over the template, so braces inside
/// inserted values are never expanded. Unknown `{...}` spans are copied through.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match value {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_fills_all_placeholders() {
        let prompt = build_feedback_prompt("JD BODY", "CV BODY", &["aws".into(), "docker".into()]);
        assert!(prompt.contains("JD BODY"));
        assert!(prompt.contains("CV BODY"));
        assert!(prompt.contains("Missing skills: aws, docker"));
        assert!(!prompt.contains("{jd_text}"));
        assert!(!prompt.contains("{missing_skills}"));
    }

    #[test]
    fn test_placeholders_inside_values_stay_literal() {
        let prompt = build_feedback_prompt(
            "Paste {resume_text} here",
            "I use {missing_skills} and {jd_text}",
            &["aws".into()],
        );
        assert!(prompt.contains("Paste {resume_text} here"));
        assert!(prompt.contains("I use {missing_skills} and {jd_text}"));
        assert!(prompt.contains("Missing skills: aws"));
    }

    #[test]
    fn test_template_keeps_json_example_braces() {
        let prompt = build_feedback_prompt("jd", "cv", &[]);
        assert!(prompt.contains(r#"{"suggestions":["...","..."], "verdict":"..."}"#));
    }

    #[test]
    fn test_prompt_without_missing_skills() {
        let prompt = build_feedback_prompt("jd", "cv", &[]);
        assert!(prompt.contains("Missing skills: None"));
    }
}
