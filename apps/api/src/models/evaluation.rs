use serde::{Deserialize, Serialize};

use crate::scoring::Verdict;

/// One résumé scored against one JD. Built once by the evaluator and never mutated.
///
/// Skill lists are rendered as comma-joined strings when serialized (JSON and CSV alike).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub filename: String,
    pub jd_index: usize,
    pub jd_name: String,
    pub hard_score: f64,
    pub semantic_score: f64,
    pub final_score: f64,
    pub verdict: Verdict,
    #[serde(with = "skill_list")]
    pub matched_skills: Vec<String>,
    #[serde(with = "skill_list")]
    pub missing_skills: Vec<String>,
    pub resume_text: String,
}

impl EvaluationRecord {
    pub fn missing_skills_rendered(&self) -> String {
        skill_list::render(&self.missing_skills)
    }
}

/// Serde adapter: `Vec<String>` <-> `"a, b, c"`.
pub mod skill_list {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn render(skills: &[String]) -> String {
        skills.join(", ")
    }

    /// Splits on commas, trims, drops blanks. Case is preserved.
    pub fn parse(rendered: &str) -> Vec<String> {
        rendered
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn serialize<S: Serializer>(skills: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&render(skills))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let rendered = String::deserialize(deserializer)?;
        Ok(parse(&rendered))
    }
}

#[cfg(test)]
pub(crate) fn sample_record(filename: &str, final_score: f64, semantic_score: f64) -> EvaluationRecord {
    EvaluationRecord {
        filename: filename.to_string(),
        jd_index: 0,
        jd_name: "pasted_JD".to_string(),
        hard_score: 50.0,
        semantic_score,
        final_score,
        verdict: Verdict::from_score(final_score),
        matched_skills: vec!["python".to_string()],
        missing_skills: vec!["aws".to_string()],
        resume_text: "Python developer".to_string(),
    }
}
