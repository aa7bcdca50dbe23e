//! Result-collection views: ranking, skill-gap aggregation and CSV export.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::evaluation::{skill_list, EvaluationRecord};

pub const DEFAULT_TOP_SKILL_GAPS: usize = 15;

/// How many résumés lack a given skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillGap {
    pub skill: String,
    pub count: usize,
}

/// Sorts by `final_score`, highest first. Equal scores keep their input order.
pub fn rank(records: &mut [EvaluationRecord]) {
    records.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
}

/// Counts missing-skill tokens across all records' rendered `missing_skills`
/// (lower-cased, comma-split, trimmed). Sorted by count desc, then skill asc.
pub fn skill_gaps(records: &[EvaluationRecord], top: usize) -> Vec<SkillGap> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        for skill in skill_list::parse(&record.missing_skills_rendered()) {
            *counts.entry(skill.to_lowercase()).or_default() += 1;
        }
    }

    let mut gaps: Vec<SkillGap> = counts
        .into_iter()
        .map(|(skill, count)| SkillGap { skill, count })
        .collect();
    gaps.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.skill.cmp(&b.skill)));
    gaps.truncate(top);
    gaps
}

/// One header row plus one row per record.
pub fn export_csv(records: &[EvaluationRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("Failed to write CSV row for {}", record.filename))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::sample_record;

    fn with_missing(name: &str, final_score: f64, missing: &[&str]) -> EvaluationRecord {
        let mut r = sample_record(name, final_score, 50.0);
        r.missing_skills = missing.iter().map(|s| s.to_string()).collect();
        r
    }

    #[test]
    fn test_rank_sorts_descending_and_is_stable() {
        let mut records = vec![
            with_missing("a", 40.0, &[]),
            with_missing("b", 90.0, &[]),
            with_missing("c", 40.0, &[]),
        ];
        rank(&mut records);
        let names: Vec<&str> = records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_skill_gaps_counts_across_records() {
        let records = vec![
            with_missing("a", 40.0, &["aws", "Docker"]),
            with_missing("b", 60.0, &["docker"]),
            with_missing("c", 70.0, &[]),
        ];
        let gaps = skill_gaps(&records, DEFAULT_TOP_SKILL_GAPS);
        assert_eq!(
            gaps,
            vec![
                SkillGap {
                    skill: "docker".into(),
                    count: 2
                },
                SkillGap {
                    skill: "aws".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_skill_gaps_truncates_to_top() {
        let records = vec![with_missing("a", 40.0, &["aws", "git", "sql"])];
        let gaps = skill_gaps(&records, 2);
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].skill, "aws");
        assert_eq!(gaps[1].skill, "git");
    }

    #[test]
    fn test_skill_gaps_empty() {
        assert!(skill_gaps(&[], 15).is_empty());
    }

    #[test]
    fn test_export_csv_header_and_rows() {
        let records = vec![with_missing("cv.pdf", 80.0, &["aws", "docker"])];
        let csv = export_csv(&records).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "filename,jd_index,jd_name,hard_score,semantic_score,final_score,verdict,\
             matched_skills,missing_skills,resume_text"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("cv.pdf,0,pasted_JD,50.0,50.0,80.0,High,python,\"aws, docker\""));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_export_csv_empty_has_no_rows() {
        assert_eq!(export_csv(&[]).unwrap(), "");
    }
}
