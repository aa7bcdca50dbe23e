//! Heuristic résumé section splitter used for candidate inspection.

use serde::Serialize;

use crate::scoring::normalizer::clean_text;

/// Header keywords that open a section, in match-priority order.
pub const SECTION_HEADERS: &[&str] = &[
    "skills",
    "experience",
    "education",
    "projects",
    "certifications",
    "achievements",
    "internship",
];

/// Lines with this many words or more are never treated as headers.
const MAX_HEADER_WORDS: usize = 6;

const DEFAULT_SECTION: &str = "summary";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeSection {
    pub name: String,
    pub body: String,
}

/// Splits a résumé into named sections.
///
/// Text before the first header lands in `summary`. A header seen twice appends to the
/// existing section instead of opening a new one.
pub fn extract_sections(text: &str) -> Vec<ResumeSection> {
    let cleaned = clean_text(text);
    let mut sections: Vec<(&'static str, Vec<&str>)> = vec![(DEFAULT_SECTION, Vec::new())];
    let mut current = 0;

    for line in cleaned.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match header_of(line) {
            Some(header) => {
                current = match sections.iter().position(|(name, _)| *name == header) {
                    Some(i) => i,
                    None => {
                        sections.push((header, Vec::new()));
                        sections.len() - 1
                    }
                };
            }
            None => sections[current].1.push(line),
        }
    }

    sections
        .into_iter()
        .map(|(name, lines)| ResumeSection {
            name: name.to_string(),
            body: lines.join("\n"),
        })
        .collect()
}

fn header_of(line: &str) -> Option<&'static str> {
    if line.split_whitespace().count() >= MAX_HEADER_WORDS {
        return None;
    }
    let lowered = line.to_lowercase();
    SECTION_HEADERS
        .iter()
        .copied()
        .find(|header| lowered.contains(header))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\nBackend engineer\n\nSKILLS\nPython, SQL, Docker\n\
        Work Experience\nAcme Corp 2020-2024\nBuilt data pipelines\n\
        Education\nBSc Computer Science";

    fn section<'a>(sections: &'a [ResumeSection], name: &str) -> &'a ResumeSection {
        sections.iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn test_splits_into_sections_in_order() {
        let sections = extract_sections(RESUME);
        let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["summary", "skills", "experience", "education"]);
        assert_eq!(section(&sections, "summary").body, "Jane Doe\nBackend engineer");
        assert_eq!(section(&sections, "skills").body, "Python, SQL, Docker");
        assert_eq!(
            section(&sections, "experience").body,
            "Acme Corp 2020-2024\nBuilt data pipelines"
        );
    }

    #[test]
    fn test_long_line_mentioning_header_is_content() {
        let sections = extract_sections("I gained experience building large scale systems at scale");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "summary");
    }

    #[test]
    fn test_repeated_header_appends() {
        let sections = extract_sections("Projects\nA\nSkills\nRust\nProjects\nB");
        assert_eq!(section(&sections, "projects").body, "A\nB");
    }

    #[test]
    fn test_empty_text_has_empty_summary() {
        let sections = extract_sections("");
        assert_eq!(
            sections,
            vec![ResumeSection {
                name: "summary".to_string(),
                body: String::new()
            }]
        );
    }
}
