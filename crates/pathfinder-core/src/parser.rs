//! TOML quiz and career catalog parser.
//!
//! Loads quiz definitions from TOML files and directories, validates them,
//! and loads the career catalog browsed after an assessment.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Question, QuestionKind, Quiz, Section};
use crate::recommendations::{Catalog, Recommendation};

/// Intermediate TOML structure for parsing quiz files.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    sections: Vec<TomlSection>,
}

#[derive(Debug, Deserialize)]
struct TomlQuizHeader {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlSection {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: u32,
    text: String,
    #[serde(rename = "type", default = "default_kind")]
    kind: String,
    #[serde(default)]
    options: Vec<String>,
}

fn default_kind() -> String {
    "multiple-choice".to_string()
}

fn build_kind(question_id: u32, kind: &str, options: Vec<String>) -> Result<QuestionKind> {
    match kind.to_lowercase().as_str() {
        "multiple-choice" | "multiple_choice" | "choice" => {
            Ok(QuestionKind::MultipleChoice { options })
        }
        other => anyhow::bail!("question {question_id}: unknown question type '{other}'"),
    }
}

/// Parse a single TOML file into a `Quiz`.
pub fn parse_quiz(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_quiz_str(&content, path)
}

/// Parse a TOML string into a `Quiz` (useful for testing).
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Quiz> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let sections = parsed
        .sections
        .into_iter()
        .map(|s| {
            let questions = s
                .questions
                .into_iter()
                .map(|q| {
                    Ok(Question {
                        id: q.id,
                        kind: build_kind(q.id, &q.kind, q.options)?,
                        text: q.text,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(Section {
                id: s.id,
                title: s.title,
                description: s.description,
                questions,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Quiz {
        id: parsed.quiz.id,
        title: parsed.quiz.title,
        description: parsed.quiz.description,
        sections,
    })
}

/// Recursively load all `.toml` quiz files from a directory.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<Quiz>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            quizzes.extend(load_quiz_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_quiz(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(quizzes)
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<u32>,
    /// Warning message.
    pub message: String,
}

/// Validate a quiz for common authoring issues.
///
/// Anything reported here that would also make `QuizTracker::new` fail is
/// phrased as such, so `validate` output explains why a quiz won't start.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if quiz.sections.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "quiz has no sections".into(),
        });
    }

    let mut seen_sections = HashSet::new();
    for section in &quiz.sections {
        if !seen_sections.insert(&section.id) {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("duplicate section ID: {}", section.id),
            });
        }
        if section.questions.is_empty() {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("section '{}' has no questions", section.id),
            });
        }
    }

    let mut seen_ids = HashSet::new();
    for question in quiz.questions() {
        if !seen_ids.insert(question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id),
                message: format!("duplicate question ID: {}", question.id),
            });
        }
    }

    for question in quiz.questions() {
        if question.text.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id),
                message: "question text is empty".into(),
            });
        }

        let options = question.options();
        match options.len() {
            0 => warnings.push(ValidationWarning {
                question_id: Some(question.id),
                message: "question has no options".into(),
            }),
            1 => warnings.push(ValidationWarning {
                question_id: Some(question.id),
                message: "question has only one option".into(),
            }),
            _ => {}
        }

        let mut seen_options = HashSet::new();
        for option in options {
            if !seen_options.insert(option.as_str()) {
                warnings.push(ValidationWarning {
                    question_id: Some(question.id),
                    message: format!("duplicate option: {option}"),
                });
            }
        }
    }

    warnings
}

#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    #[serde(default)]
    careers: Vec<Recommendation>,
}

/// Parse a career catalog file.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a career catalog from a TOML string.
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    for career in &parsed.careers {
        anyhow::ensure!(
            career.confidence <= 100,
            "career {} ({}): confidence {} exceeds 100",
            career.id,
            career.title,
            career.confidence
        );
    }

    Ok(Catalog::new(parsed.careers))
}
