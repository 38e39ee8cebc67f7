//! Core data model types for pathfinder.
//!
//! A quiz is an ordered list of sections, each an ordered list of
//! questions. Order is significant: it defines the quiz flow and the
//! display order of options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A complete assessment quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// Unique identifier for this quiz.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Description shown before the first question.
    #[serde(default)]
    pub description: String,
    /// The sections in presentation order.
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Quiz {
    /// Total number of questions across all sections.
    pub fn total_questions(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    /// Iterate over every question in quiz order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }

    /// Find a question by its quiz-wide id.
    pub fn question(&self, id: u32) -> Option<&Question> {
        self.questions().find(|q| q.id == id)
    }

    /// Find the section containing the question with this id.
    pub fn section_of(&self, id: u32) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.questions.iter().any(|q| q.id == id))
    }
}

/// A named, ordered group of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Identifier (e.g. "interests").
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display description.
    #[serde(default)]
    pub description: String,
    /// Questions in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique across the whole quiz.
    pub id: u32,
    /// Prompt text.
    pub text: String,
    /// What kind of answer the question takes.
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    /// Create a multiple-choice question.
    pub fn multiple_choice<S: Into<String>>(
        id: u32,
        text: impl Into<String>,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            kind: QuestionKind::MultipleChoice {
                options: options.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// The selectable options, in display order.
    pub fn options(&self) -> &[String] {
        match &self.kind {
            QuestionKind::MultipleChoice { options } => options,
        }
    }

    /// Whether `answer` is an acceptable answer to this question.
    pub fn accepts(&self, answer: &str) -> bool {
        match &self.kind {
            QuestionKind::MultipleChoice { options } => options.iter().any(|o| o == answer),
        }
    }
}

/// The kind of a question, tagged by `type` in serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    /// Single selection from an ordered list of options.
    MultipleChoice { options: Vec<String> },
}

impl QuestionKind {
    /// The tag used in quiz files.
    pub fn tag(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => "multiple-choice",
        }
    }
}

/// Position of the question currently presented: zero-based section index
/// and zero-based question index within that section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cursor {
    pub section: usize,
    pub question: usize,
}

impl Cursor {
    pub const fn new(section: usize, question: usize) -> Self {
        Self { section, question }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.section, self.question)
    }
}

/// How strictly recorded answers are checked against a question's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerPolicy {
    /// Answers must be one of the question's options.
    #[default]
    Strict,
    /// Any text is stored as given.
    Permissive,
}

impl fmt::Display for AnswerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerPolicy::Strict => write!(f, "strict"),
            AnswerPolicy::Permissive => write!(f, "permissive"),
        }
    }
}

impl FromStr for AnswerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(AnswerPolicy::Strict),
            "permissive" | "lenient" => Ok(AnswerPolicy::Permissive),
            other => Err(format!("unknown answer policy: {other}")),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Three sections of two questions each, ids 1..=6.
    pub fn career_quiz() -> Quiz {
        Quiz {
            id: "career-assessment".into(),
            title: "Career Assessment Quiz".into(),
            description: "Discover your perfect career path".into(),
            sections: vec![
                Section {
                    id: "interests".into(),
                    title: "Interests & Passions".into(),
                    description: "Help us understand what you're passionate about".into(),
                    questions: vec![
                        Question::multiple_choice(
                            1,
                            "Which of these activities do you find most engaging?",
                            [
                                "Solving complex problems and puzzles",
                                "Creating visual designs and artwork",
                                "Helping and working with people",
                            ],
                        ),
                        Question::multiple_choice(
                            2,
                            "What type of work environment appeals to you most?",
                            ["Fast-paced startup environment", "Research laboratory"],
                        ),
                    ],
                },
                Section {
                    id: "personality".into(),
                    title: "Personality Traits".into(),
                    description: "Let's explore your personality and work style".into(),
                    questions: vec![
                        Question::multiple_choice(
                            3,
                            "How do you prefer to work on projects?",
                            ["Independently", "In small collaborative teams"],
                        ),
                        Question::multiple_choice(
                            4,
                            "When facing a challenge, you typically:",
                            ["Research extensively", "Jump in and learn as you go"],
                        ),
                    ],
                },
                Section {
                    id: "skills".into(),
                    title: "Skills & Abilities".into(),
                    description: "Tell us about your current skills and strengths".into(),
                    questions: vec![
                        Question::multiple_choice(
                            5,
                            "Which subject area are you strongest in?",
                            ["Mathematics and Logic", "Arts and Creativity"],
                        ),
                        Question::multiple_choice(
                            6,
                            "What type of thinking comes most naturally to you?",
                            ["Analytical and logical thinking", "Creative thinking"],
                        ),
                    ],
                },
            ],
        }
    }
}
