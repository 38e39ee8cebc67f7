//! Quiz progression tracker.
//!
//! Holds the cursor into a sectioned quiz and the answers recorded so far.
//! Forward navigation is gated on the current question being answered;
//! progress counts answers regardless of where the cursor is.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::{AnswerPolicy, Cursor, Question, Quiz, Section};

/// Tracks a respondent's position and answers within a single quiz.
#[derive(Debug, Clone)]
pub struct QuizTracker {
    quiz: Quiz,
    policy: AnswerPolicy,
    cursor: Cursor,
    answers: BTreeMap<u32, String>,
}

/// The question at the cursor plus the display data derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestionView<'a> {
    pub question: &'a Question,
    pub section: &'a Section,
    /// 1-based number across the whole quiz.
    pub number: usize,
    /// Total questions in the quiz.
    pub total: usize,
    /// 1-based position within the section ("M" of "M of N").
    pub position_in_section: usize,
    /// Number of questions in the section ("N" of "M of N").
    pub section_len: usize,
    /// The answer recorded for this question, if any.
    pub selected: Option<&'a str>,
}

/// Overall and per-section completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    /// Percentage in `0.0..=100.0`.
    pub percent: f64,
    pub sections: Vec<SectionProgress>,
}

impl Progress {
    /// Percentage rounded to the nearest whole number, for display.
    pub fn rounded_percent(&self) -> u32 {
        self.percent.round() as u32
    }
}

/// Completion of a single section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionProgress {
    pub id: String,
    pub title: String,
    pub answered: usize,
    pub total: usize,
    pub percent: f64,
}

impl SectionProgress {
    pub fn is_complete(&self) -> bool {
        self.answered == self.total
    }
}

/// Saved tracker state, used to resume a quiz later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub quiz_id: String,
    pub cursor: Cursor,
    #[serde(default)]
    pub answers: BTreeMap<u32, String>,
    pub saved_at: DateTime<Utc>,
}

fn percent(answered: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (answered as f64 / total as f64) * 100.0
    }
}

/// Check the structural preconditions of the cursor invariant.
fn check_structure(quiz: &Quiz) -> Result<(), QuizError> {
    if quiz.sections.is_empty() {
        return Err(QuizError::EmptyQuiz);
    }
    let mut seen = HashSet::new();
    for section in &quiz.sections {
        if section.questions.is_empty() {
            return Err(QuizError::EmptySection(section.id.clone()));
        }
        for question in &section.questions {
            if question.options().is_empty() {
                return Err(QuizError::NoOptions(question.id));
            }
            if !seen.insert(question.id) {
                return Err(QuizError::DuplicateQuestionId(question.id));
            }
        }
    }
    Ok(())
}

impl QuizTracker {
    /// Start a quiz at the first question with no answers, validating answers strictly.
    pub fn new(quiz: Quiz) -> Result<Self, QuizError> {
        Self::with_policy(quiz, AnswerPolicy::Strict)
    }

    /// Start a quiz with an explicit answer policy.
    pub fn with_policy(quiz: Quiz, policy: AnswerPolicy) -> Result<Self, QuizError> {
        check_structure(&quiz)?;
        Ok(Self {
            quiz,
            policy,
            cursor: Cursor::default(),
            answers: BTreeMap::new(),
        })
    }

    /// Resume a quiz from a snapshot.
    pub fn restore(
        quiz: Quiz,
        policy: AnswerPolicy,
        snapshot: TrackerSnapshot,
    ) -> Result<Self, QuizError> {
        if snapshot.quiz_id != quiz.id {
            return Err(QuizError::SnapshotMismatch {
                expected: quiz.id.clone(),
                found: snapshot.quiz_id,
            });
        }
        let mut tracker = Self::with_policy(quiz, policy)?;

        let Cursor { section, question } = snapshot.cursor;
        let in_bounds = tracker
            .quiz
            .sections
            .get(section)
            .is_some_and(|s| question < s.questions.len());
        if !in_bounds {
            return Err(QuizError::CursorOutOfBounds { section, question });
        }

        for (id, answer) in snapshot.answers {
            tracker.record_answer(id, answer)?;
        }
        tracker.cursor = snapshot.cursor;
        Ok(tracker)
    }

    /// Capture the current state for saving.
    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            quiz_id: self.quiz.id.clone(),
            cursor: self.cursor,
            answers: self.answers.clone(),
            saved_at: Utc::now(),
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn policy(&self) -> AnswerPolicy {
        self.policy
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// All recorded answers keyed by question id.
    pub fn answers(&self) -> &BTreeMap<u32, String> {
        &self.answers
    }

    pub fn answer_for(&self, question_id: u32) -> Option<&str> {
        self.answers.get(&question_id).map(String::as_str)
    }

    /// Record (or overwrite) the answer to a question.
    pub fn record_answer(
        &mut self,
        question_id: u32,
        option: impl Into<String>,
    ) -> Result<(), QuizError> {
        let option = option.into();
        let question = self
            .quiz
            .question(question_id)
            .ok_or(QuizError::UnknownQuestion(question_id))?;

        if self.policy == AnswerPolicy::Strict && !question.accepts(&option) {
            return Err(QuizError::InvalidAnswerOption {
                question_id,
                option,
            });
        }

        tracing::debug!(question_id, answer = %option, "answer recorded");
        self.answers.insert(question_id, option);
        Ok(())
    }

    /// Answer the current question by its 1-based option number.
    pub fn select_option(&mut self, index: usize) -> Result<&str, QuizError> {
        let question = self.current_section().questions[self.cursor.question].clone();
        let options = question.options();
        let option = index
            .checked_sub(1)
            .and_then(|i| options.get(i))
            .ok_or(QuizError::OptionOutOfRange {
                question_id: question.id,
                index,
                count: options.len(),
            })?;
        self.record_answer(question.id, option.clone())?;
        Ok(self.answers[&question.id].as_str())
    }

    /// Move to the next question.
    ///
    /// Fails with [`QuizError::AnswerRequired`] if the current question is
    /// unanswered. At the last question of the last section this is a
    /// no-op; callers should submit instead.
    pub fn advance(&mut self) -> Result<Cursor, QuizError> {
        let current = self.current_question_ref();
        if !self.answers.contains_key(&current.id) {
            return Err(QuizError::AnswerRequired {
                question_id: current.id,
            });
        }

        let section_len = self.current_section().questions.len();
        if self.cursor.question + 1 < section_len {
            self.cursor.question += 1;
        } else if self.cursor.section + 1 < self.quiz.sections.len() {
            self.cursor.section += 1;
            self.cursor.question = 0;
        }
        tracing::debug!(cursor = %self.cursor, "advanced");
        Ok(self.cursor)
    }

    /// Move to the previous question. No-op at the first question.
    pub fn retreat(&mut self) -> Cursor {
        if self.cursor.question > 0 {
            self.cursor.question -= 1;
        } else if self.cursor.section > 0 {
            self.cursor.section -= 1;
            self.cursor.question = self.current_section().questions.len() - 1;
        }
        tracing::debug!(cursor = %self.cursor, "retreated");
        self.cursor
    }

    /// The question at the cursor with its display data.
    pub fn current_question(&self) -> QuestionView<'_> {
        let section = self.current_section();
        let question = &section.questions[self.cursor.question];
        let before: usize = self.quiz.sections[..self.cursor.section]
            .iter()
            .map(|s| s.questions.len())
            .sum();

        QuestionView {
            question,
            section,
            number: before + self.cursor.question + 1,
            total: self.quiz.total_questions(),
            position_in_section: self.cursor.question + 1,
            section_len: section.questions.len(),
            selected: self.answer_for(question.id),
        }
    }

    /// Overall and per-section completion.
    pub fn progress(&self) -> Progress {
        let sections: Vec<SectionProgress> = self
            .quiz
            .sections
            .iter()
            .map(|s| {
                let answered = s
                    .questions
                    .iter()
                    .filter(|q| self.answers.contains_key(&q.id))
                    .count();
                SectionProgress {
                    id: s.id.clone(),
                    title: s.title.clone(),
                    answered,
                    total: s.questions.len(),
                    percent: percent(answered, s.questions.len()),
                }
            })
            .collect();

        let total = self.quiz.total_questions();
        let answered = self.answers.len();
        Progress {
            answered,
            total,
            percent: percent(answered, total),
            sections,
        }
    }

    pub fn is_first(&self) -> bool {
        self.cursor == Cursor::default()
    }

    pub fn is_last(&self) -> bool {
        self.cursor.section == self.quiz.sections.len() - 1
            && self.cursor.question == self.current_section().questions.len() - 1
    }

    /// Question ids without an answer, in quiz order.
    pub fn unanswered(&self) -> Vec<u32> {
        self.quiz
            .questions()
            .map(|q| q.id)
            .filter(|id| !self.answers.contains_key(id))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.quiz.questions().all(|q| self.answers.contains_key(&q.id))
    }

    fn current_section(&self) -> &Section {
        &self.quiz.sections[self.cursor.section]
    }

    fn current_question_ref(&self) -> &Question {
        &self.current_section().questions[self.cursor.question]
    }
}
