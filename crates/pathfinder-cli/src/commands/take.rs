//! The `pathfinder take` command.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use pathfinder_core::model::{AnswerPolicy, Quiz};
use pathfinder_core::parser;
use pathfinder_core::tracker::{QuizTracker, TrackerSnapshot};

use super::{recommend, Settings};

pub struct TakeArgs {
    pub quiz: Option<PathBuf>,
    pub resume: Option<PathBuf>,
    pub save: Option<PathBuf>,
    pub permissive: bool,
    pub submit: bool,
    pub goals: String,
    pub token: Option<String>,
    pub timeout: Option<u64>,
}

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Every question answered and `submit` entered.
    Finished,
    /// `q` or end of input.
    Quit,
}

pub async fn execute(settings: &Settings, args: TakeArgs) -> Result<()> {
    let quiz = load_quiz(settings, args.quiz.as_deref())?;
    let policy = if args.permissive {
        AnswerPolicy::Permissive
    } else {
        settings.config.answer_policy
    };

    let mut tracker = match &args.resume {
        Some(path) => {
            let snapshot = load_snapshot(path)?;
            QuizTracker::restore(quiz, policy, snapshot)
                .with_context(|| format!("cannot resume from {}", path.display()))?
        }
        None => QuizTracker::with_policy(quiz, policy)?,
    };
    tracing::debug!(quiz = %tracker.quiz().id, %policy, "starting session");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let end = run_session(
        &mut tracker,
        stdin.lock(),
        &mut stdout,
        args.save.as_deref(),
    )?;

    writeln!(stdout, "\n{}", progress_table(&tracker))?;

    match end {
        SessionEnd::Quit => {
            if args.save.is_none() && !tracker.answers().is_empty() {
                writeln!(stdout, "Answers were not saved. Use --save to keep progress.")?;
            }
            Ok(())
        }
        SessionEnd::Finished if args.submit => {
            let timeout = args
                .timeout
                .map(Duration::from_secs)
                .unwrap_or(settings.client.timeout);
            recommend::send(settings, &tracker, args.goals, args.token, timeout).await
        }
        SessionEnd::Finished => {
            writeln!(
                stdout,
                "Assessment complete. Run again with --submit to request recommendations."
            )?;
            Ok(())
        }
    }
}

/// Drive a quiz from line-oriented input until it is finished or abandoned.
///
/// With `save` set, the snapshot is written on `s`, on `q`, and when the
/// quiz is finished.
pub fn run_session<R: BufRead, W: Write>(
    tracker: &mut QuizTracker,
    input: R,
    out: &mut W,
    save: Option<&Path>,
) -> Result<SessionEnd> {
    render_question(tracker, out)?;
    let mut lines = input.lines();

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next().transpose()? else {
            writeln!(out)?;
            save_if_requested(tracker, save, out)?;
            return Ok(SessionEnd::Quit);
        };
        let line = line.trim();

        match line {
            "" => continue,
            "n" | "next" => {
                let at_end = tracker.is_last();
                match tracker.advance() {
                    Ok(_) if at_end => {
                        writeln!(out, "This is the last question; enter `submit` to finish.")?
                    }
                    Ok(_) => render_question(tracker, out)?,
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
            "p" | "prev" | "previous" => {
                if tracker.is_first() {
                    writeln!(out, "Already at the first question.")?;
                } else {
                    tracker.retreat();
                    render_question(tracker, out)?;
                }
            }
            "s" | "save" => {
                if save.is_none() {
                    writeln!(out, "No save path given; start with --save <file>.")?;
                }
                save_if_requested(tracker, save, out)?;
            }
            "q" | "quit" => {
                save_if_requested(tracker, save, out)?;
                return Ok(SessionEnd::Quit);
            }
            "submit" => {
                if !tracker.is_last() {
                    writeln!(out, "Answer through to the last question before submitting.")?;
                    continue;
                }
                let unanswered = tracker.unanswered();
                if unanswered.is_empty() {
                    save_if_requested(tracker, save, out)?;
                    return Ok(SessionEnd::Finished);
                }
                let ids: Vec<String> = unanswered.iter().map(u32::to_string).collect();
                writeln!(out, "Unanswered questions: {}", ids.join(", "))?;
            }
            "?" | "h" | "help" => write_help(tracker, out)?,
            other => {
                if let Ok(index) = other.parse::<usize>() {
                    match tracker.select_option(index) {
                        Ok(answer) => writeln!(out, "Selected: {answer}")?,
                        Err(e) => writeln!(out, "{e}")?,
                    }
                } else if tracker.policy() == AnswerPolicy::Permissive {
                    let id = tracker.current_question().question.id;
                    tracker.record_answer(id, other)?;
                    writeln!(out, "Recorded: {other}")?;
                } else {
                    writeln!(out, "Unknown input '{other}'.")?;
                    write_help(tracker, out)?;
                }
            }
        }
    }
}

fn render_question<W: Write>(tracker: &QuizTracker, out: &mut W) -> Result<()> {
    let view = tracker.current_question();
    let progress = tracker.progress();

    writeln!(out)?;
    writeln!(
        out,
        "Question {} of {}  [{}% complete]",
        view.number,
        view.total,
        progress.rounded_percent()
    )?;
    writeln!(
        out,
        "{} ({} of {})",
        view.section.title, view.position_in_section, view.section_len
    )?;
    if !view.section.description.is_empty() {
        writeln!(out, "{}", view.section.description)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", view.question.text)?;
    for (i, option) in view.question.options().iter().enumerate() {
        let marker = if view.selected == Some(option.as_str()) {
            '*'
        } else {
            ' '
        };
        writeln!(out, " {marker} {}) {option}", i + 1)?;
    }
    if let Some(selected) = view.selected {
        if !view.question.accepts(selected) {
            writeln!(out, " * {selected}")?;
        }
    }
    Ok(())
}

fn write_help<W: Write>(tracker: &QuizTracker, out: &mut W) -> Result<()> {
    let count = tracker.current_question().question.options().len();
    writeln!(
        out,
        "Enter 1-{count} to choose, n next, p previous, s save, q quit{}.",
        if tracker.is_last() { ", submit to finish" } else { "" }
    )?;
    Ok(())
}

fn save_if_requested<W: Write>(
    tracker: &QuizTracker,
    save: Option<&Path>,
    out: &mut W,
) -> Result<()> {
    if let Some(path) = save {
        save_snapshot(&tracker.snapshot(), path)?;
        writeln!(out, "Progress saved to {}", path.display())?;
    }
    Ok(())
}

/// Per-section completion table.
pub fn progress_table(tracker: &QuizTracker) -> Table {
    let progress = tracker.progress();
    let mut table = Table::new();
    table.set_header(vec!["Section", "Answered", "Progress"]);

    for section in &progress.sections {
        table.add_row(vec![
            Cell::new(&section.title),
            Cell::new(format!("{}/{}", section.answered, section.total)),
            Cell::new(format!("{:.0}%", section.percent)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(format!("{}/{}", progress.answered, progress.total)),
        Cell::new(format!("{}%", progress.rounded_percent())),
    ]);
    table
}

/// The quiz named on the command line, else the configured default.
pub fn load_quiz(settings: &Settings, explicit: Option<&Path>) -> Result<Quiz> {
    let path = explicit
        .or(settings.config.default_quiz.as_deref())
        .context("no quiz given; pass --quiz or set default_quiz in pathfinder.toml")?;
    parser::parse_quiz(path)
}

pub fn load_snapshot(path: &Path) -> Result<TrackerSnapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse snapshot: {}", path.display()))
}

pub fn save_snapshot(snapshot: &TrackerSnapshot, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write snapshot: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "snapshot saved");
    Ok(())
}
