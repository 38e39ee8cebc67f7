//! The `pathfinder recommend` command, and the submission step shared with
//! `take --submit`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use pathfinder_core::submit::{submit_assessment, SubmitOptions, Submission};
use pathfinder_core::tracker::QuizTracker;

use super::take::{load_quiz, load_snapshot};
use super::{cancel_on_ctrl_c, Settings};

pub async fn execute(
    settings: &Settings,
    quiz: Option<PathBuf>,
    snapshot: PathBuf,
    goals: String,
    token: Option<String>,
) -> Result<()> {
    let quiz = load_quiz(settings, quiz.as_deref())?;
    let saved = load_snapshot(&snapshot)?;
    let tracker = QuizTracker::restore(quiz, settings.config.answer_policy, saved)
        .with_context(|| format!("cannot use snapshot {}", snapshot.display()))?;

    send(settings, &tracker, goals, token, settings.client.timeout).await
}

/// Submit a finished tracker and print the recommendation.
pub async fn send(
    settings: &Settings,
    tracker: &QuizTracker,
    goals: String,
    token: Option<String>,
    timeout: Duration,
) -> Result<()> {
    let client = settings.http_client()?;
    let options = SubmitOptions {
        goals,
        token: settings.token(token),
        timeout,
        cancel: Some(cancel_on_ctrl_c()),
        ..SubmitOptions::default()
    };

    eprintln!("Requesting recommendations from {}...", client.base_url());
    let submission = submit_assessment(&client, tracker, &options)
        .await
        .context("submission failed")?;
    print_submission(&submission);
    Ok(())
}

fn print_submission(submission: &Submission) {
    let result = &submission.response.result;
    println!(
        "Recommendation (session {}, submission {}):",
        submission.response.session_id, submission.id
    );
    println!();
    println!("{}", result.text());

    if let Some(reason) = result.api_error.as_deref().or(result.error.as_deref()) {
        println!();
        println!("Note: the recommender fell back to a default answer ({reason}).");
    }
}
