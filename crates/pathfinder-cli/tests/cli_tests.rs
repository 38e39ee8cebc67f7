//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pathfinder(home: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("pathfinder").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env_remove("PATHFINDER_API_BASE_URL")
        .env_remove("PATHFINDER_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn asset(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join(relative)
}

const ALL_FIRST_OPTIONS: &str = "1\nn\n1\nn\n1\nn\n1\nn\n1\nn\n1\nsubmit\n";

#[test]
fn validate_career_assessment() {
    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .arg("validate")
        .arg("--quiz")
        .arg(asset("assessments/career.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Career Assessment Quiz (3 sections, 6 questions)",
        ))
        .stdout(predicate::str::contains("All quizzes valid"));
}

#[test]
fn validate_directory() {
    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .arg("validate")
        .arg("--quiz")
        .arg(asset("assessments"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Career Assessment Quiz"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("thin.toml"),
        r#"
[quiz]
id = "thin"
title = "Thin Quiz"

[[sections]]
id = "only"
title = "Only"

[[sections.questions]]
id = 1
text = "Pick one"
options = ["The only choice"]
"#,
    )
    .unwrap();

    pathfinder(dir.path())
        .arg("validate")
        .arg("--quiz")
        .arg("thin.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] WARNING: question has only one option"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .arg("validate")
        .arg("--quiz")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    pathfinder(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created pathfinder.toml"))
        .stdout(predicate::str::contains("Created assessments/career.toml"))
        .stdout(predicate::str::contains("Created catalogs/careers.toml"));

    assert!(dir.path().join("pathfinder.toml").exists());
    assert!(dir.path().join("assessments/career.toml").exists());
    assert!(dir.path().join("catalogs/careers.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    pathfinder(dir.path()).arg("init").assert().success();

    pathfinder(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn take_uses_defaults_written_by_init() {
    let dir = TempDir::new().unwrap();
    pathfinder(dir.path()).arg("init").assert().success();

    pathfinder(dir.path())
        .arg("take")
        .write_stdin(ALL_FIRST_OPTIONS)
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 of 6  [0% complete]"))
        .stdout(predicate::str::contains("Interests & Passions (1 of 2)"))
        .stdout(predicate::str::contains("Question 6 of 6  [83% complete]"))
        .stdout(predicate::str::contains("6/6"))
        .stdout(predicate::str::contains("Assessment complete"));
}

#[test]
fn take_requires_an_answer_to_advance() {
    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .arg("take")
        .arg("--quiz")
        .arg(asset("assessments/career.toml"))
        .write_stdin("n\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "question 1 must be answered before continuing",
        ))
        .stdout(predicate::str::contains("0/6"));
}

#[test]
fn take_saves_and_resumes() {
    let dir = TempDir::new().unwrap();
    let quiz = asset("assessments/career.toml");

    pathfinder(dir.path())
        .arg("take")
        .arg("--quiz")
        .arg(&quiz)
        .arg("--save")
        .arg("progress.json")
        .write_stdin("3\nn\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress saved to progress.json"));

    let snapshot = std::fs::read_to_string(dir.path().join("progress.json")).unwrap();
    assert!(snapshot.contains("career-assessment"));
    assert!(snapshot.contains("Helping and working with people"));

    pathfinder(dir.path())
        .arg("take")
        .arg("--quiz")
        .arg(&quiz)
        .arg("--resume")
        .arg("progress.json")
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 2 of 6  [17% complete]"));
}

#[test]
fn take_without_quiz_fails() {
    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .arg("take")
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no quiz given"));
}

#[test]
fn recommendations_ranked_with_summary() {
    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .arg("recommendations")
        .arg("--catalog")
        .arg(asset("catalogs/careers.toml"))
        .arg("--shortlist")
        .arg("3")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "5 career matches, top score 92%, average confidence 85%",
        ))
        .stdout(predicate::str::contains("Software Developer"))
        .stdout(predicate::str::contains("Saved careers:"))
        .stdout(predicate::str::contains("UX/UI Designer (85% match)"));
}

#[test]
fn recommendations_filter_by_category() {
    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .arg("recommendations")
        .arg("--catalog")
        .arg(asset("catalogs/careers.toml"))
        .arg("--category")
        .arg("design")
        .assert()
        .success()
        .stdout(predicate::str::contains("UX/UI Designer"))
        .stdout(predicate::str::contains("Data Scientist").not());
}

#[test]
fn recommendations_show_details() {
    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .arg("recommendations")
        .arg("--catalog")
        .arg(asset("catalogs/careers.toml"))
        .arg("--show")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("Data Scientist (88% match, strong)"))
        .stdout(predicate::str::contains("Career path: Data Analyst -> "));
}

#[test]
fn recommendations_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .arg("recommendations")
        .arg("--catalog")
        .arg(asset("catalogs/careers.toml"))
        .arg("--show")
        .arg("42")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no career with id 42"));
}

#[tokio::test(flavor = "multi_thread")]
async fn login_prints_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(serde_json::json!({"email": "ada@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": {"id": 7, "name": "Ada", "email": "ada@example.com"},
            "token": "jwt-abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .arg("--api-base")
        .arg(server.uri())
        .arg("login")
        .arg("--email")
        .arg("ada@example.com")
        .arg("--password")
        .arg("hunter2")
        .assert()
        .success()
        .stdout(predicate::str::contains("jwt-abc"));
}

#[tokio::test(flavor = "multi_thread")]
async fn login_failure_exits_nonzero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"error": "invalid credentials"})),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .env("PATHFINDER_API_BASE_URL", server.uri())
        .arg("login")
        .arg("--email")
        .arg("ada@example.com")
        .arg("--password")
        .arg("wrong")
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 401: invalid credentials"));
}

#[tokio::test(flavor = "multi_thread")]
async fn flag_overrides_env_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("Authorization", "Bearer jwt-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": {"id": 7, "name": "Ada", "email": "ada@example.com"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .env("PATHFINDER_API_BASE_URL", "http://127.0.0.1:9")
        .env("PATHFINDER_TOKEN", "jwt-abc")
        .arg("--api-base")
        .arg(server.uri())
        .arg("me")
        .assert()
        .success()
        .stdout(predicate::str::contains("ada@example.com"));
}

#[test]
fn me_without_token_fails() {
    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .arg("me")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no token given"));
}

#[tokio::test(flavor = "multi_thread")]
async fn take_submits_finished_assessment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai/recommend"))
        .and(body_partial_json(serde_json::json!({
            "goals": "work with data",
            "profile": {"quiz_id": "career-assessment"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "session_id": 12,
            "result": {"recommendation": "Consider data science."}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/analytics/event"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok", "event_id": 1})),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .arg("--api-base")
        .arg(server.uri())
        .arg("take")
        .arg("--quiz")
        .arg(asset("assessments/career.toml"))
        .arg("--submit")
        .arg("--goals")
        .arg("work with data")
        .write_stdin(ALL_FIRST_OPTIONS)
        .assert()
        .success()
        .stdout(predicate::str::contains("Recommendation (session 12"))
        .stdout(predicate::str::contains("Consider data science."));
}

#[tokio::test(flavor = "multi_thread")]
async fn upload_resume_sends_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload_resume"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "upload_id": 3,
            "filename": "cv.txt"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cv.txt"), "ten years of rust").unwrap();

    pathfinder(dir.path())
        .arg("--api-base")
        .arg(server.uri())
        .arg("upload-resume")
        .arg("--file")
        .arg("cv.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"upload_id\": 3"));
}

#[test]
fn event_rejects_non_object_metadata() {
    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .arg("event")
        .arg("quiz_started")
        .arg("--metadata")
        .arg("[1, 2]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--metadata must be a JSON object"));
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Career assessment quiz and guidance client",
        ));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    pathfinder(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pathfinder"));
}
