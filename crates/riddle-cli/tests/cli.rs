//! CLI command integration tests.
//! Each test clears RIDDLE_QUIZ so the built-in quiz is used unless a
//! document is passed explicitly.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn riddle_cmd() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("riddle").unwrap();
    cmd.env_remove("RIDDLE_QUIZ");
    cmd
}

const SMALL_QUIZ: &str = r#"
title = "Small"

[options]
retry_hint = "clear"

[[question]]
question = "What has keys but no locks?"
answer = "piano"
hint = "It makes music"
image = "piano"

[[question]]
question = "What gets wetter the more it dries?"
answer = "towel"
hint = "Bathroom"
image = "towel"
bonus_image = "gift"
"#;

fn write_quiz(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("quiz.toml");
    std::fs::write(&path, SMALL_QUIZ).unwrap();
    path
}

#[test]
fn check_builtin() {
    riddle_cmd()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("questions:  4"))
        .stdout(predicate::str::contains("bonus:      1"))
        .stdout(predicate::str::contains("threshold=2.7g debounce=500ms reset=3000ms"));
}

#[test]
fn check_custom_document() {
    let dir = TempDir::new().unwrap();
    let quiz = write_quiz(&dir);
    riddle_cmd()
        .args(["check", "--quiz"])
        .arg(&quiz)
        .assert()
        .success()
        .stdout(predicate::str::contains("title:      Small"))
        .stdout(predicate::str::contains("questions:  2"))
        .stdout(predicate::str::contains("retry hint: Clear"));
}

#[test]
fn check_env_document() {
    let dir = TempDir::new().unwrap();
    let quiz = write_quiz(&dir);
    riddle_cmd()
        .arg("check")
        .env("RIDDLE_QUIZ", &quiz)
        .assert()
        .success()
        .stdout(predicate::str::contains("questions:  2"));
}

#[test]
fn check_rejects_empty_document() {
    let dir = TempDir::new().unwrap();
    let quiz = dir.path().join("empty.toml");
    std::fs::write(&quiz, "title = \"nothing\"\n").unwrap();
    riddle_cmd()
        .args(["check", "--quiz"])
        .arg(&quiz)
        .assert()
        .failure()
        .stderr(predicate::str::contains("quiz has no questions"));
}

#[test]
fn play_builtin_perfect_score() {
    riddle_cmd()
        .arg("play")
        .write_stdin("ball\n\ncar\n\ntrue star\n\nyou\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("My biscuit (1/4)"))
        .stdout(predicate::str::contains("[image: xmas1]"))
        .stdout(predicate::str::contains("Shake the phone for a 🎁"))
        .stdout(predicate::str::contains("Every mile's right n' light"))
        .stdout(predicate::str::contains("Score: 4/4"));
}

#[test]
fn play_wrong_answer_shows_hint() {
    riddle_cmd()
        .arg("play")
        .write_stdin("basket\n\n BALL \n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Oops! Kiss me to try again."))
        .stdout(predicate::str::contains(
            "Hint: You can find me in the word 'football'",
        ))
        .stdout(predicate::str::contains("Correct! On to the next"));
}

#[test]
fn play_shake_unlocks_bonus() {
    let dir = TempDir::new().unwrap();
    let quiz = write_quiz(&dir);
    riddle_cmd()
        .args(["play", "--quiz"])
        .arg(&quiz)
        .write_stdin("piano\n\ntowel\n:shake\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[image: towel]"))
        .stdout(predicate::str::contains("*shake*"))
        .stdout(predicate::str::contains("[image: gift]"))
        .stdout(predicate::str::contains("Score: 2/2"));
}

#[test]
fn play_quit_early() {
    riddle_cmd()
        .arg("play")
        .write_stdin(":quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score:").not());
}

#[test]
fn play_eof_exits_cleanly() {
    riddle_cmd().arg("play").write_stdin("").assert().success();
}

#[test]
fn detect_trace() {
    let dir = TempDir::new().unwrap();
    let trace = dir.path().join("trace.jsonl");
    std::fs::write(
        &trace,
        "\
# two spikes 100ms apart, then one 4s later
{\"x\":0.0,\"y\":0.0,\"z\":9.8,\"timestamp_ms\":10000}
{\"x\":30.0,\"y\":0.0,\"z\":9.8,\"timestamp_ms\":10020}
{\"x\":30.0,\"y\":0.0,\"z\":9.8,\"timestamp_ms\":10120}
{\"x\":30.0,\"y\":0.0,\"z\":9.8,\"timestamp_ms\":14120}
",
    )
    .unwrap();

    riddle_cmd()
        .arg("detect")
        .arg(&trace)
        .assert()
        .success()
        .stdout(predicate::str::contains("shake at 10020ms (count 1)"))
        .stdout(predicate::str::contains("shake at 14120ms (count 1)"))
        .stdout(predicate::str::contains("samples:  4"))
        .stdout(predicate::str::contains("shakes:   2"));

    riddle_cmd()
        .args(["detect", "--threshold", "4.0"])
        .arg(&trace)
        .assert()
        .success()
        .stdout(predicate::str::contains("shakes:   0"));
}

#[test]
fn detect_missing_trace_fails() {
    riddle_cmd()
        .args(["detect", "/nonexistent/trace.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load trace"));
}
