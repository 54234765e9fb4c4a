//! Integration tests that drive `riddle play` through a live stdin pipe.
//! Covers what `write_stdin` cannot order: trace replay ahead of input,
//! and Ctrl-C while a read is pending.

use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};
use tempfile::TempDir;

const QUIZ: &str = r#"
title = "Live"

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

fn riddle_binary() -> std::path::PathBuf {
    assert_cmd::cargo::cargo_bin!("riddle").into()
}

/// A running `riddle play` with its stdout collected on a reader thread.
struct Player {
    child: Child,
    stdout: Receiver<Vec<u8>>,
    seen: Vec<u8>,
}

impl Player {
    fn spawn(quiz: &Path, trace: Option<&Path>) -> Self {
        let mut cmd = Command::new(riddle_binary());
        cmd.args(["play", "--quiz"]).arg(quiz);
        if let Some(trace) = trace {
            cmd.arg("--trace").arg(trace);
        }
        let mut child = cmd
            .env_remove("RIDDLE_QUIZ")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn riddle play");

        let mut out = child.stdout.take().expect("stdout pipe");
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut buf = [0u8; 1024];
            while let Ok(n) = out.read(&mut buf) {
                if n == 0 || tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
        });

        Self {
            child,
            stdout: rx,
            seen: Vec::new(),
        }
    }

    fn output(&self) -> String {
        String::from_utf8_lossy(&self.seen).into_owned()
    }

    /// Block until `needle` shows up on stdout.
    fn wait_for(&mut self, needle: &str) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !self.output().contains(needle) {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.stdout.recv_timeout(left) {
                Ok(chunk) => self.seen.extend_from_slice(&chunk),
                Err(_) => panic!("timed out waiting for {needle:?}, got:\n{}", self.output()),
            }
        }
    }

    fn send(&mut self, line: &str) {
        let stdin = self.child.stdin.as_mut().expect("stdin pipe");
        writeln!(stdin, "{line}").unwrap();
        stdin.flush().unwrap();
    }

    /// Close stdin, wait for exit and collect the rest of stdout.
    fn finish(mut self) -> (ExitStatus, String) {
        drop(self.child.stdin.take());
        let status = self.child.wait().expect("wait");
        while let Ok(chunk) = self.stdout.recv_timeout(Duration::from_secs(2)) {
            self.seen.extend_from_slice(&chunk);
        }
        (status, self.output())
    }
}

fn write_quiz(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("quiz.toml");
    std::fs::write(&path, QUIZ).unwrap();
    path
}

#[test]
fn replayed_spike_unlocks_bonus_image() {
    let dir = TempDir::new().unwrap();
    let quiz = write_quiz(&dir);
    let trace = dir.path().join("spike.jsonl");
    std::fs::write(
        &trace,
        "{\"x\":30.0,\"y\":0.0,\"z\":9.8,\"timestamp_ms\":1000}\n",
    )
    .unwrap();

    let mut player = Player::spawn(&quiz, Some(&trace));
    // The spike is due as soon as play starts; no input has been sent yet.
    player.wait_for("*shake*");

    for line in ["piano", "", "towel"] {
        player.send(line);
    }
    player.wait_for("[image: gift]");
    player.send("");

    let (status, out) = player.finish();
    assert!(status.success(), "got {status}");
    assert!(!out.contains("[image: towel]"), "got:\n{out}");
    assert!(out.contains("Score: 2/2"), "got:\n{out}");
}

#[test]
fn replay_without_spike_keeps_plain_image() {
    let dir = TempDir::new().unwrap();
    let quiz = write_quiz(&dir);
    let trace = dir.path().join("rest.jsonl");
    std::fs::write(
        &trace,
        "{\"x\":0.0,\"y\":0.0,\"z\":9.8,\"timestamp_ms\":1000}\n",
    )
    .unwrap();

    let mut player = Player::spawn(&quiz, Some(&trace));
    player.wait_for("> ");
    for line in ["piano", "", "towel"] {
        player.send(line);
    }
    player.wait_for("[image: towel]");

    let (status, out) = player.finish();
    assert!(status.success(), "got {status}");
    assert!(!out.contains("*shake*"), "got:\n{out}");
    assert!(!out.contains("[image: gift]"), "got:\n{out}");
}

#[cfg(unix)]
#[test]
fn ctrl_c_exits_with_interrupt_status() {
    let dir = TempDir::new().unwrap();
    let quiz = write_quiz(&dir);
    let mut player = Player::spawn(&quiz, None);
    player.wait_for("> ");
    // Let the event loop install its signal handler.
    std::thread::sleep(Duration::from_millis(300));

    unsafe {
        libc::kill(player.child.id() as libc::pid_t, libc::SIGINT);
    }

    let start = Instant::now();
    let status = player.child.wait().expect("wait");
    let elapsed = start.elapsed();

    assert_eq!(status.code(), Some(130), "got {status}");
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
}
