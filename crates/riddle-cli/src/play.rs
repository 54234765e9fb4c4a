//! Interactive terminal front end.
//!
//! One event loop owns the session: stdin lines, trace replay ticks and
//! Ctrl-C are multiplexed with `tokio::select!`, so sensor samples and user
//! intents never race each other.

use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use riddle_content::{Messages, QuizDocument};
use riddle_core::{
    AccelerationSample, Celebration, Feedback, ManualFeed, QuizController, QuizSession, QuizState,
    ShakeConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Duration, Instant};

pub const SHAKE_COMMAND: &str = ":shake";
pub const QUIT_COMMAND: &str = ":quit";
const PROGRESS_WIDTH: usize = 20;

/// Wall-clock milliseconds, the timebase for every sample fed to the detector.
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Paced replay of a recorded trace, rebased onto the wall clock.
pub struct Replay {
    samples: Vec<AccelerationSample>,
    next: usize,
    started: Instant,
    origin_ms: u64,
    epoch_ms: u64,
}

impl Replay {
    pub fn new(samples: Vec<AccelerationSample>, started: Instant, epoch_ms: u64) -> Self {
        let origin_ms = samples.first().map(|s| s.timestamp_ms).unwrap_or_default();
        Self {
            samples,
            next: 0,
            started,
            origin_ms,
            epoch_ms,
        }
    }

    pub fn pending(&self) -> bool {
        self.next < self.samples.len()
    }

    fn offset_ms(&self, sample: &AccelerationSample) -> u64 {
        sample.timestamp_ms.saturating_sub(self.origin_ms)
    }

    /// When the next sample is due. Only meaningful while `pending()`.
    pub fn due_at(&self) -> Instant {
        match self.samples.get(self.next) {
            Some(s) => self.started + Duration::from_millis(self.offset_ms(s)),
            None => self.started,
        }
    }

    pub fn take(&mut self) -> Option<AccelerationSample> {
        let sample = *self.samples.get(self.next)?;
        self.next += 1;
        Some(AccelerationSample {
            timestamp_ms: self.epoch_ms + self.offset_ms(&sample),
            ..sample
        })
    }
}

/// A spike one g above the configured threshold, stamped now.
fn synthetic_shake(config: &ShakeConfig) -> AccelerationSample {
    let g = config.gravity;
    AccelerationSample::new((config.threshold_g + 1.0) * g, 0.0, 0.0, now_millis())
}

enum Flow {
    Continue,
    Quit,
}

/// How a play session ended.
#[derive(Debug, PartialEq, Eq)]
pub enum Exit {
    /// Finished, `:quit`, or stdin closed.
    Done,
    /// Ctrl-C. Stdin may still be blocked in a read.
    Interrupted,
}

/// Text rendering of the quiz screens.
struct Screen<W: Write> {
    out: W,
    title: String,
    messages: Messages,
}

impl<W: Write> Screen<W> {
    fn question(&mut self, session: &QuizSession) -> io::Result<()> {
        let out = &mut self.out;
        let title = &self.title;
        session.with_controller(|q| -> io::Result<()> {
            let index = q.state().current_question_index;
            writeln!(out)?;
            writeln!(out, "{title} ({}/{})", index + 1, q.total())?;
            writeln!(out, "{}", progress_bar(q.progress()))?;
            writeln!(out, "{}", q.current_item().question)?;
            write!(out, "> ")?;
            out.flush()
        })
    }

    fn feedback(
        &mut self,
        session: &QuizSession,
        before: &QuizState,
        after: &QuizState,
    ) -> io::Result<()> {
        if after.score > before.score {
            writeln!(self.out, "{}", self.messages.correct)?;
            if after.current_question_index != before.current_question_index {
                // Auto-advance already left the answered item.
                let left =
                    session.with_controller(|q| q.celebration_for(before.current_question_index));
                self.write_celebration(left)?;
                return self.question(session);
            }
            self.celebration(session)?;
            if !after.is_finished {
                writeln!(self.out, "(enter to continue)")?;
            }
        } else {
            writeln!(self.out, "{}", self.messages.incorrect)?;
            if after.hint_visible {
                let hint = session.with_controller(|q| q.current_item().hint.clone());
                writeln!(self.out, "Hint: {hint}")?;
            }
            writeln!(self.out, "(enter to retry)")?;
        }
        self.out.flush()
    }

    fn celebration(&mut self, session: &QuizSession) -> io::Result<()> {
        self.write_celebration(session.with_controller(|q| q.celebration()))
    }

    fn write_celebration(&mut self, celebration: Option<Celebration>) -> io::Result<()> {
        if let Some(c) = celebration {
            writeln!(self.out, "[image: {}]", c.image.as_str())?;
            if c.shake_prompt {
                writeln!(self.out, "{} (type {SHAKE_COMMAND})", self.messages.shake_prompt)?;
            }
        }
        Ok(())
    }

    fn finale(&mut self, session: &QuizSession) -> io::Result<()> {
        let Some(score) = session.with_controller(|q| q.final_score()) else {
            return Ok(());
        };
        writeln!(self.out)?;
        writeln!(self.out, "{}", self.messages.final_title)?;
        if !self.messages.final_subtitle.is_empty() {
            writeln!(self.out, "{}", self.messages.final_subtitle)?;
        }
        if let Some(image) = &self.messages.final_image {
            writeln!(self.out, "[image: {image}]")?;
        }
        writeln!(self.out, "Score: {}/{}", score.score, score.total)?;
        self.out.flush()
    }
}

fn progress_bar(progress: f32) -> String {
    let filled = (progress.clamp(0.0, 1.0) * PROGRESS_WIDTH as f32).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(PROGRESS_WIDTH - filled))
}

/// Push one sample and re-render if it unlocked the bonus.
fn push_sample<W: Write>(
    screen: &mut Screen<W>,
    session: &QuizSession,
    feed: &ManualFeed,
    sample: AccelerationSample,
) -> io::Result<()> {
    let before = session.snapshot().bonus_unlocked;
    feed.push(sample);
    let after = session.snapshot();
    if !before && after.bonus_unlocked {
        writeln!(screen.out, "*shake*")?;
        if after.last_feedback == Feedback::Correct {
            screen.celebration(session)?;
        }
        screen.out.flush()?;
    }
    Ok(())
}

fn handle_line<W: Write>(
    screen: &mut Screen<W>,
    session: &QuizSession,
    feed: &ManualFeed,
    shake: &ShakeConfig,
    line: &str,
) -> io::Result<Flow> {
    match line {
        QUIT_COMMAND => return Ok(Flow::Quit),
        SHAKE_COMMAND => {
            push_sample(screen, session, feed, synthetic_shake(shake))?;
            return Ok(Flow::Continue);
        }
        _ => {}
    }

    let before = session.snapshot();
    let rendered = match before.last_feedback {
        Feedback::None => session
            .submit_answer(line)
            .map(|after| screen.feedback(session, &before, &after)),
        Feedback::Correct => session.advance().map(|after| {
            if after.is_finished {
                Ok(())
            } else {
                screen.question(session)
            }
        }),
        Feedback::Incorrect => session.retry().map(|_| screen.question(session)),
    };

    match rendered {
        Ok(io_result) => io_result?,
        Err(e) => writeln!(screen.out, "{e}")?,
    }
    Ok(Flow::Continue)
}

pub async fn run(doc: QuizDocument, trace: Option<Vec<AccelerationSample>>) -> Result<Exit> {
    let QuizDocument {
        title,
        shake,
        options,
        messages,
        content,
    } = doc;

    let feed = ManualFeed::new();
    let mut session = QuizSession::new(QuizController::with_options(content, options), shake);
    session.attach(&feed);

    let mut replay = trace.map(|samples| Replay::new(samples, Instant::now(), now_millis()));
    if let Some(r) = &replay {
        tracing::info!(samples = r.samples.len(), "replaying sensor trace");
    }

    let mut screen = Screen {
        out: io::stdout(),
        title,
        messages,
    };
    screen.question(&session)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut exit = Exit::Done;
    loop {
        let replay_due = replay.as_ref().map_or_else(Instant::now, Replay::due_at);
        let replay_pending = replay.as_ref().is_some_and(Replay::pending);

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    tracing::debug!("stdin closed");
                    break;
                };
                match handle_line(&mut screen, &session, &feed, &shake, line.trim())? {
                    Flow::Continue => {}
                    Flow::Quit => break,
                }
            }
            _ = tokio::time::sleep_until(replay_due), if replay_pending => {
                if let Some(sample) = replay.as_mut().and_then(Replay::take) {
                    push_sample(&mut screen, &session, &feed, sample)?;
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("interrupted");
                writeln!(screen.out)?;
                screen.out.flush()?;
                exit = Exit::Interrupted;
                break;
            }
        }

        if session.snapshot().is_finished {
            screen.finale(&session)?;
            break;
        }
    }

    session.detach();
    Ok(exit)
}
