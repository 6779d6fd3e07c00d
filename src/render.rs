use std::cell::RefCell;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use std::thread;
use tracing::warn;

use crate::counter::{self, Counter};
use crate::stats::{Difficulty, Progress};
use crate::utils::format_number;

pub const TRIGGER_IDLE_LABEL: &str = "Search";
pub const TRIGGER_BUSY_LABEL: &str = "Searching...";
pub const USER_NOT_FOUND: &str = "User not found";

const BAR_WIDTH: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Card {
    Stat { label: String, value: u64 },
    Message(String),
}

impl Card {
    pub fn stat(label: impl Into<String>, value: u64) -> Self {
        Card::Stat {
            label: label.into(),
            value,
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Card::Message(text.into())
    }
}

pub fn trigger_label(busy: bool) -> &'static str {
    if busy {
        TRIGGER_BUSY_LABEL
    } else {
        TRIGGER_IDLE_LABEL
    }
}

/// Destination for everything the pipeline displays.
pub trait RenderSink {
    fn set_progress(&self, difficulty: Difficulty, progress: &Progress);

    /// Replaces the whole card region.
    fn set_cards(&self, cards: &[Card]);

    fn set_busy(&self, busy: bool);
}

/// Draws progress bars and cards on a terminal.
pub struct TerminalSink<W: Write = io::Stdout> {
    out: RefCell<W>,
    animate: bool,
}

impl TerminalSink {
    pub fn new(animate: bool) -> Self {
        Self::with_writer(io::stdout(), animate)
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn with_writer(out: W, animate: bool) -> Self {
        Self {
            out: RefCell::new(out),
            animate,
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write_progress(&self, difficulty: Difficulty, progress: &Progress) -> io::Result<()> {
        let mut out = self.out.borrow_mut();

        if self.animate {
            let ticks = counter::tick_count(counter::ANIMATION_DURATION, counter::TICK_INTERVAL);
            for value in Counter::new(progress.solved, ticks) {
                let frame = Progress::new(value, progress.total);
                write!(out, "\r{}", progress_line(difficulty, &frame))?;
                out.flush()?;
                thread::sleep(counter::TICK_INTERVAL);
            }
            write!(out, "\r")?;
        }

        writeln!(out, "{}", progress_line(difficulty, progress))?;
        out.flush()
    }

    fn write_cards(&self, cards: &[Card]) -> io::Result<()> {
        let mut out = self.out.borrow_mut();
        writeln!(out)?;
        for card in cards {
            match card {
                Card::Stat { label, value } => {
                    writeln!(out, "  {:<28} {:>10}", label, format_number(*value))?
                }
                Card::Message(text) => writeln!(out, "  {}", text)?,
            }
        }
        out.flush()
    }

    fn write_busy(&self, busy: bool) -> io::Result<()> {
        if busy {
            let mut out = self.out.borrow_mut();
            writeln!(out, "{}", trigger_label(true))?;
            out.flush()?;
        }
        Ok(())
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn set_progress(&self, difficulty: Difficulty, progress: &Progress) {
        if let Err(e) = self.write_progress(difficulty, progress) {
            warn!(action = "write", component = "terminal_sink", error = %e, "Failed to draw progress");
        }
    }

    fn set_cards(&self, cards: &[Card]) {
        if let Err(e) = self.write_cards(cards) {
            warn!(action = "write", component = "terminal_sink", error = %e, "Failed to draw cards");
        }
    }

    fn set_busy(&self, busy: bool) {
        if let Err(e) = self.write_busy(busy) {
            warn!(action = "write", component = "terminal_sink", error = %e, "Failed to draw trigger state");
        }
    }
}

fn progress_line(difficulty: Difficulty, progress: &Progress) -> String {
    let filled = (progress.completion().min(1.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "{:<7}[{}{}] {:>11} {:>6.1}°",
        difficulty.as_str(),
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        progress.label(),
        progress.degrees()
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Progress(Difficulty, Progress),
    Cards(Vec<Card>),
    Busy(bool),
}

/// Keeps every call in order, for asserting on what a run displayed.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.lock().clone()
    }

    /// Latest progress shown for `difficulty`, if any.
    pub fn progress(&self, difficulty: Difficulty) -> Option<Progress> {
        self.lock().iter().rev().find_map(|event| match event {
            SinkEvent::Progress(d, p) if *d == difficulty => Some(*p),
            _ => None,
        })
    }

    /// Current content of the card region.
    pub fn cards(&self) -> Vec<Card> {
        self.lock()
            .iter()
            .rev()
            .find_map(|event| match event {
                SinkEvent::Cards(cards) => Some(cards.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn is_busy(&self) -> bool {
        self.lock()
            .iter()
            .rev()
            .find_map(|event| match event {
                SinkEvent::Busy(busy) => Some(*busy),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn trigger_label(&self) -> &'static str {
        trigger_label(self.is_busy())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SinkEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, event: SinkEvent) {
        self.lock().push(event);
    }
}

impl RenderSink for RecordingSink {
    fn set_progress(&self, difficulty: Difficulty, progress: &Progress) {
        self.push(SinkEvent::Progress(difficulty, *progress));
    }

    fn set_cards(&self, cards: &[Card]) {
        self.push(SinkEvent::Cards(cards.to_vec()));
    }

    fn set_busy(&self, busy: bool) {
        self.push(SinkEvent::Busy(busy));
    }
}

impl<T: RenderSink + ?Sized> RenderSink for &T {
    fn set_progress(&self, difficulty: Difficulty, progress: &Progress) {
        (**self).set_progress(difficulty, progress);
    }

    fn set_cards(&self, cards: &[Card]) {
        (**self).set_cards(cards);
    }

    fn set_busy(&self, busy: bool) {
        (**self).set_busy(busy);
    }
}
