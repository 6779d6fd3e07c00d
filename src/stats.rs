use serde::Deserialize;
use std::fmt;

use crate::error::FetchError;
use crate::query::{QuestionCountEntry, SubmitStats};
use crate::render::Card;

pub const OVERALL_SUBMISSIONS: &str = "Overall Submissions";
pub const OVERALL_EASY_SUBMISSIONS: &str = "Overall Easy Submissions";
pub const OVERALL_MEDIUM_SUBMISSIONS: &str = "Overall Medium Submissions";
pub const OVERALL_HARD_SUBMISSIONS: &str = "Overall Hard Submissions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Difficulty {
    All,
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// The tiers that get a progress indicator, in display order.
    pub const TIERS: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Position of this difficulty in the API's ordered lists.
    pub fn index(self) -> usize {
        match self {
            Difficulty::All => 0,
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::All => "All",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Solved versus available problems for one difficulty.
///
/// `solved <= total` is what the API promises, but nothing here relies on
/// it; the values are rendered as received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub solved: u64,
    pub total: u64,
}

impl Progress {
    pub fn new(solved: u64, total: u64) -> Self {
        Self { solved, total }
    }

    /// `solved / total`, or 0 when there is nothing to solve.
    pub fn completion(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.solved as f64 / self.total as f64
    }

    /// Angular position of the circular indicator.
    pub fn degrees(&self) -> f64 {
        self.completion() * 360.0
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.solved, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserStats {
    pub easy: Progress,
    pub medium: Progress,
    pub hard: Progress,
    pub overall_submissions: u64,
    pub easy_submissions: u64,
    pub medium_submissions: u64,
    pub hard_submissions: u64,
}

impl UserStats {
    /// Derives the display stats from the raw lists. Entries are taken by
    /// position (0 = All, 1 = Easy, 2 = Medium, 3 = Hard), not by their
    /// `difficulty` tag.
    pub fn from_profile(
        all_questions: &[QuestionCountEntry],
        submit_stats: &SubmitStats,
    ) -> Result<Self, FetchError> {
        let totals = |d: Difficulty| entry(all_questions, d, "allQuestionsCount").map(|e| e.count);
        let solved = |d: Difficulty| {
            entry(&submit_stats.ac_submission_num, d, "acSubmissionNum").map(|e| e.count)
        };
        let submissions = |d: Difficulty| {
            entry(&submit_stats.total_submission_num, d, "totalSubmissionNum")
                .map(|e| e.submissions)
        };

        Ok(Self {
            easy: Progress::new(solved(Difficulty::Easy)?, totals(Difficulty::Easy)?),
            medium: Progress::new(solved(Difficulty::Medium)?, totals(Difficulty::Medium)?),
            hard: Progress::new(solved(Difficulty::Hard)?, totals(Difficulty::Hard)?),
            overall_submissions: submissions(Difficulty::All)?,
            easy_submissions: submissions(Difficulty::Easy)?,
            medium_submissions: submissions(Difficulty::Medium)?,
            hard_submissions: submissions(Difficulty::Hard)?,
        })
    }

    /// Progress for a tier; `All` has no indicator of its own.
    pub fn progress(&self, difficulty: Difficulty) -> Option<Progress> {
        match difficulty {
            Difficulty::All => None,
            Difficulty::Easy => Some(self.easy),
            Difficulty::Medium => Some(self.medium),
            Difficulty::Hard => Some(self.hard),
        }
    }

    /// Summary cards in display order.
    pub fn cards(&self) -> Vec<Card> {
        vec![
            Card::stat(OVERALL_SUBMISSIONS, self.overall_submissions),
            Card::stat(OVERALL_EASY_SUBMISSIONS, self.easy_submissions),
            Card::stat(OVERALL_MEDIUM_SUBMISSIONS, self.medium_submissions),
            Card::stat(OVERALL_HARD_SUBMISSIONS, self.hard_submissions),
        ]
    }
}

fn entry<'a, T>(
    list: &'a [T],
    difficulty: Difficulty,
    field: &str,
) -> Result<&'a T, FetchError> {
    list.get(difficulty.index()).ok_or_else(|| {
        FetchError::Decode(format!(
            "{} has no entry for {} (index {})",
            field,
            difficulty,
            difficulty.index()
        ))
    })
}
