use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{ExamRecord, ExamSession, Library, Question, Settings, WrongEntry};

//
// ─── MODES & TABS ──────────────────────────────────────────────────────────────
//

/// How questions are being worked through: answering, or reciting with the
/// answers shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    #[default]
    Practice,
    Recite,
}

/// The view the user is on. Drives which sequence the shared cursor walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    Practice,
    Exam,
    PracticeWrong,
    ExamWrong,
    ExamStats,
}

//
// ─── WRONG-QUESTION REVIEW LIST ────────────────────────────────────────────────
//

/// A derived review list of missed questions with its own cursor and mode.
///
/// `drafts` caches in-progress multi-select picks per list index; navigation
/// away from an index drops its draft so a revisit starts clean.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WrongList {
    #[serde(default)]
    pub entries: Vec<WrongEntry>,
    #[serde(default)]
    pub cursor: usize,
    #[serde(default)]
    pub mode: StudyMode,
    #[serde(default)]
    pub drafts: BTreeMap<usize, BTreeSet<char>>,
}

impl WrongList {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn current(&self) -> Option<&WrongEntry> {
        self.entries.get(self.cursor)
    }

    /// Replace the entries and reset the cursor and drafts.
    pub fn reset(&mut self, entries: Vec<WrongEntry>) {
        self.entries = entries;
        self.cursor = 0;
        self.drafts.clear();
    }
}

//
// ─── APP STATE ─────────────────────────────────────────────────────────────────
//

/// The whole application state record, persisted as one snapshot.
///
/// Every field defaults, so snapshots written by older builds deserialize by
/// merging onto these defaults rather than failing or migrating.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub libraries: Vec<Library>,
    #[serde(default)]
    pub current_library: usize,
    #[serde(default)]
    pub cursor: usize,
    #[serde(default)]
    pub mode: StudyMode,
    #[serde(default)]
    pub tab: Tab,
    #[serde(default)]
    pub is_shuffled: bool,
    #[serde(default)]
    pub exam: ExamSession,
    #[serde(default)]
    pub exam_history: Vec<ExamRecord>,
    #[serde(default)]
    pub practice_wrong: WrongList,
    #[serde(default)]
    pub exam_wrong: WrongList,
    #[serde(default)]
    pub practice_counts: HashMap<String, u32>,
    #[serde(default)]
    pub correct_streaks: HashMap<String, u32>,
    #[serde(default)]
    pub settings: Settings,
}

impl AppState {
    /// Tally key for a question, unique per (library, question) pair.
    #[must_use]
    pub fn tally_key(library: usize, question: usize) -> String {
        format!("{library}-{question}")
    }

    #[must_use]
    pub fn current_library(&self) -> Option<&Library> {
        self.libraries.get(self.current_library)
    }

    pub fn current_library_mut(&mut self) -> Option<&mut Library> {
        self.libraries.get_mut(self.current_library)
    }

    /// The question under the cursor for the active sequence: the shuffled
    /// exam questions while an exam runs, the active library otherwise.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.exam.started {
            self.exam.questions.get(self.cursor)
        } else {
            self.current_library()?.question(self.cursor)
        }
    }

    /// Length of the sequence the cursor currently walks.
    #[must_use]
    pub fn active_question_count(&self) -> usize {
        if self.exam.started {
            self.exam.questions.len()
        } else {
            self.current_library().map_or(0, Library::len)
        }
    }

    /// Current correct streak for a question of the active library.
    #[must_use]
    pub fn streak(&self, question: usize) -> u32 {
        self.correct_streaks
            .get(&Self::tally_key(self.current_library, question))
            .copied()
            .unwrap_or(0)
    }

    /// How many times a question of the active library has been answered.
    #[must_use]
    pub fn practice_count(&self, question: usize) -> u32 {
        self.practice_counts
            .get(&Self::tally_key(self.current_library, question))
            .copied()
            .unwrap_or(0)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
