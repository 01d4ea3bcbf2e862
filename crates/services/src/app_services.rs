//! The application-facing facade over the whole session-logic surface.

use std::io::Read;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use quiz_core::{AppState, Clock, StudyMode, Tab};
use storage::{SnapshotStore, StorageError, load_or_default};

use crate::error::SessionError;
use crate::exam_service::{self, ExamOutcome};
use crate::importer;
use crate::library_service;
use crate::practice_service::{self, PracticeFeedback};
use crate::timer::CountdownTimer;
use crate::wrong_service;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the state record and the snapshot store, persisting after every
/// mutating intent. This is the explicit capability set handed to the
/// presentation layer. There are no ambient globals and no hidden handler
/// tables; the front-end reads state through [`AppServices::with_state`] and
/// reports intents by calling the methods below.
pub struct AppServices {
    state: Arc<Mutex<AppState>>,
    store: Arc<dyn SnapshotStore>,
    clock: Clock,
    timer: Mutex<Option<CountdownTimer>>,
}

impl AppServices {
    /// Load the stored snapshot (or defaults) and wrap it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if an existing snapshot cannot be read.
    pub fn new(store: Arc<dyn SnapshotStore>, clock: Clock) -> Result<Self, StorageError> {
        let state = load_or_default(store.as_ref())?;
        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            store,
            clock,
            timer: Mutex::new(None),
        })
    }

    /// Read-only access for one render pass.
    pub fn with_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        let guard = lock(self.state.as_ref());
        f(&guard)
    }

    /// Run a mutation and snapshot the whole state afterward.
    fn mutate<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> Result<R, StorageError> {
        let mut guard = lock(self.state.as_ref());
        let result = f(&mut guard);
        self.store.save(&guard)?;
        Ok(result)
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Move to the previous question. False means already at the first one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn prev_question(&self) -> Result<bool, SessionError> {
        Ok(self.mutate(practice_service::prev_question)?)
    }

    /// Move to the next question. False means the end of the sequence; in exam
    /// mode the presenter should suggest submitting.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn next_question(&self) -> Result<bool, SessionError> {
        Ok(self.mutate(practice_service::next_question)?)
    }

    /// Jump straight to a question index.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn jump_to_question(&self, index: usize) -> Result<bool, SessionError> {
        Ok(self.mutate(|state| practice_service::jump_to_question(state, index))?)
    }

    //
    // ─── PRACTICE ──────────────────────────────────────────────────────────────
    //

    /// Record a single/judge practice answer. `None` when the intent does not
    /// apply (wrong mode, exam running, or a multi question).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn select_option(&self, letter: char) -> Result<Option<PracticeFeedback>, SessionError> {
        Ok(self.mutate(|state| practice_service::select_option(state, letter))?)
    }

    /// Toggle a letter in the current multi question's draft.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn toggle_multi_option(&self, letter: char) -> Result<(), SessionError> {
        Ok(self.mutate(|state| practice_service::toggle_multi_option(state, letter))?)
    }

    /// Submit the current multi question's draft.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Answer` for an empty draft and
    /// `SessionError::Storage` if the snapshot cannot be written.
    pub fn submit_multi_select(&self) -> Result<PracticeFeedback, SessionError> {
        let result = self.mutate(practice_service::submit_multi_select)?;
        Ok(result?)
    }

    //
    // ─── EXAM ──────────────────────────────────────────────────────────────────
    //

    /// Start a timed exam over the active library.
    ///
    /// `on_tick` fires once per second with remaining seconds (and once
    /// immediately with the full duration). If the countdown reaches zero the
    /// exam submits itself and `on_finished` receives the outcome; a manual
    /// [`AppServices::submit_exam`] beforehand cancels the countdown instead.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Exam` when the library has no questions and
    /// `SessionError::Storage` if the snapshot cannot be written.
    pub fn start_exam<T, F>(&self, on_tick: T, on_finished: F) -> Result<(), SessionError>
    where
        T: FnMut(u32) + Send + 'static,
        F: FnOnce(ExamOutcome) + Send + 'static,
    {
        self.mutate(exam_service::start_exam)??;
        let seconds = self.with_state(|state| state.exam.time_left);
        let total = self.with_state(|state| state.exam.questions.len());

        // Replace any countdown left over from an earlier session.
        self.cancel_timer();

        let tick_state = Arc::clone(&self.state);
        let mut forward_tick = on_tick;
        let tick = move |remaining: u32| {
            let mut guard = lock(tick_state.as_ref());
            // A tick can land just after a manual submit cleared the session.
            if !guard.exam.started {
                return;
            }
            guard.exam.time_left = remaining;
            drop(guard);
            forward_tick(remaining);
        };

        let expire_state = Arc::clone(&self.state);
        let expire_store = Arc::clone(&self.store);
        let clock = self.clock;
        let expire = move || {
            tracing::info!("exam time expired, submitting automatically");
            let mut guard = lock(expire_state.as_ref());
            let Some(outcome) = exam_service::submit_exam(&mut guard, clock.now()) else {
                return;
            };
            if let Err(err) = expire_store.save(&guard) {
                tracing::warn!(error = %err, "failed to persist snapshot after timed-out exam");
            }
            drop(guard);
            on_finished(outcome);
        };

        *lock(&self.timer) = Some(CountdownTimer::start(seconds, tick, expire));
        tracing::info!(questions = total, seconds, "exam started");
        Ok(())
    }

    /// Record a selection for the current exam question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn select_exam_option(&self, letter: char) -> Result<(), SessionError> {
        Ok(self.mutate(|state| exam_service::select_exam_option(state, letter))?)
    }

    /// Submit the running exam. Cancels the countdown first, then funnels into
    /// the same single-flight submit the expiry path uses; `None` means no
    /// exam was running (for instance, the countdown beat this call to it).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn submit_exam(&self) -> Result<Option<ExamOutcome>, SessionError> {
        self.cancel_timer();
        let outcome = self.mutate(|state| exam_service::submit_exam(state, self.clock.now()))?;
        if let Some(outcome) = &outcome {
            tracing::info!(
                score = outcome.score.total,
                passed = outcome.passed,
                "exam submitted"
            );
        }
        Ok(outcome)
    }

    /// Exam questions still lacking an answer, for the pre-submit warning.
    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.with_state(|state| state.exam.unanswered_count())
    }

    fn cancel_timer(&self) {
        if let Some(mut timer) = lock(&self.timer).take() {
            timer.cancel();
        }
    }

    //
    // ─── LIBRARIES & IMPORT ────────────────────────────────────────────────────
    //

    /// Import positional rows as a new library and switch to it. Returns the
    /// number of imported questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Import` when nothing usable was found and
    /// `SessionError::Storage` if the snapshot cannot be written.
    pub fn import_rows(&self, name: &str, rows: &[Vec<String>]) -> Result<usize, SessionError> {
        let library = importer::import_rows(name, rows)?;
        let count = library.len();
        self.mutate(|state| library_service::install_library(state, library))?;
        tracing::info!(library = name, questions = count, "imported question bank");
        Ok(count)
    }

    /// Import CSV input as a new library and switch to it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Import` for malformed or empty input and
    /// `SessionError::Storage` if the snapshot cannot be written.
    pub fn import_csv<R: Read>(&self, name: &str, reader: R) -> Result<usize, SessionError> {
        let library = importer::import_csv(name, reader)?;
        let count = library.len();
        self.mutate(|state| library_service::install_library(state, library))?;
        tracing::info!(library = name, questions = count, "imported question bank");
        Ok(count)
    }

    /// Make another library active.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn switch_library(&self, index: usize) -> Result<bool, SessionError> {
        Ok(self.mutate(|state| library_service::switch_library(state, index))?)
    }

    /// Delete the active library, returning its name.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn delete_current_library(&self) -> Result<Option<String>, SessionError> {
        let removed = self.mutate(library_service::delete_current_library)?;
        if let Some(name) = &removed {
            tracing::info!(library = name.as_str(), "deleted question bank");
        }
        Ok(removed)
    }

    /// Wipe all state and remove the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be removed.
    pub fn reset_all(&self) -> Result<(), SessionError> {
        self.cancel_timer();
        let mut guard = lock(self.state.as_ref());
        library_service::reset_all(&mut guard);
        self.store.clear().map_err(SessionError::Storage)?;
        tracing::info!("reset all state");
        Ok(())
    }

    //
    // ─── REVIEW LISTS ──────────────────────────────────────────────────────────
    //

    /// Rebuild the practice-wrong list from the active library.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn regenerate_practice_wrong(&self) -> Result<(), SessionError> {
        Ok(self.mutate(wrong_service::generate_practice_wrong)?)
    }

    /// Rebuild the exam-wrong list from the whole exam history.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn regenerate_exam_wrong(&self) -> Result<(), SessionError> {
        Ok(self.mutate(wrong_service::generate_exam_wrong)?)
    }

    /// Step back in the practice-wrong list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn prev_practice_wrong(&self) -> Result<bool, SessionError> {
        Ok(self.mutate(wrong_service::prev_practice_wrong)?)
    }

    /// Step forward in the practice-wrong list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn next_practice_wrong(&self) -> Result<bool, SessionError> {
        Ok(self.mutate(wrong_service::next_practice_wrong)?)
    }

    /// Step back in the exam-wrong list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn prev_exam_wrong(&self) -> Result<bool, SessionError> {
        Ok(self.mutate(wrong_service::prev_exam_wrong)?)
    }

    /// Step forward in the exam-wrong list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn next_exam_wrong(&self) -> Result<bool, SessionError> {
        Ok(self.mutate(wrong_service::next_exam_wrong)?)
    }

    /// Toggle a letter in the practice-wrong list's current draft.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn toggle_practice_wrong_draft(&self, letter: char) -> Result<(), SessionError> {
        Ok(self.mutate(|state| {
            wrong_service::toggle_wrong_draft(&mut state.practice_wrong, letter);
        })?)
    }

    /// Toggle a letter in the exam-wrong list's current draft.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn toggle_exam_wrong_draft(&self, letter: char) -> Result<(), SessionError> {
        Ok(self.mutate(|state| {
            wrong_service::toggle_wrong_draft(&mut state.exam_wrong, letter);
        })?)
    }

    /// Remove the practice-wrong entry under the cursor.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn remove_current_practice_wrong(&self) -> Result<bool, SessionError> {
        Ok(self.mutate(wrong_service::remove_current_practice_wrong)?)
    }

    /// Remove the exam-wrong entry under the cursor.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn remove_current_exam_wrong(&self) -> Result<bool, SessionError> {
        Ok(self.mutate(wrong_service::remove_current_exam_wrong)?)
    }

    //
    // ─── VIEW & SETTINGS ───────────────────────────────────────────────────────
    //

    /// Switch the active tab, regenerating review lists as needed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn switch_tab(&self, tab: Tab) -> Result<(), SessionError> {
        Ok(self.mutate(|state| library_service::switch_tab(state, tab))?)
    }

    /// Flip between answering and reciting.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn toggle_mode(&self) -> Result<StudyMode, SessionError> {
        Ok(self.mutate(library_service::toggle_mode)?)
    }

    /// Bump the font size a step.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn increase_font(&self) -> Result<bool, SessionError> {
        Ok(self.mutate(|state| state.settings.increase_font())?)
    }

    /// Drop the font size a step.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn decrease_font(&self) -> Result<bool, SessionError> {
        Ok(self.mutate(|state| state.settings.decrease_font())?)
    }

    /// Flip dark mode, returning the new value.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the snapshot cannot be written.
    pub fn toggle_dark_mode(&self) -> Result<bool, SessionError> {
        Ok(self.mutate(|state| state.settings.toggle_dark_mode())?)
    }
}

impl Drop for AppServices {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
