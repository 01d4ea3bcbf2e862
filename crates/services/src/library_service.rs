//! Library management: switching, deleting, resetting, view intents.

use quiz_core::model::Library;
use quiz_core::{AppState, StudyMode, Tab, WrongList};

use crate::wrong_service;

/// Make another library active. Returns false when `index` is out of bounds.
///
/// Switching resets the cursor, drops back to practice mode, and clears the
/// shuffled flag, since all of those are derived from the active library.
pub fn switch_library(state: &mut AppState, index: usize) -> bool {
    if index >= state.libraries.len() {
        return false;
    }
    state.current_library = index;
    state.cursor = 0;
    state.mode = StudyMode::Practice;
    state.is_shuffled = false;
    true
}

/// Append a freshly imported library and make it active.
pub fn install_library(state: &mut AppState, library: Library) {
    state.libraries.push(library);
    state.current_library = state.libraries.len() - 1;
    state.cursor = 0;
}

/// Delete the active library, returning its name, or `None` if there is none.
///
/// When the last library goes, everything derived from libraries goes with
/// it: cursor, mode, both review lists, and the exam history.
pub fn delete_current_library(state: &mut AppState) -> Option<String> {
    if state.libraries.is_empty() {
        return None;
    }

    let removed = state.libraries.remove(state.current_library);
    if state.current_library >= state.libraries.len() {
        state.current_library = state.libraries.len().saturating_sub(1);
    }

    if state.libraries.is_empty() {
        state.cursor = 0;
        state.mode = StudyMode::Practice;
        state.is_shuffled = false;
        state.practice_wrong = WrongList::default();
        state.exam_wrong = WrongList::default();
        state.exam_history.clear();
    }

    Some(removed.name)
}

/// Wipe everything back to pristine defaults.
pub fn reset_all(state: &mut AppState) {
    *state = AppState::default();
}

/// Switch the active tab. Entering a review tab regenerates its list so the
/// view always reflects current truth.
pub fn switch_tab(state: &mut AppState, tab: Tab) {
    state.tab = tab;
    match tab {
        Tab::PracticeWrong => wrong_service::generate_practice_wrong(state),
        Tab::ExamWrong => wrong_service::generate_exam_wrong(state),
        _ => {}
    }
}

/// Flip between answering and reciting, returning the new mode.
pub fn toggle_mode(state: &mut AppState) -> StudyMode {
    state.mode = match state.mode {
        StudyMode::Practice => StudyMode::Recite,
        StudyMode::Recite => StudyMode::Practice,
    };
    state.mode
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    use quiz_core::model::{AnswerValue, Question, UserAnswer};

    fn library(name: &str) -> Library {
        let question = Question::new("q", AnswerValue::Single('A')).unwrap();
        Library::new(name, vec![question])
    }

    #[test]
    fn switch_resets_cursor_and_mode() {
        let mut state = AppState::default();
        state.libraries.push(library("first"));
        state.libraries.push(library("second"));
        state.cursor = 3;
        state.mode = StudyMode::Recite;
        state.is_shuffled = true;

        assert!(switch_library(&mut state, 1));
        assert_eq!(state.current_library, 1);
        assert_eq!(state.cursor, 0);
        assert_eq!(state.mode, StudyMode::Practice);
        assert!(!state.is_shuffled);

        assert!(!switch_library(&mut state, 5));
        assert_eq!(state.current_library, 1);
    }

    #[test]
    fn install_makes_the_new_library_active() {
        let mut state = AppState::default();
        state.libraries.push(library("first"));
        state.cursor = 1;

        install_library(&mut state, library("second"));
        assert_eq!(state.current_library, 1);
        assert_eq!(state.cursor, 0);
        assert_eq!(state.current_library().unwrap().name, "second");
    }

    #[test]
    fn deleting_the_last_library_clears_derived_state() {
        let mut state = AppState::default();
        state.libraries.push(library("only"));
        let key = AnswerValue::Single('A');
        state
            .libraries[0]
            .answers
            .insert(0, UserAnswer::submitted(AnswerValue::Single('B'), &key));
        wrong_service::generate_practice_wrong(&mut state);
        assert_eq!(state.practice_wrong.len(), 1);

        assert_eq!(delete_current_library(&mut state).as_deref(), Some("only"));
        assert!(state.libraries.is_empty());
        assert!(state.practice_wrong.is_empty());
        assert!(state.exam_history.is_empty());
        assert_eq!(state.cursor, 0);

        assert!(delete_current_library(&mut state).is_none());
    }

    #[test]
    fn deleting_a_middle_library_clamps_the_active_index() {
        let mut state = AppState::default();
        state.libraries.push(library("a"));
        state.libraries.push(library("b"));
        state.current_library = 1;

        assert_eq!(delete_current_library(&mut state).as_deref(), Some("b"));
        assert_eq!(state.current_library, 0);
        assert_eq!(state.current_library().unwrap().name, "a");
    }

    #[test]
    fn entering_a_review_tab_regenerates_its_list() {
        let mut state = AppState::default();
        state.libraries.push(library("demo"));
        let key = AnswerValue::Single('A');
        state
            .libraries[0]
            .answers
            .insert(0, UserAnswer::submitted(AnswerValue::Single('C'), &key));

        switch_tab(&mut state, Tab::PracticeWrong);
        assert_eq!(state.tab, Tab::PracticeWrong);
        assert_eq!(state.practice_wrong.len(), 1);

        switch_tab(&mut state, Tab::ExamWrong);
        assert!(state.exam_wrong.is_empty());
    }

    #[test]
    fn mode_toggle_round_trips() {
        let mut state = AppState::default();
        assert_eq!(toggle_mode(&mut state), StudyMode::Recite);
        assert_eq!(toggle_mode(&mut state), StudyMode::Practice);
    }
}
