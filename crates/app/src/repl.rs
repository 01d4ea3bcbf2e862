//! Line-oriented front-end: renders the state record read-only each pass and
//! forwards typed intents into the services facade.

use std::io::{self, BufRead, Write};

use quiz_core::model::{Question, QuestionKind, WrongEntry};
use quiz_core::{AppState, StudyMode, Tab, WrongList};
use services::{AppServices, SessionError};

/// One typed intent. Letters resolve differently per tab, so parsing stays
/// context-free and dispatch decides.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Help,
    Quit,
    Next,
    Prev,
    Jump(usize),
    Letter(char),
    Submit,
    Mode,
    Theme,
    FontUp,
    FontDown,
    SwitchTab(Tab),
    Libs,
    Lib(usize),
    DeleteLib,
    Reset,
    StartExam,
    Import { path: String, name: Option<String> },
    Remove,
    Blank,
    Unknown(String),
}

fn parse_tab(word: &str) -> Option<Tab> {
    match word {
        "practice" => Some(Tab::Practice),
        "exam" => Some(Tab::Exam),
        "practice-wrong" | "pwrong" => Some(Tab::PracticeWrong),
        "exam-wrong" | "ewrong" => Some(Tab::ExamWrong),
        "stats" | "exam-stats" => Some(Tab::ExamStats),
        _ => None,
    }
}

fn parse_command(line: &str) -> Command {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Command::Blank;
    };
    let head_lower = head.to_ascii_lowercase();

    match head_lower.as_str() {
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "go" | "g" => match words.next().and_then(|w| w.parse::<usize>().ok()) {
            Some(number) if number > 0 => Command::Jump(number - 1),
            _ => Command::Unknown(line.to_owned()),
        },
        "submit" | "s" => Command::Submit,
        "mode" | "m" => Command::Mode,
        "theme" => Command::Theme,
        "font+" => Command::FontUp,
        "font-" => Command::FontDown,
        "tab" | "t" => match words.next().and_then(parse_tab) {
            Some(tab) => Command::SwitchTab(tab),
            None => Command::Unknown(line.to_owned()),
        },
        "libs" => Command::Libs,
        "lib" => match words.next().and_then(|w| w.parse::<usize>().ok()) {
            Some(number) if number > 0 => Command::Lib(number - 1),
            _ => Command::Unknown(line.to_owned()),
        },
        "delete" => Command::DeleteLib,
        "reset" => Command::Reset,
        "start" => Command::StartExam,
        "import" => match words.next() {
            Some(path) => Command::Import {
                path: path.to_owned(),
                name: words.next().map(str::to_owned),
            },
            None => Command::Unknown(line.to_owned()),
        },
        "remove" | "rm" => Command::Remove,
        _ => {
            let mut chars = head_lower.chars();
            match (chars.next(), chars.next()) {
                (Some(letter @ 'a'..='h'), None) => Command::Letter(letter),
                _ => Command::Unknown(line.to_owned()),
            }
        }
    }
}

/// Remaining seconds as MM:SS.
fn format_duration(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

//
// ─── RENDERING ─────────────────────────────────────────────────────────────────
//

fn render_options(question: &Question) {
    if question.kind() == QuestionKind::Judge {
        println!("  A. TRUE");
        println!("  B. FALSE");
        return;
    }
    for letter in 'A'..='H' {
        if let Some(text) = question.option_text(letter) {
            println!("  {letter}. {text}");
        }
    }
}

fn render_practice(state: &AppState) {
    let Some(library) = state.current_library() else {
        println!("No library loaded. Use: import <file.csv> [name]");
        return;
    };

    let progress = library.progress();
    println!(
        "Library: {} ({} questions) | answered {}/{} | accuracy {}%",
        library.name,
        progress.total,
        progress.answered,
        progress.total,
        progress.accuracy_percent()
    );

    let Some(question) = library.question(state.cursor) else {
        println!("The library is empty.");
        return;
    };

    println!();
    println!(
        "[{}] {}/{} · streak {}",
        question.kind().label(),
        state.cursor + 1,
        library.len(),
        state.streak(state.cursor)
    );
    println!("{}", question.prompt);
    render_options(question);

    let answer = library.answer(state.cursor);
    let show_answer = state.mode == StudyMode::Recite
        || answer.is_some_and(|a| a.is_submitted);

    if let Some(answer) = answer {
        if answer.is_submitted {
            let verdict = if answer.is_correct { "correct" } else { "wrong" };
            println!("Your answer: {} ({verdict})", answer.selected);
        } else if !answer.selected.is_empty() {
            println!("Draft: {} (submit with 's')", answer.selected);
        }
    }
    if show_answer {
        println!("Answer: {}", question.answer);
        if !question.explanation.is_empty() {
            println!("Explanation: {}", question.explanation);
        }
    }
}

fn render_exam(state: &AppState) {
    if !state.exam.started {
        println!("No exam running. Type 'start' to begin a 90-minute exam.");
        render_history(state);
        return;
    }

    println!(
        "Exam | time left {} | answered {}/{}",
        format_duration(state.exam.time_left),
        state.exam.answered_count(),
        state.exam.questions.len()
    );

    let Some(question) = state.exam.questions.get(state.cursor) else {
        return;
    };
    println!();
    println!(
        "[{}] {}/{}",
        question.kind().label(),
        state.cursor + 1,
        state.exam.questions.len()
    );
    println!("{}", question.prompt);
    render_options(question);

    if let Some(selected) = state.exam.answers.get(&state.cursor) {
        println!("Selected: {selected}");
    }
}

fn render_wrong(list: &WrongList, title: &str) {
    if list.is_empty() {
        println!("{title}: nothing to review.");
        return;
    }
    println!("{title}: {}/{}", list.cursor + 1, list.len());

    let Some(WrongEntry {
        question, answer, ..
    }) = list.current()
    else {
        return;
    };
    println!();
    println!("[{}] {}", question.kind().label(), question.prompt);
    render_options(question);
    println!("Correct answer: {}", question.answer);
    println!("Your answer was: {}", answer.selected);
    if !question.explanation.is_empty() {
        println!("Explanation: {}", question.explanation);
    }
    if let Some(draft) = list.drafts.get(&list.cursor) {
        let letters: String = draft.iter().collect();
        println!("Draft: {letters}");
    }
}

fn render_history(state: &AppState) {
    if state.exam_history.is_empty() {
        println!("No exam records yet.");
        return;
    }
    println!("Exam history (latest first):");
    for (offset, record) in state.exam_history.iter().rev().enumerate() {
        let number = state.exam_history.len() - offset;
        let verdict = if record.passed { "passed" } else { "failed" };
        println!(
            "  #{number} {} | score {:.1} (single {:.1} / multi {:.1} / judge {:.1}) | {verdict}",
            record.taken_at.format("%Y-%m-%d %H:%M"),
            record.score.total,
            record.score.single,
            record.score.multi,
            record.score.judge,
        );
    }
}

fn render(state: &AppState) {
    println!();
    println!("──────────────────────────────────────────────");
    match state.tab {
        Tab::Practice => render_practice(state),
        Tab::Exam => render_exam(state),
        Tab::PracticeWrong => render_wrong(&state.practice_wrong, "Practice mistakes"),
        Tab::ExamWrong => render_wrong(&state.exam_wrong, "Exam mistakes"),
        Tab::ExamStats => render_history(state),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  n / p / g <num>      next, previous, jump to question");
    println!("  a..h                 pick an option (toggles on multi questions)");
    println!("  s                    submit (multi draft, or the running exam)");
    println!("  tab <name>           practice | exam | pwrong | ewrong | stats");
    println!("  start                start a timed exam");
    println!("  libs / lib <num>     list libraries, switch library");
    println!("  import <file> [name] import a CSV question bank");
    println!("  rm                   remove the current review entry");
    println!("  m / theme / font+ / font-   toggle recite mode, theme, font size");
    println!("  delete / reset       delete current library / wipe everything");
    println!("  q                    quit");
}

//
// ─── DISPATCH ──────────────────────────────────────────────────────────────────
//

fn report<T>(result: Result<T, SessionError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            println!("{err}");
            None
        }
    }
}

fn handle_letter(services: &AppServices, letter: char) {
    let (tab, is_multi) = services.with_state(|state| {
        let is_multi = state
            .current_question()
            .is_some_and(|q| q.kind() == QuestionKind::Multi);
        (state.tab, is_multi)
    });

    match tab {
        Tab::Practice => {
            if is_multi {
                report(services.toggle_multi_option(letter));
            } else if let Some(feedback) = report(services.select_option(letter)).flatten() {
                if feedback.is_correct {
                    println!("Correct!");
                } else {
                    println!("Wrong. You picked {}.", feedback.selected);
                }
            }
        }
        Tab::Exam => {
            report(services.select_exam_option(letter));
        }
        Tab::PracticeWrong => {
            report(services.toggle_practice_wrong_draft(letter));
        }
        Tab::ExamWrong => {
            report(services.toggle_exam_wrong_draft(letter));
        }
        Tab::ExamStats => {}
    }
}

fn handle_submit(services: &AppServices, input: &mut impl BufRead) -> io::Result<()> {
    let (tab, exam_running) = services.with_state(|state| (state.tab, state.exam.started));

    if tab == Tab::Exam && !exam_running {
        println!("No exam running. Type 'start' to begin one.");
        return Ok(());
    }

    if tab == Tab::Exam && exam_running {
        let unanswered = services.unanswered_count();
        if unanswered > 0 {
            print!("{unanswered} questions unanswered. Submit anyway? (y/n) ");
            io::stdout().flush()?;
            let mut line = String::new();
            input.read_line(&mut line)?;
            if !line.trim().eq_ignore_ascii_case("y") {
                return Ok(());
            }
        }
        if let Some(Some(outcome)) = report(services.submit_exam()) {
            let verdict = if outcome.passed { "passed" } else { "failed" };
            println!(
                "Exam over: score {:.1}, {verdict} ({} wrong)",
                outcome.score.total, outcome.wrong_questions
            );
        }
        return Ok(());
    }

    match services.submit_multi_select() {
        Ok(feedback) => {
            if feedback.is_correct {
                println!("Correct!");
            } else {
                println!("Wrong. Your answer: {}", feedback.selected);
            }
        }
        Err(err) => println!("{err}"),
    }
    Ok(())
}

fn handle_navigation(services: &AppServices, forward: bool) {
    let tab = services.with_state(|state| state.tab);
    let moved = match (tab, forward) {
        (Tab::PracticeWrong, true) => report(services.next_practice_wrong()),
        (Tab::PracticeWrong, false) => report(services.prev_practice_wrong()),
        (Tab::ExamWrong, true) => report(services.next_exam_wrong()),
        (Tab::ExamWrong, false) => report(services.prev_exam_wrong()),
        (_, true) => report(services.next_question()),
        (_, false) => report(services.prev_question()),
    };

    if moved == Some(false) {
        let exam_running = services.with_state(|state| state.exam.started);
        let on_exam_sequence = exam_running && matches!(tab, Tab::Practice | Tab::Exam);
        if forward && on_exam_sequence {
            println!("Reached the last question. Submit the exam with 's'.");
        } else if forward {
            println!("Already at the last question.");
        } else {
            println!("Already at the first question.");
        }
    }
}

fn handle_remove(services: &AppServices) {
    let tab = services.with_state(|state| state.tab);
    let removed = match tab {
        Tab::PracticeWrong => report(services.remove_current_practice_wrong()),
        Tab::ExamWrong => report(services.remove_current_exam_wrong()),
        _ => {
            println!("'rm' only applies on a review tab.");
            return;
        }
    };
    if removed == Some(true) {
        println!("Removed from the review list.");
    }
}

fn handle_import(services: &AppServices, path: &str, name: Option<String>) {
    let name = name.unwrap_or_else(|| {
        std::path::Path::new(path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "imported".to_owned())
    });
    match std::fs::File::open(path) {
        Ok(file) => {
            if let Some(count) = report(services.import_csv(&name, file)) {
                println!("Imported {count} questions into \"{name}\".");
            }
        }
        Err(err) => println!("Cannot read {path}: {err}"),
    }
}

/// Drive the study loop until the user quits.
pub fn run(services: &AppServices) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("quizbank. Type 'help' for commands.");

    loop {
        services.with_state(render);
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }

        match parse_command(&line) {
            Command::Blank => {}
            Command::Help => print_help(),
            Command::Quit => return Ok(()),
            Command::Next => handle_navigation(services, true),
            Command::Prev => handle_navigation(services, false),
            Command::Jump(index) => {
                if report(services.jump_to_question(index)) == Some(false) {
                    println!("No question {}.", index + 1);
                }
            }
            Command::Letter(letter) => handle_letter(services, letter),
            Command::Submit => handle_submit(services, &mut input)?,
            Command::Mode => {
                if let Some(mode) = report(services.toggle_mode()) {
                    let label = match mode {
                        StudyMode::Practice => "practice",
                        StudyMode::Recite => "recite",
                    };
                    println!("Mode: {label}");
                }
            }
            Command::Theme => {
                if let Some(dark) = report(services.toggle_dark_mode()) {
                    println!("Theme: {}", if dark { "dark" } else { "light" });
                }
            }
            Command::FontUp => {
                if report(services.increase_font()) == Some(false) {
                    println!("Font size is already at the maximum.");
                }
            }
            Command::FontDown => {
                if report(services.decrease_font()) == Some(false) {
                    println!("Font size is already at the minimum.");
                }
            }
            Command::SwitchTab(tab) => {
                report(services.switch_tab(tab));
            }
            Command::Libs => services.with_state(|state| {
                if state.libraries.is_empty() {
                    println!("No libraries imported yet.");
                }
                for (index, library) in state.libraries.iter().enumerate() {
                    let marker = if index == state.current_library { "*" } else { " " };
                    println!(
                        " {marker} {}. {} ({} questions)",
                        index + 1,
                        library.name,
                        library.len()
                    );
                }
            }),
            Command::Lib(index) => {
                if report(services.switch_library(index)) == Some(false) {
                    println!("No library {}.", index + 1);
                }
            }
            Command::DeleteLib => match report(services.delete_current_library()) {
                Some(Some(name)) => println!("Deleted \"{name}\"."),
                Some(None) => println!("Nothing to delete."),
                None => {}
            },
            Command::Reset => {
                print!("Wipe all libraries, answers, and history? (y/n) ");
                io::stdout().flush()?;
                let mut confirm = String::new();
                input.read_line(&mut confirm)?;
                if confirm.trim().eq_ignore_ascii_case("y") {
                    report(services.reset_all());
                    println!("Everything has been reset.");
                }
            }
            Command::StartExam => {
                let started = services.start_exam(
                    |_remaining| {},
                    |outcome| {
                        let verdict = if outcome.passed { "passed" } else { "failed" };
                        println!(
                            "\nTime is up, exam submitted automatically: score {:.1}, {verdict}",
                            outcome.score.total
                        );
                    },
                );
                match started {
                    Ok(()) => {
                        report(services.switch_tab(Tab::Exam));
                        println!("Exam started: 90 minutes on the clock.");
                    }
                    Err(err) => println!("{err}"),
                }
            }
            Command::Import { path, name } => handle_import(services, &path, name),
            Command::Remove => handle_remove(services),
            Command::Unknown(line) => {
                println!("Unrecognized command: {}", line.trim());
                println!("Type 'help' for the command list.");
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_core_commands() {
        assert_eq!(parse_command("n"), Command::Next);
        assert_eq!(parse_command("  prev "), Command::Prev);
        assert_eq!(parse_command("g 12"), Command::Jump(11));
        assert_eq!(parse_command("B"), Command::Letter('b'));
        assert_eq!(parse_command("tab ewrong"), Command::SwitchTab(Tab::ExamWrong));
        assert_eq!(parse_command("lib 2"), Command::Lib(1));
        assert_eq!(
            parse_command("import bank.csv electrics"),
            Command::Import {
                path: "bank.csv".to_owned(),
                name: Some("electrics".to_owned()),
            }
        );
    }

    #[test]
    fn rejects_nonsense_and_zero_indices() {
        assert!(matches!(parse_command("g 0"), Command::Unknown(_)));
        assert!(matches!(parse_command("xyz"), Command::Unknown(_)));
        assert!(matches!(parse_command("i"), Command::Unknown(_)));
        assert_eq!(parse_command(""), Command::Blank);
    }

    #[test]
    fn formats_remaining_time_as_minutes_and_seconds() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(59), "00:59");
        assert_eq!(format_duration(90 * 60), "90:00");
        assert_eq!(format_duration(61), "01:01");
    }
}
