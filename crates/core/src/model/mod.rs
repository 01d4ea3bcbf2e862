mod answer;
mod exam;
mod library;
mod question;
mod settings;
mod wrong;

pub use answer::{AnswerValue, UserAnswer};
pub use exam::{EXAM_DURATION_SECS, ExamRecord, ExamScore, ExamSession, GradedExam, PASS_MARK};
pub use library::{Library, LibraryProgress};
pub use question::{MAX_OPTIONS, Question, QuestionError, QuestionKind};
pub use settings::{FONT_SIZE_STEP, MAX_FONT_SIZE, MIN_FONT_SIZE, OrderMode, QuestionOrders, Settings};
pub use wrong::WrongEntry;
