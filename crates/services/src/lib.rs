#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod exam_service;
pub mod importer;
pub mod library_service;
pub mod practice_service;
pub mod timer;
pub mod wrong_service;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use error::{AnswerError, ExamError, ImportError, SessionError};
pub use exam_service::ExamOutcome;
pub use practice_service::PracticeFeedback;
pub use timer::CountdownTimer;
