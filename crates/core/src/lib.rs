#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod state;
pub mod time;

pub use error::Error;
pub use state::{AppState, StudyMode, Tab, WrongList};
pub use time::Clock;
