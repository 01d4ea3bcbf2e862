use serde::{Deserialize, Serialize};

pub const MIN_FONT_SIZE: u8 = 12;
pub const MAX_FONT_SIZE: u8 = 30;
pub const FONT_SIZE_STEP: u8 = 2;

/// Presentation order preference per question kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderMode {
    #[default]
    Sequential,
    Random,
}

/// Per-kind ordering preferences, carried in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionOrders {
    #[serde(default)]
    pub single: OrderMode,
    #[serde(default)]
    pub multi: OrderMode,
    #[serde(default)]
    pub judge: OrderMode,
}

/// User-tunable presentation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_font_size")]
    pub question_font_size: u8,
    #[serde(default = "default_font_size")]
    pub option_font_size: u8,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub question_orders: QuestionOrders,
}

fn default_font_size() -> u8 {
    MIN_FONT_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            question_font_size: MIN_FONT_SIZE,
            option_font_size: MIN_FONT_SIZE,
            dark_mode: false,
            question_orders: QuestionOrders::default(),
        }
    }
}

impl Settings {
    /// Bump both font sizes one step. Returns false at the upper bound.
    pub fn increase_font(&mut self) -> bool {
        if self.question_font_size >= MAX_FONT_SIZE {
            return false;
        }
        self.question_font_size += FONT_SIZE_STEP;
        self.option_font_size += FONT_SIZE_STEP;
        true
    }

    /// Drop both font sizes one step. Returns false at the lower bound.
    pub fn decrease_font(&mut self) -> bool {
        if self.question_font_size <= MIN_FONT_SIZE {
            return false;
        }
        self.question_font_size -= FONT_SIZE_STEP;
        self.option_font_size -= FONT_SIZE_STEP;
        true
    }

    /// Flip dark mode, returning the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_size_stays_within_bounds() {
        let mut settings = Settings::default();
        assert!(!settings.decrease_font());
        assert_eq!(settings.question_font_size, MIN_FONT_SIZE);

        while settings.increase_font() {}
        assert_eq!(settings.question_font_size, MAX_FONT_SIZE);
        assert_eq!(settings.option_font_size, MAX_FONT_SIZE);

        assert!(settings.decrease_font());
        assert_eq!(settings.question_font_size, MAX_FONT_SIZE - FONT_SIZE_STEP);
    }

    #[test]
    fn dark_mode_toggles() {
        let mut settings = Settings::default();
        assert!(settings.toggle_dark_mode());
        assert!(!settings.toggle_dark_mode());
    }
}
