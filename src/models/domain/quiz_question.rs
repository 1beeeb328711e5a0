use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

use crate::models::domain::content::{Difficulty, ItemType};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct QuizQuestion {
    pub id: String, // position within its archive entry, assigned on archive
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub concept: String,
    pub difficulty: Difficulty,
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

pub const MIN_CHOICE_OPTIONS: usize = 2;
pub const MAX_CHOICE_OPTIONS: usize = 6;

impl QuizQuestion {
    /// Checks the structural invariants a question must hold before it can be
    /// archived. Returns the reason on failure.
    pub fn check_shape(&self) -> Result<(), String> {
        if self.question_text.trim().is_empty() {
            return Err("question text is empty".to_string());
        }
        if self.correct_answer.trim().is_empty() {
            return Err("correct answer is empty".to_string());
        }
        if self.item_type.is_choice() {
            let count = self.options.len();
            if !(MIN_CHOICE_OPTIONS..=MAX_CHOICE_OPTIONS).contains(&count) {
                return Err(format!(
                    "choice question has {} options, expected {}-{}",
                    count, MIN_CHOICE_OPTIONS, MAX_CHOICE_OPTIONS
                ));
            }
            if !self.options.iter().any(|o| o == &self.correct_answer) {
                return Err("correct answer is not one of the options".to_string());
            }
        }
        Ok(())
    }

    pub fn is_listed_option(&self, answer: &str) -> bool {
        self.options.iter().any(|o| o == answer)
    }
}
