//! Game definitions and logic.

mod choice;

pub use choice::{judge, Choice, InvalidChoiceCode};
