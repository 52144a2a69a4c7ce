//! Answer evaluation: decide correctness of a pick and phrase the feedback.
//!
//! An `AnswerOutcome` is the lock on a question. Once a session holds one for the
//! current question every choice renders disabled, and the marks and feedback are
//! derived from it alone.

use crate::domain::QuestionRecord;

pub const CORRECT_GLYPH: &str = "✅";
pub const INCORRECT_GLYPH: &str = "❌";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
  pub chosen: usize,
  pub correct: bool,
  pub rationale: String,
}

/// Visual mark on a choice after the question is answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceMark {
  Correct,
  Incorrect,
}

/// Evaluate the pick at `chosen`. `None` if the record has no such option.
pub fn evaluate(record: &QuestionRecord, chosen: usize) -> Option<AnswerOutcome> {
  let option = record.answer_options.get(chosen)?;
  Some(AnswerOutcome {
    chosen,
    correct: option.is_correct,
    rationale: option.rationale.clone().unwrap_or_default(),
  })
}

/// Every correct option is revealed; a wrong pick is additionally marked incorrect.
pub fn choice_mark(record: &QuestionRecord, outcome: &AnswerOutcome, idx: usize) -> Option<ChoiceMark> {
  let is_correct = record.answer_options.get(idx).is_some_and(|o| o.is_correct);
  if is_correct {
    Some(ChoiceMark::Correct)
  } else if idx == outcome.chosen {
    Some(ChoiceMark::Incorrect)
  } else {
    None
  }
}

pub fn feedback_text(outcome: &AnswerOutcome) -> String {
  let text = if outcome.correct {
    format!("{CORRECT_GLYPH} Correct! {}", outcome.rationale)
  } else {
    format!("{INCORRECT_GLYPH} Not quite. {}", outcome.rationale)
  };
  text.trim_end().to_string()
}
