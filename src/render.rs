//! Question renderer: project a record and its answer state into the display state
//! the browser paints. Correctness flags and rationales never leave the server; the
//! view only carries marks and feedback once the question has been answered.

use serde::Serialize;

use crate::domain::QuestionRecord;
use crate::evaluate::{choice_mark, feedback_text, AnswerOutcome, ChoiceMark};

pub const EMPTY_POOL_NOTICE: &str = "No questions available for this module.";
pub const LOAD_FAILED_NOTICE: &str = "Could not load questions. Please reload the page to try again.";

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
  Active,
  Empty,
  LoadFailed,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
  pub status: ViewStatus,
  pub prompt: String,
  pub metadata: Option<String>,
  pub hint: Option<String>,
  pub choices: Vec<ChoiceView>,
  pub feedback: Option<FeedbackView>,
  pub next_visible: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ChoiceView {
  pub index: usize,
  pub text: String,
  pub enabled: bool,
  pub mark: Option<ChoiceMark>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FeedbackView {
  pub correct: bool,
  pub text: String,
}

/// Render `record`; with `answer` set the question is locked and shows its outcome.
pub fn render_question(record: &QuestionRecord, answer: Option<&AnswerOutcome>) -> QuestionView {
  let choices = record
    .answer_options
    .iter()
    .enumerate()
    .map(|(index, option)| ChoiceView {
      index,
      text: option.text.clone(),
      enabled: answer.is_none(),
      mark: answer.and_then(|a| choice_mark(record, a, index)),
    })
    .collect();

  QuestionView {
    status: ViewStatus::Active,
    prompt: record.question.clone(),
    metadata: metadata_line(record),
    hint: record.hint_text().map(|h| format!("Hint: {h}")),
    choices,
    feedback: answer.map(|a| FeedbackView { correct: a.correct, text: feedback_text(a) }),
    next_visible: answer.is_some(),
  }
}

pub fn empty_view() -> QuestionView {
  notice_view(ViewStatus::Empty, EMPTY_POOL_NOTICE)
}

pub fn load_failed_view() -> QuestionView {
  notice_view(ViewStatus::LoadFailed, LOAD_FAILED_NOTICE)
}

fn notice_view(status: ViewStatus, prompt: &str) -> QuestionView {
  QuestionView {
    status,
    prompt: prompt.to_string(),
    metadata: None,
    hint: None,
    choices: Vec::new(),
    feedback: None,
    next_visible: false,
  }
}

/// "Question from module MD1 – source", keeping only the parts that exist.
fn metadata_line(record: &QuestionRecord) -> Option<String> {
  let module = record.module_label();
  let source = record.source_label();
  if module.is_none() && source.is_none() {
    return None;
  }

  let mut line = String::from("Question from");
  if let Some(m) = module {
    line.push_str(" module ");
    line.push_str(m);
  }
  if let Some(s) = source {
    line.push_str(" – ");
    line.push_str(s);
  }
  Some(line)
}
