//! Domain models: question records and their answer options, as stored in the question bank.

use serde::{Deserialize, Serialize};

/// One quiz item from the question bank.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
  pub question: String,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub module: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub source: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub hint: Option<String>,
  pub answer_options: Vec<AnswerOption>,

  // Written by the bank builder; carried through untouched.
  #[serde(default, skip_serializing_if = "Option::is_none")] pub difficulty: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub question_number: Option<u32>,
}

/// One selectable choice. Display order is the order in `answer_options`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
  pub text: String,
  pub is_correct: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub rationale: Option<String>,
}

impl QuestionRecord {
  /// Module label, with blank values treated as unfiled.
  pub fn module_label(&self) -> Option<&str> {
    non_blank(self.module.as_deref())
  }

  pub fn source_label(&self) -> Option<&str> {
    non_blank(self.source.as_deref())
  }

  pub fn hint_text(&self) -> Option<&str> {
    non_blank(self.hint.as_deref())
  }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
  s.map(str::trim).filter(|s| !s.is_empty())
}
