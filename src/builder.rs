//! Question bank builder: turns plain-text quiz files into the JSON bank the player loads.
//!
//! Input format, one file per quiz, blocks separated by blank lines:
//!
//! ```text
//! Q1. Question text...
//!    A. Option text...
//!    B. Option text...
//!
//!    Answer: B
//!    Explanation: Explanation text...
//! ```
//!
//! Module and difficulty are inferred from the file name (`MD3 TB hard.txt`).

use std::{
  path::{Path, PathBuf},
  sync::LazyLock,
};

use regex::Regex;
use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::{AnswerOption, QuestionRecord};

static MODULE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(?:md|mod)\s*0?(\d+)").unwrap());
static BLOCK_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Q\d+\.").unwrap());
static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^Q(\d+)\.\s*(.*)$").unwrap());
static OPTION_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^[A-D]\.").unwrap());
static OPTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^([A-D])\.\s*(.*)$").unwrap());
static ANSWER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^answer:\s*([A-D])").unwrap());
static EXPLANATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^explanation:\s*").unwrap());

#[derive(Debug, Error)]
pub enum BuildError {
  #[error("failed to read quiz directory {path}: {source}")]
  ReadDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to read quiz file {path}: {source}")]
  ReadFile {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to write question bank {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to serialize question bank: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// `MD<n>` from names like "MD1 TB", "MD 1 TB", "mod 9 tb" or "Mod10"; otherwise "Other".
pub fn extract_module(source_name: &str) -> String {
  MODULE_RE
    .captures(source_name)
    .and_then(|c| c[1].parse::<u64>().ok())
    .map(|n| format!("MD{n}"))
    .unwrap_or_else(|| "Other".into())
}

pub fn extract_difficulty(source_name: &str) -> &'static str {
  let lower = source_name.to_lowercase();
  if lower.contains("hard") {
    "Hard"
  } else if lower.contains("medium") || lower.contains("med ") || lower.contains(" tb med") {
    "Medium"
  } else if lower.contains("easy") {
    "Easy"
  } else {
    "Unknown"
  }
}

/// Parse one quiz file. Blocks without options or without an answer letter are skipped.
pub fn parse_quiz_text(text: &str, source_name: &str) -> Vec<QuestionRecord> {
  let text = text.replace("\r\n", "\n");
  let text = text.trim();
  if text.is_empty() {
    return Vec::new();
  }

  let module = extract_module(source_name);
  let difficulty = extract_difficulty(source_name);

  split_blocks(text)
    .iter()
    .filter_map(|block| parse_block(block))
    .map(|parsed| QuestionRecord {
      question: parsed.question,
      module: Some(module.clone()),
      source: Some(source_name.to_string()),
      hint: None,
      answer_options: parsed.options,
      difficulty: Some(difficulty.to_string()),
      question_number: parsed.number,
    })
    .collect()
}

/// A new block begins at a `Q<n>.` line that follows a blank line.
/// Lines are trimmed and blank lines dropped.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
  let mut blocks: Vec<Vec<&str>> = vec![Vec::new()];
  let mut after_blank = false;

  for raw in text.split('\n') {
    let line = raw.trim();
    if line.is_empty() {
      after_blank = true;
      continue;
    }
    let current_is_empty = blocks.last().is_some_and(Vec::is_empty);
    if after_blank && BLOCK_START_RE.is_match(raw) && !current_is_empty {
      blocks.push(Vec::new());
    }
    after_blank = false;
    if let Some(block) = blocks.last_mut() {
      block.push(line);
    }
  }

  blocks.retain(|b| !b.is_empty());
  blocks
}

struct ParsedBlock {
  question: String,
  number: Option<u32>,
  options: Vec<AnswerOption>,
}

fn is_answer_line(line: &str) -> bool {
  line.to_lowercase().starts_with("answer:")
}

fn is_explanation_line(line: &str) -> bool {
  line.to_lowercase().starts_with("explanation:")
}

fn parse_block(lines: &[&str]) -> Option<ParsedBlock> {
  let (first, rest) = lines.split_first()?;
  let mut idx = 0;

  let (number, mut question) = match QUESTION_RE.captures(first) {
    Some(c) => (c[1].parse::<u32>().ok(), c[2].to_string()),
    None => (None, first.to_string()),
  };
  // The question may wrap onto further lines.
  while idx < rest.len() && !OPTION_START_RE.is_match(rest[idx]) && !is_answer_line(rest[idx]) {
    question.push(' ');
    question.push_str(rest[idx]);
    idx += 1;
  }

  let mut options: Vec<(String, String)> = Vec::new();
  while idx < rest.len() && OPTION_START_RE.is_match(rest[idx]) {
    let caps = OPTION_RE.captures(rest[idx]);
    idx += 1;
    let Some(caps) = caps else { continue };
    let letter = caps[1].to_uppercase();
    let mut text = caps[2].to_string();
    while idx < rest.len()
      && !OPTION_START_RE.is_match(rest[idx])
      && !is_answer_line(rest[idx])
      && !is_explanation_line(rest[idx])
    {
      text.push(' ');
      text.push_str(rest[idx]);
      idx += 1;
    }
    options.push((letter, text));
  }

  let mut answer: Option<String> = None;
  if let Some(pos) = rest[idx..].iter().position(|l| ANSWER_RE.is_match(l)) {
    let line = rest[idx + pos];
    answer = ANSWER_RE.captures(line).map(|c| c[1].to_uppercase());
    idx += pos + 1;
  }

  let mut explanation: Option<String> = None;
  for line in &rest[idx..] {
    if is_explanation_line(line) {
      explanation = Some(EXPLANATION_RE.replace(line, "").into_owned());
    } else if let Some(exp) = explanation.as_mut() {
      exp.push(' ');
      exp.push_str(line);
    }
  }

  let answer = answer?;
  if options.is_empty() {
    return None;
  }
  let rationale = explanation.unwrap_or_default();

  Some(ParsedBlock {
    question,
    number,
    options: options
      .into_iter()
      .map(|(letter, text)| AnswerOption { text, is_correct: letter == answer, rationale: Some(rationale.clone()) })
      .collect(),
  })
}

/// Parse every `*.txt` in `input` (sorted by name) and write the combined bank to `output`.
/// Returns the number of questions written.
#[instrument(level = "info", skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn build_bank(input: &Path, output: &Path) -> Result<usize, BuildError> {
  let entries = std::fs::read_dir(input).map_err(|source| BuildError::ReadDir { path: input.to_path_buf(), source })?;
  let mut files: Vec<PathBuf> = entries
    .filter_map(|e| e.ok().map(|e| e.path()))
    .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
    .collect();
  files.sort();

  let mut all = Vec::new();
  for path in &files {
    let text = std::fs::read_to_string(path).map_err(|source| BuildError::ReadFile { path: path.clone(), source })?;
    let source_name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let questions = parse_quiz_text(&text, &source_name);
    info!(target: "quiz_player", file = %path.display(), parsed = questions.len(), "Quiz file parsed");
    all.extend(questions);
  }

  let json = serde_json::to_string_pretty(&all)?;
  std::fs::write(output, json).map_err(|source| BuildError::Write { path: output.to_path_buf(), source })?;
  info!(target: "quiz_player", total = all.len(), "Question bank written");
  Ok(all.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = "Q1. What colour is the sky\r\non a clear day?\r\n   A. Green\r\n   B. Blue\r\n   C. Red\r\n\r\n   Answer: B\r\n   Explanation: Rayleigh scattering\r\n   favours blue light.\r\n\r\nQ2. Pick the prime.\n   a. 4\n   b. 7\n   which is odd\n\n   Answer: b\n\nQ3. Broken block without answer\n   A. yes\n   B. no\n";

  #[test]
  fn module_names_are_normalized() {
    assert_eq!(extract_module("MD1 TB hard"), "MD1");
    assert_eq!(extract_module("MD 1 TB"), "MD1");
    assert_eq!(extract_module("mod 09 tb"), "MD9");
    assert_eq!(extract_module("Mod10 review"), "MD10");
    assert_eq!(extract_module("final review"), "Other");
  }

  #[test]
  fn difficulty_from_name() {
    assert_eq!(extract_difficulty("MD1 TB Hard"), "Hard");
    assert_eq!(extract_difficulty("MD1 TB med set"), "Medium");
    assert_eq!(extract_difficulty("MD2 medium"), "Medium");
    assert_eq!(extract_difficulty("MD3 easy"), "Easy");
    assert_eq!(extract_difficulty("MD4"), "Unknown");
  }

  #[test]
  fn parses_blocks_with_wrapping_and_skips_malformed() {
    let qs = parse_quiz_text(SAMPLE, "MD2 TB easy");
    assert_eq!(qs.len(), 2);

    let q1 = &qs[0];
    assert_eq!(q1.question, "What colour is the sky on a clear day?");
    assert_eq!(q1.question_number, Some(1));
    assert_eq!(q1.module.as_deref(), Some("MD2"));
    assert_eq!(q1.difficulty.as_deref(), Some("Easy"));
    assert_eq!(q1.source.as_deref(), Some("MD2 TB easy"));
    let texts: Vec<&str> = q1.answer_options.iter().map(|o| o.text.as_str()).collect();
    assert_eq!(texts, vec!["Green", "Blue", "Red"]);
    let correct: Vec<bool> = q1.answer_options.iter().map(|o| o.is_correct).collect();
    assert_eq!(correct, vec![false, true, false]);
    assert_eq!(
      q1.answer_options[0].rationale.as_deref(),
      Some("Rayleigh scattering favours blue light.")
    );

    let q2 = &qs[1];
    assert_eq!(q2.answer_options[1].text, "7 which is odd");
    assert!(q2.answer_options[1].is_correct);
    assert_eq!(q2.answer_options[0].rationale.as_deref(), Some(""));
  }

  #[test]
  fn empty_text_has_no_questions() {
    assert!(parse_quiz_text("  \r\n ", "MD1").is_empty());
  }

  #[test]
  fn builds_bank_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("MD2 TB easy.txt"), SAMPLE).unwrap();
    std::fs::write(dir.path().join("MD1 TB hard.txt"), "Q1. Only one?\nA. yes\nAnswer: A\n").unwrap();
    std::fs::write(dir.path().join("notes.md"), "Q1. ignored\nA. x\nAnswer: A").unwrap();
    let output = dir.path().join("questions.json");

    let total = build_bank(dir.path(), &output).unwrap();
    assert_eq!(total, 3);

    let written: Vec<QuestionRecord> = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written[0].source.as_deref(), Some("MD1 TB hard"));
    assert_eq!(written[0].difficulty.as_deref(), Some("Hard"));
    assert_eq!(written[1].module.as_deref(), Some("MD2"));
  }
}
