//! Quiz session: filter, shuffled working set, position, and the lock on the current
//! question. One session belongs to one client connection and is driven by that
//! client's events in order, so it holds no locks.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::domain::QuestionRecord;
use crate::evaluate::{evaluate, AnswerOutcome};
use crate::render::{empty_view, render_question, QuestionView};
use crate::store::QuestionStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
  #[error("no active question")]
  NoActiveQuestion,
  #[error("answer index {index} is out of range ({count} choices)")]
  NoSuchChoice { index: usize, count: usize },
}

/// Result of moving past the current question.
#[derive(Debug, PartialEq, Eq)]
pub enum Advance {
  Next(QuestionView),
  /// The working set was exhausted; the session has already restarted with the same filter.
  Completed { total: usize, view: QuestionView },
}

pub struct QuizSession {
  store: QuestionStore,
  rng: StdRng,
  active_filter: Option<String>,
  /// Indices into the store; rebuilt in full on every start.
  working_set: Vec<usize>,
  position: usize,
  answer: Option<AnswerOutcome>,
}

impl QuizSession {
  /// A session that has not started yet; call [`QuizSession::start`] first.
  pub fn new(store: QuestionStore, seed: Option<u64>) -> Self {
    let rng = match seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    Self { store, rng, active_filter: None, working_set: Vec::new(), position: 0, answer: None }
  }

  /// Rebuild the working set for `filter` (`None` = all modules) and show its first question.
  #[instrument(level = "debug", skip(self))]
  pub fn start(&mut self, filter: Option<String>) -> QuestionView {
    self.active_filter = filter.filter(|f| !f.trim().is_empty());
    self.answer = None;
    self.position = 0;

    let filter = self.active_filter.as_deref();
    self.working_set = self
      .store
      .records()
      .iter()
      .enumerate()
      .filter(|(_, r)| filter.is_none() || r.module_label() == filter)
      .map(|(idx, _)| idx)
      .collect();
    self.working_set.shuffle(&mut self.rng);

    info!(target: "quiz", filter = ?self.active_filter, questions = self.working_set.len(), "Quiz started");
    self.view()
  }

  /// Lock the current question on the pick at `index`. Repeat picks leave the view as it was.
  #[instrument(level = "debug", skip(self))]
  pub fn select_answer(&mut self, index: usize) -> Result<QuestionView, SessionError> {
    let record = self.current().ok_or(SessionError::NoActiveQuestion)?;

    if let Some(previous) = &self.answer {
      debug!(target: "quiz", index, chosen = previous.chosen, "Question already answered; pick ignored");
      return Ok(self.view());
    }

    let outcome = evaluate(record, index)
      .ok_or(SessionError::NoSuchChoice { index, count: record.answer_options.len() })?;
    info!(target: "quiz", position = self.position, index, correct = outcome.correct, "Answer selected");
    self.answer = Some(outcome);
    Ok(self.view())
  }

  /// Move to the next question, or restart with a fresh shuffle once the set is exhausted.
  #[instrument(level = "debug", skip(self))]
  pub fn advance(&mut self) -> Result<Advance, SessionError> {
    if self.working_set.is_empty() {
      return Err(SessionError::NoActiveQuestion);
    }

    self.position += 1;
    self.answer = None;
    if self.position < self.working_set.len() {
      return Ok(Advance::Next(self.view()));
    }

    let total = self.working_set.len();
    info!(target: "quiz", filter = ?self.active_filter, total, "Quiz complete; restarting");
    let view = self.start(self.active_filter.clone());
    Ok(Advance::Completed { total, view })
  }

  /// Display state for wherever the session currently is.
  pub fn view(&self) -> QuestionView {
    match self.current() {
      Some(record) => render_question(record, self.answer.as_ref()),
      None => empty_view(),
    }
  }

  pub fn current(&self) -> Option<&QuestionRecord> {
    self.working_set.get(self.position).and_then(|&idx| self.store.get(idx))
  }

  pub fn active_filter(&self) -> Option<&str> {
    self.active_filter.as_deref()
  }

  pub fn position(&self) -> usize {
    self.position
  }

  /// Records of the working set in presentation order.
  pub fn working_set(&self) -> impl Iterator<Item = &QuestionRecord> + '_ {
    self.working_set.iter().filter_map(|&idx| self.store.get(idx))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::tests::record;
  use crate::evaluate::ChoiceMark;
  use crate::render::ViewStatus;

  fn store() -> QuestionStore {
    QuestionStore::from_records(vec![
      record("m1-a", Some("MD1"), &[("x", true), ("y", false)]),
      record("m2-a", Some("MD2"), &[("x", false), ("y", true)]),
      record("m1-b", Some("MD1"), &[("x", true), ("y", false), ("z", true)]),
      record("unfiled", None, &[("x", true)]),
      record("m2-b", Some("MD2"), &[("x", true)]),
    ])
    .unwrap()
  }

  fn prompts(session: &QuizSession) -> Vec<String> {
    let mut p: Vec<String> = session.working_set().map(|r| r.question.clone()).collect();
    p.sort();
    p
  }

  #[test]
  fn start_without_filter_uses_every_record_once() {
    let mut s = QuizSession::new(store(), Some(7));
    let view = s.start(None);

    assert_eq!(view.status, ViewStatus::Active);
    assert_eq!(s.position(), 0);
    assert_eq!(prompts(&s), vec!["m1-a", "m1-b", "m2-a", "m2-b", "unfiled"]);
  }

  #[test]
  fn start_with_filter_partitions_exactly() {
    let mut s = QuizSession::new(store(), Some(7));
    s.start(Some("MD2".into()));

    assert_eq!(s.active_filter(), Some("MD2"));
    assert_eq!(prompts(&s), vec!["m2-a", "m2-b"]);
    assert!(s.working_set().all(|r| r.module.as_deref() == Some("MD2")));
  }

  #[test]
  fn shuffle_changes_order_across_seeds() {
    let records: Vec<_> = (0..20).map(|i| record(&format!("q{i}"), None, &[("a", true)])).collect();
    let store = QuestionStore::from_records(records).unwrap();
    let order = |seed| {
      let mut s = QuizSession::new(store.clone(), Some(seed));
      s.start(None);
      s.working_set().map(|r| r.question.clone()).collect::<Vec<_>>()
    };

    assert_eq!(order(1), order(1));
    assert_ne!(order(1), order(2));
  }

  #[test]
  fn unknown_module_gives_empty_state() {
    let mut s = QuizSession::new(store(), Some(7));
    let view = s.start(Some("MD9".into()));

    assert_eq!(view.status, ViewStatus::Empty);
    assert!(view.choices.is_empty());
    assert!(!view.next_visible);
    assert_eq!(s.working_set().count(), 0);
    assert!(s.current().is_none());
    assert_eq!(s.select_answer(0), Err(SessionError::NoActiveQuestion));
    assert_eq!(s.advance(), Err(SessionError::NoActiveQuestion));
  }

  #[test]
  fn second_pick_does_not_change_anything() {
    let mut s = QuizSession::new(store(), Some(7));
    s.start(Some("MD1".into()));

    let first = s.select_answer(1).unwrap();
    let second = s.select_answer(0).unwrap();

    assert_eq!(first, second);
    assert!(first.choices.iter().all(|c| !c.enabled));
    assert!(first.next_visible);
  }

  #[test]
  fn every_correct_option_is_revealed() {
    let mut s = QuizSession::new(store(), Some(7));
    s.start(Some("MD1".into()));
    let current = s.current().unwrap().clone();

    let view = s.select_answer(1).unwrap();
    for (choice, option) in view.choices.iter().zip(&current.answer_options) {
      if option.is_correct {
        assert_eq!(choice.mark, Some(ChoiceMark::Correct));
      }
    }
  }

  #[test]
  fn out_of_range_pick_is_rejected_without_locking() {
    let mut s = QuizSession::new(store(), Some(7));
    s.start(None);

    let count = s.current().unwrap().answer_options.len();
    assert_eq!(s.select_answer(99), Err(SessionError::NoSuchChoice { index: 99, count }));
    assert!(s.view().choices.iter().all(|c| c.enabled));
  }

  #[test]
  fn advancing_clears_previous_answer() {
    let mut s = QuizSession::new(store(), Some(7));
    s.start(None);
    s.select_answer(0).unwrap();

    let Advance::Next(view) = s.advance().unwrap() else { panic!("expected next question") };
    assert_eq!(s.position(), 1);
    assert!(view.feedback.is_none());
    assert!(!view.next_visible);
    assert!(view.choices.iter().all(|c| c.enabled && c.mark.is_none()));
  }

  #[test]
  fn exhausting_the_set_restarts_with_same_filter() {
    let mut s = QuizSession::new(store(), Some(7));
    s.start(Some("MD2".into()));
    assert_eq!(s.position(), 0);

    assert!(matches!(s.advance().unwrap(), Advance::Next(_)));
    let Advance::Completed { total, view } = s.advance().unwrap() else { panic!("expected completion") };

    assert_eq!(total, 2);
    assert_eq!(view.status, ViewStatus::Active);
    assert_eq!(s.position(), 0);
    assert_eq!(s.active_filter(), Some("MD2"));
    assert_eq!(prompts(&s), vec!["m2-a", "m2-b"]);
  }

  #[test]
  fn changing_filter_discards_answer_state() {
    let mut s = QuizSession::new(store(), Some(7));
    s.start(Some("MD1".into()));
    s.select_answer(0).unwrap();

    let view = s.start(None);
    assert!(view.feedback.is_none());
    assert_eq!(s.active_filter(), None);
    assert_eq!(s.working_set().count(), 5);
  }
}
