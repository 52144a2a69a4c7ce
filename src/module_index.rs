//! Module index: the distinct, sorted set of module labels offered in the selector.
//!
//! Labels shaped like `MD7` (letters then digits) sort by their number regardless of
//! prefix, so `MD10` comes after `AB5` and `MD2`. Every other label comes after the
//! numbered ones and sorts case-insensitively. The ordering is a total order.

use std::{cmp::Ordering, collections::HashSet};

use crate::domain::QuestionRecord;

/// Distinct non-blank module labels, sorted with [`compare_module_labels`].
/// "All modules" is not a member; it is the absent filter.
pub fn distinct_modules(records: &[QuestionRecord]) -> Vec<String> {
  let set: HashSet<&str> = records.iter().filter_map(QuestionRecord::module_label).collect();
  let mut labels: Vec<String> = set.into_iter().map(str::to_string).collect();
  labels.sort_by(|a, b| compare_module_labels(a, b));
  labels
}

pub fn compare_module_labels(a: &str, b: &str) -> Ordering {
  sort_key(a).cmp(&sort_key(b))
}

/// (unnumbered, digit count, digits, case-folded label, label).
/// Digits have leading zeros stripped, so count then digits orders by value.
type SortKey = (bool, usize, String, String, String);

fn sort_key(label: &str) -> SortKey {
  let folded = label.to_lowercase();
  match split_numeric(label) {
    Some((_, digits)) => {
      let digits = digits.trim_start_matches('0');
      (false, digits.len(), digits.to_string(), folded, label.to_string())
    }
    None => (true, 0, String::new(), folded, label.to_string()),
  }
}

/// Split a `<letters><digits>` label, or `None` if the label has another shape.
fn split_numeric(label: &str) -> Option<(&str, &str)> {
  let split = label.find(|c: char| c.is_ascii_digit())?;
  let (prefix, digits) = label.split_at(split);
  let shaped = !prefix.is_empty()
    && prefix.chars().all(char::is_alphabetic)
    && digits.chars().all(|c| c.is_ascii_digit());
  shaped.then_some((prefix, digits))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::tests::record;

  fn with_modules(modules: &[Option<&str>]) -> Vec<QuestionRecord> {
    modules.iter().map(|m| record("q", *m, &[("a", true)])).collect()
  }

  #[test]
  fn numeric_suffix_ordering_excludes_blank() {
    let records = with_modules(&[Some("MD2"), Some("MD1"), Some("MD10"), Some("")]);
    assert_eq!(distinct_modules(&records), vec!["MD1", "MD2", "MD10"]);
  }

  #[test]
  fn duplicates_and_unfiled_are_dropped() {
    let records = with_modules(&[Some("MD3"), None, Some("MD3"), Some("MD1"), Some("MD3")]);
    assert_eq!(distinct_modules(&records), vec!["MD1", "MD3"]);
  }

  #[test]
  fn numbers_compare_across_prefixes() {
    let records = with_modules(&[Some("AB5"), Some("MD2"), Some("CS10")]);
    assert_eq!(distinct_modules(&records), vec!["MD2", "AB5", "CS10"]);
    assert_eq!(compare_module_labels("MD2", "AB5"), Ordering::Less);
  }

  #[test]
  fn unnumbered_labels_follow_numbered_ones() {
    let records = with_modules(&[Some("Other"), Some("MD9"), Some("algebra"), Some("MD11")]);
    assert_eq!(distinct_modules(&records), vec!["MD9", "MD11", "algebra", "Other"]);
  }

  #[test]
  fn order_stays_total_with_near_numeric_labels() {
    let records = with_modules(&[Some("MD10"), Some("MD1x"), Some("MD2")]);
    assert_eq!(distinct_modules(&records), vec!["MD2", "MD10", "MD1x"]);
  }

  #[test]
  fn compares_long_digit_runs_without_overflow() {
    assert_eq!(compare_module_labels("MD99999999999999999999999", "MD100000000000000000000000"), Ordering::Less);
    assert_eq!(compare_module_labels("MD007", "MD7"), Ordering::Less);
    assert_eq!(compare_module_labels("md2", "MD10"), Ordering::Less);
  }

  #[test]
  fn digits_only_or_trailing_text_is_not_numeric() {
    assert_eq!(split_numeric("12"), None);
    assert_eq!(split_numeric("MD1b"), None);
    assert_eq!(split_numeric("Unit12"), Some(("Unit", "12")));
  }
}
