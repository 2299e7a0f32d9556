//! Ranking classifier scores and printing top-K reports.

use std::cmp::Ordering;
use std::fmt::Write as _;
use std::io::Write;

use crate::error::{Error, Result};

/// Decimal places used for scores unless configured otherwise.
pub const DEFAULT_PRECISION: usize = 4;

/// Largest supported number of decimal places.
pub const MAX_PRECISION: usize = 9;

/// One class in a ranked result. Borrows its label from the caller's list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedEntry<'a> {
    /// 1-based position in the ranking.
    pub rank: usize,
    /// Index into the label list and score vector.
    pub index: usize,
    pub label: &'a str,
    pub score: f32,
}

/// Formatting knobs for [`print_top_classes_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Decimal places for each score.
    pub precision: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

/// Pair labels with scores and sort them best first.
///
/// Higher scores rank first. Equal scores are ordered by label, then by index,
/// so identical input always gives identical output. NaN ranks below every number.
///
/// # Errors
///
/// Returns [`Error::Alignment`] if `labels` and `scores` differ in length.
pub fn rank_classes<'a, S>(labels: &'a [S], scores: &[f32]) -> Result<Vec<RankedEntry<'a>>>
where
    S: AsRef<str>,
{
    if labels.len() != scores.len() {
        return Err(Error::Alignment {
            labels: labels.len(),
            scores: scores.len(),
        });
    }

    let mut entries: Vec<RankedEntry<'a>> = labels
        .iter()
        .zip(scores)
        .enumerate()
        .map(|(index, (label, &score))| RankedEntry {
            rank: 0,
            index,
            label: label.as_ref(),
            score,
        })
        .collect();

    entries.sort_by(|a, b| {
        score_descending(a.score, b.score)
            .then_with(|| a.label.cmp(b.label))
            .then_with(|| a.index.cmp(&b.index))
    });

    for (position, entry) in entries.iter_mut().enumerate() {
        entry.rank = position + 1;
    }

    Ok(entries)
}

fn score_descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Write the `k` highest-scoring classes as `"rank. label — score"` lines.
///
/// `k` larger than the number of classes is clamped. Scores are printed exactly
/// as given with a fixed four decimal places, not four significant digits, so
/// large logits keep their integer part and tiny probabilities may print as `0.0000`.
///
/// # Errors
///
/// Returns [`Error::Alignment`] on a length mismatch, [`Error::InvalidParameter`]
/// if `k` is zero, or [`Error::Io`] if writing fails. Nothing is written on error.
pub fn print_top_classes<S, W>(labels: &[S], scores: &[f32], k: usize, out: &mut W) -> Result<()>
where
    S: AsRef<str>,
    W: Write + ?Sized,
{
    print_top_classes_with(labels, scores, k, ReportOptions::default(), out)
}

/// [`print_top_classes`] with explicit formatting options.
///
/// # Errors
///
/// As [`print_top_classes`], plus [`Error::InvalidParameter`] if the precision
/// exceeds [`MAX_PRECISION`].
pub fn print_top_classes_with<S, W>(
    labels: &[S],
    scores: &[f32],
    k: usize,
    options: ReportOptions,
    out: &mut W,
) -> Result<()>
where
    S: AsRef<str>,
    W: Write + ?Sized,
{
    if k == 0 {
        return Err(Error::InvalidParameter {
            name: "k".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }
    if options.precision > MAX_PRECISION {
        return Err(Error::InvalidParameter {
            name: "precision".to_string(),
            reason: format!("must be at most {MAX_PRECISION}"),
        });
    }

    let ranked = rank_classes(labels, scores)?;
    let report = format_report(&ranked[..k.min(ranked.len())], options.precision);

    out.write_all(report.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn format_report(entries: &[RankedEntry<'_>], precision: usize) -> String {
    let mut report = String::new();
    for entry in entries {
        // Writing into a String cannot fail.
        let _ = writeln!(
            report,
            "{}. {} — {:.*}",
            entry.rank, entry.label, precision, entry.score
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("sink closed"))
        }
    }

    fn report(labels: &[&str], scores: &[f32], k: usize) -> Result<String> {
        let mut out = Vec::new();
        print_top_classes(labels, scores, k, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_ties_broken_by_label() {
        let text = report(&["cat", "dog", "fish"], &[0.2, 0.9, 0.9], 3).unwrap();
        assert_eq!(text, "1. dog — 0.9000\n2. fish — 0.9000\n3. cat — 0.2000\n");
    }

    #[test]
    fn test_mismatched_lengths_write_nothing() {
        let mut out = Vec::new();
        let err = print_top_classes(&["cat", "dog", "fish"], &[0.2, 0.9], 3, &mut out).unwrap_err();
        assert!(matches!(err, Error::Alignment { labels: 3, scores: 2 }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_k_clamped_to_len() {
        let text = report(&["a", "b"], &[0.1, 0.7], 10).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("1. b — 0.7000\n"));
    }

    #[test]
    fn test_writes_exactly_k_lines() {
        let labels = ["l0", "l1", "l2", "l3", "l4", "l5"];
        let scores = [0.05, 0.3, 0.1, 0.25, 0.2, 0.1];
        let text = report(&labels, &scores, 3).unwrap();
        assert_eq!(text, "1. l1 — 0.3000\n2. l3 — 0.2500\n3. l4 — 0.2000\n");
    }

    #[test]
    fn test_zero_k_rejected() {
        let mut out = Vec::new();
        let err = print_top_classes(&["a"], &[1.0], 0, &mut out).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_scores_not_renormalized() {
        let text = report(&["x", "y"], &[12.5, -3.25], 2).unwrap();
        assert_eq!(text, "1. x — 12.5000\n2. y — -3.2500\n");
    }

    #[test]
    fn test_nan_ranks_last() {
        let labels = ["a", "b", "c"];
        let ranked = rank_classes(&labels, &[f32::NAN, -1.0, 0.5]).unwrap();
        let order: Vec<&str> = ranked.iter().map(|e| e.label).collect();
        assert_eq!(order, ["c", "b", "a"]);
        assert_eq!(ranked.iter().map(|e| e.rank).collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn test_duplicate_labels_keep_index_order() {
        let labels = vec!["same".to_string(), "same".to_string()];
        let ranked = rank_classes(&labels, &[0.5, 0.5]).unwrap();
        assert_eq!(ranked[0].index, 0);
        assert_eq!(ranked[1].index, 1);
    }

    #[test]
    fn test_repeated_runs_identical() {
        let labels = ["q", "r", "s", "t"];
        let scores = [0.25, 0.25, 0.25, 0.25];
        assert_eq!(report(&labels, &scores, 4).unwrap(), report(&labels, &scores, 4).unwrap());
    }

    #[test]
    fn test_custom_precision() {
        let mut out = Vec::new();
        let options = ReportOptions { precision: 2 };
        print_top_classes_with(&["only"], &[0.123_456], 1, options, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1. only — 0.12\n");

        let options = ReportOptions { precision: 12 };
        let mut out = Vec::new();
        assert!(print_top_classes_with(&["only"], &[0.1], 1, options, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        let labels: [&str; 0] = [];
        assert_eq!(report(&labels, &[], 5).unwrap(), "");
    }

    #[test]
    fn test_sink_error_surfaces_as_io() {
        let err = print_top_classes(&["a"], &[1.0], 1, &mut FailingSink).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_signed_zeros_tie_by_label() {
        let text = report(&["b", "a"], &[0.0, -0.0], 2).unwrap();
        assert_eq!(text, "1. a — -0.0000\n2. b — 0.0000\n");
    }
}
