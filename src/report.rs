// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 tweetkit contributors

//! Ordered evaluation reports and their append-only log files
//!
//! - `MetricValue`: counts stay integers, scores stay floats
//! - `BasicReport`: the fixed 13-key report, iterated in insertion order
//! - `BinaryEvaluation`: computes reports from parallel {0, 1} label
//!   sequences, renders them as tab-separated text or as the full report,
//!   and appends timestamped blocks to `basic_report.txt` /
//!   `full_report.txt`
//!
//! The log files are opened append-only and never truncated. Writers are
//! not coordinated; concurrent callers must serialize access themselves.

use crate::metrics::{auc, roc_curve, ClassificationSummary, ConfusionMatrix};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// A single report value. Sample counts stay integers and metric scores stay
/// floats, so rendering and serialization preserve the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    Score(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(v) => write!(f, "{}", v),
            MetricValue::Score(v) => write!(f, "{}", v),
        }
    }
}

/// The basic report: metric names mapped to values in a fixed order.
///
/// Backed by a vector of pairs rather than a hash map so iteration and
/// rendering follow insertion order exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicReport {
    entries: Vec<(String, MetricValue)>,
}

impl BasicReport {
    fn push(&mut self, key: &str, value: MetricValue) {
        self.entries.push((key.to_string(), value));
    }

    /// Look a metric up by its report key.
    pub fn get(&self, key: &str) -> Option<MetricValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    /// Entries in report order.
    pub fn iter(&self) -> impl Iterator<Item = &(String, MetricValue)> {
        self.entries.iter()
    }

    /// Render as one `key\tvalue` line per entry, in report order.
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(&format!("{}\t{}\n", key, value));
        }
        out
    }
}

/// Binary-classification evaluation over parallel ground-truth and
/// prediction sequences.
///
/// Inputs are taken as given: values outside {0, 1} and mismatched lengths
/// are not validated and produce garbage metrics, per the input contract.
#[derive(Debug, Clone)]
pub struct BinaryEvaluation {
    gnd_truths: Vec<u8>,
    predictions: Vec<u8>,
}

impl BinaryEvaluation {
    pub fn new(gnd_truths: Vec<u8>, predictions: Vec<u8>) -> Self {
        tracing::debug!(
            "BinaryEvaluation created with {} samples",
            gnd_truths.len()
        );
        Self {
            gnd_truths,
            predictions,
        }
    }

    /// Compute the ordered basic report.
    ///
    /// Keys, in order: Total Samples, Positive Samples, Negative Samples,
    /// True Positive, True Negative, False Positive, False Negative,
    /// Accuracy, Precision, Recall, F1 Measure, Cohen Kappa Score,
    /// Area Under Curve. Score entries are NaN when a denominator is zero.
    pub fn basic_report(&self) -> BasicReport {
        let cm = ConfusionMatrix::from_labels(&self.gnd_truths, &self.predictions);

        let total = self.gnd_truths.len() as u64;
        let positives = self.gnd_truths.iter().filter(|l| **l == 1).count() as u64;

        // The ROC is swept over the binary predictions taken as scores
        let scores: Vec<f64> = self.predictions.iter().map(|p| f64::from(*p)).collect();
        let (fpr, tpr, _thresholds) = roc_curve(&self.gnd_truths, &scores);
        let area = auc(&fpr, &tpr);

        let mut report = BasicReport::default();
        report.push("Total Samples", MetricValue::Count(total));
        report.push("Positive Samples", MetricValue::Count(positives));
        report.push("Negative Samples", MetricValue::Count(total - positives));
        report.push("True Positive", MetricValue::Count(cm.tp as u64));
        report.push("True Negative", MetricValue::Count(cm.tn as u64));
        report.push("False Positive", MetricValue::Count(cm.fp as u64));
        report.push("False Negative", MetricValue::Count(cm.fn_ as u64));
        report.push("Accuracy", MetricValue::Score(cm.accuracy()));
        report.push("Precision", MetricValue::Score(cm.precision()));
        report.push("Recall", MetricValue::Score(cm.recall()));
        report.push("F1 Measure", MetricValue::Score(cm.f1_score()));
        report.push("Cohen Kappa Score", MetricValue::Score(cm.cohen_kappa()));
        report.push("Area Under Curve", MetricValue::Score(area));
        report
    }

    /// The basic report as TSV, a blank line, then the per-class summary
    /// table.
    pub fn full_report(&self) -> String {
        let cm = ConfusionMatrix::from_labels(&self.gnd_truths, &self.predictions);

        let mut out = self.basic_report().to_tsv();
        out.push('\n');
        out.push_str(&ClassificationSummary::from_matrix(&cm).format());
        out
    }

    /// Append the basic report to `basic_report.txt` under `dir`, preceded
    /// by a `============<timestamp>============` header line.
    pub fn save_basic_report(&self, dir: &Path) -> Result<()> {
        let mut block = format!("============{}============\n", timestamp());
        block.push_str(&self.basic_report().to_tsv());
        append_block(&dir.join("basic_report.txt"), &block)
    }

    /// Append the full report to `full_report.txt` under `dir`, preceded by
    /// a `============<model_name>============` line (the name may be
    /// empty) and the timestamp header line.
    pub fn save_full_report(&self, model_name: &str, dir: &Path) -> Result<()> {
        let mut block = format!("============{}============\n", model_name);
        block.push_str(&format!("============{}============\n", timestamp()));
        block.push_str(&self.full_report());
        append_block(&dir.join("full_report.txt"), &block)
    }
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Append one delimited block to a report log. The file is created if
/// missing and never truncated; no locking is taken.
fn append_block(path: &Path, block: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open report log {}", path.display()))?;
    file.write_all(block.as_bytes())
        .with_context(|| format!("Failed to append to report log {}", path.display()))?;
    tracing::info!("Report appended to {}", path.display());
    Ok(())
}
