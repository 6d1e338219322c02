// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 tweetkit contributors

//! Evaluation metrics for binary tweet classification
//!
//! Implements the standard metric set:
//! - Confusion matrix over raw {0, 1} label sequences
//! - Accuracy, Precision, Recall, Specificity, F1-Score
//! - Cohen's kappa (chance-corrected agreement)
//! - ROC curve and AUC (threshold sweep, trapezoidal rule)
//! - Per-class classification summary
//!
//! All metrics are computed in `f64`. A zero denominator yields IEEE NaN,
//! which propagates to the caller rather than being masked or raised.

use serde::{Deserialize, Serialize};

/// Confusion matrix for binary classification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// True Positives (predicted 1, actually 1)
    pub tp: usize,
    /// True Negatives (predicted 0, actually 0)
    pub tn: usize,
    /// False Positives (predicted 1, actually 0)
    pub fp: usize,
    /// False Negatives (predicted 0, actually 1)
    pub fn_: usize,
}

impl ConfusionMatrix {
    /// Count confusion cells from parallel ground-truth and prediction slices.
    ///
    /// Inputs are not validated: the zipped common prefix is counted, and
    /// values outside {0, 1} land in no cell.
    pub fn from_labels(gnd_truths: &[u8], predictions: &[u8]) -> Self {
        let mut matrix = Self::default();

        for (truth, pred) in gnd_truths.iter().zip(predictions.iter()) {
            match (*pred, *truth) {
                (1, 1) => matrix.tp += 1,
                (0, 0) => matrix.tn += 1,
                (1, 0) => matrix.fp += 1,
                (0, 1) => matrix.fn_ += 1,
                // Non-binary values are outside the input contract
                _ => {}
            }
        }

        matrix
    }

    /// Total number of counted samples
    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    /// Ground-truth positives in this matrix's view: TP + FN
    pub fn support(&self) -> usize {
        self.tp + self.fn_
    }

    /// Accuracy: (TP + TN) / Total. NaN on an empty matrix.
    pub fn accuracy(&self) -> f64 {
        (self.tp + self.tn) as f64 / self.total() as f64
    }

    /// Precision: TP / (TP + FP). NaN when nothing was predicted positive.
    pub fn precision(&self) -> f64 {
        self.tp as f64 / (self.tp + self.fp) as f64
    }

    /// Recall (Sensitivity): TP / (TP + FN). NaN when no positives exist.
    pub fn recall(&self) -> f64 {
        self.tp as f64 / (self.tp + self.fn_) as f64
    }

    /// Specificity: TN / (TN + FP). NaN when no negatives exist.
    pub fn specificity(&self) -> f64 {
        self.tn as f64 / (self.tn + self.fp) as f64
    }

    /// F1 Score: 2 * (Precision * Recall) / (Precision + Recall).
    /// NaN when precision and recall are both zero or either is NaN.
    pub fn f1_score(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        2.0 * precision * recall / (precision + recall)
    }

    /// Cohen's kappa: chance-corrected agreement between the two raters
    /// (predictions and ground truth).
    ///
    /// kappa = (po - pe) / (1 - pe), with observed agreement po and expected
    /// chance agreement pe taken from the marginals. NaN on an empty matrix
    /// and on total agreement within a single class (pe == 1).
    pub fn cohen_kappa(&self) -> f64 {
        let n = self.total() as f64;
        let po = (self.tp + self.tn) as f64 / n;
        let pe = ((self.tp + self.fp) as f64 * (self.tp + self.fn_) as f64
            + (self.fn_ + self.tn) as f64 * (self.fp + self.tn) as f64)
            / (n * n);
        (po - pe) / (1.0 - pe)
    }

    /// The same counts viewed with `class` as the positive label.
    ///
    /// `for_class(1)` is the identity; `for_class(0)` swaps TP with TN and
    /// FP with FN so that precision/recall/F1 read as the one-vs-rest
    /// metrics of the negative class.
    pub fn for_class(&self, class: u8) -> ConfusionMatrix {
        if class == 0 {
            ConfusionMatrix {
                tp: self.tn,
                tn: self.tp,
                fp: self.fn_,
                fn_: self.fp,
            }
        } else {
            self.clone()
        }
    }
}

/// Precision/recall/F1/support for one class (or one averaging row)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

impl ClassMetrics {
    /// Read the one-vs-rest metrics off a (possibly class-swapped) matrix.
    pub fn from_matrix(cm: &ConfusionMatrix) -> Self {
        Self {
            precision: cm.precision(),
            recall: cm.recall(),
            f1_score: cm.f1_score(),
            support: cm.support(),
        }
    }
}

/// Per-class breakdown plus accuracy and averaging rows, i.e. the standard
/// text classification summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationSummary {
    /// Per-class rows in label order ("0", then "1")
    pub classes: Vec<(String, ClassMetrics)>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationSummary {
    /// Build the summary for both binary classes from one confusion matrix.
    pub fn from_matrix(cm: &ConfusionMatrix) -> Self {
        let classes: Vec<(String, ClassMetrics)> = [0u8, 1]
            .iter()
            .map(|class| {
                let view = cm.for_class(*class);
                (class.to_string(), ClassMetrics::from_matrix(&view))
            })
            .collect();

        let total = cm.total();
        let n_classes = classes.len() as f64;

        let macro_avg = ClassMetrics {
            precision: classes.iter().map(|(_, m)| m.precision).sum::<f64>() / n_classes,
            recall: classes.iter().map(|(_, m)| m.recall).sum::<f64>() / n_classes,
            f1_score: classes.iter().map(|(_, m)| m.f1_score).sum::<f64>() / n_classes,
            support: total,
        };

        let weighted = |value: fn(&ClassMetrics) -> f64| {
            classes
                .iter()
                .map(|(_, m)| value(m) * m.support as f64)
                .sum::<f64>()
                / total as f64
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1_score: weighted(|m| m.f1_score),
            support: total,
        };

        Self {
            classes,
            accuracy: cm.accuracy(),
            macro_avg,
            weighted_avg,
        }
    }

    /// Format as the standard aligned table: one row per class, a blank
    /// separator, then accuracy / macro avg / weighted avg rows.
    pub fn format(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{:>12}  {:>9} {:>9} {:>9} {:>9}\n",
            "", "precision", "recall", "f1-score", "support"
        ));
        out.push('\n');

        for (name, m) in &self.classes {
            out.push_str(&Self::format_row(name, m));
        }
        out.push('\n');

        let support = self.macro_avg.support;
        out.push_str(&format!(
            "{:>12}  {:>9} {:>9} {:>9.2} {:>9}\n",
            "accuracy", "", "", self.accuracy, support
        ));
        out.push_str(&Self::format_row("macro avg", &self.macro_avg));
        out.push_str(&Self::format_row("weighted avg", &self.weighted_avg));

        out
    }

    fn format_row(name: &str, m: &ClassMetrics) -> String {
        format!(
            "{:>12}  {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
            name, m.precision, m.recall, m.f1_score, m.support
        )
    }
}

/// ROC curve for binary ground truth against real-valued scores.
///
/// Sweeps the distinct score values in descending order, grouping ties per
/// threshold, and returns parallel (FPR, TPR, thresholds) vectors anchored at
/// (0, 0) with threshold +inf. Rates are NaN when a class is absent.
pub fn roc_curve(actual: &[u8], scores: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut pairs: Vec<(u8, f64)> = actual
        .iter()
        .copied()
        .zip(scores.iter().copied())
        .collect();
    pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let n_pos = pairs.iter().filter(|(label, _)| *label == 1).count() as f64;
    let n_neg = pairs.len() as f64 - n_pos;

    let mut fpr = vec![0.0];
    let mut tpr = vec![0.0];
    let mut thresholds = vec![f64::INFINITY];

    let mut tp = 0.0;
    let mut fp = 0.0;
    let mut i = 0;
    while i < pairs.len() {
        let threshold = pairs[i].1;
        // Consume every sample tied at this threshold before emitting a
        // point. Each pass consumes at least one sample; a NaN score never
        // compares equal, so it forms a singleton group.
        loop {
            if pairs[i].0 == 1 {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            i += 1;
            if i >= pairs.len() || pairs[i].1 != threshold {
                break;
            }
        }
        fpr.push(fp / n_neg);
        tpr.push(tp / n_pos);
        thresholds.push(threshold);
    }

    (fpr, tpr, thresholds)
}

/// Area under a curve given as parallel x/y vectors, by the trapezoidal rule.
pub fn auc(x: &[f64], y: &[f64]) -> f64 {
    let mut area = 0.0;
    for i in 1..x.len().min(y.len()) {
        area += (x[i] - x[i - 1]) * (y[i] + y[i - 1]) / 2.0;
    }
    area
}
