// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 tweetkit contributors

//! Evaluation, persistence and text-cleaning utilities for tweet
//! classification models
//!
//! This crate provides three independent utilities:
//! - Evaluation metrics for binary classifiers (confusion counts, Accuracy,
//!   Precision, Recall, F1, Cohen's kappa, AUC-ROC) with ordered reports
//!   appended to plain-text log files
//! - A four-artifact model store persisting tokenizer state, model
//!   architecture, weights and the maximum sequence length
//! - A tweet normalizer applying a fixed substitution chain (mis-encoding
//!   fixups, sentinel markers for retweets/mentions/URLs, repeat collapsing,
//!   lowercasing)

pub mod metrics;
pub mod normalizer;
pub mod persistence;
pub mod report;

pub use metrics::{auc, roc_curve, ClassMetrics, ClassificationSummary, ConfusionMatrix};
pub use normalizer::{clean_non_ascii, TweetNormalizer};
pub use persistence::{ModelStore, PersistableModel, TokenizerState};
pub use report::{BasicReport, BinaryEvaluation, MetricValue};
