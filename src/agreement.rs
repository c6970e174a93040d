// ABOUTME: Multi-source agreement scoring over parallel readings of one physical quantity
// ABOUTME: Coefficient of variation inverted onto a 0-100 consensus scale with labels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! Cross-source agreement scoring
//!
//! Given N provider readings of the same quantity (wave height, wind speed,
//! ...), produces a 0-100 measure of how closely the sources agree, derived
//! from their coefficient of variation. Fewer than two readings yield no
//! score rather than a degenerate 100.

use serde::Serialize;

/// Agreement classification thresholds
const HIGH_AGREEMENT_MIN: u8 = 85;
const MODERATE_AGREEMENT_MIN: u8 = 65;

/// Consensus score across independent sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgreementScore {
    /// 0-100, higher means closer agreement
    pub score: u8,
    /// Classification label
    pub label: &'static str,
    /// Display color (hex)
    pub color: &'static str,
    /// Number of sources that reported a value
    pub source_count: usize,
}

/// Score how closely the given readings agree.
///
/// Returns `None` when fewer than two values are present. The score is
/// `clamp(round((1 - cv) * 100), 0, 100)` where `cv` is the population
/// standard deviation divided by the mean; a non-positive mean is treated
/// as perfect agreement to avoid dividing by zero.
#[must_use]
pub fn score(values: &[f64]) -> Option<AgreementScore> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let cv = if mean > 0.0 { variance.sqrt() / mean } else { 0.0 };

    let score = ((1.0 - cv) * 100.0).round().clamp(0.0, 100.0) as u8;

    let (label, color) = if score >= HIGH_AGREEMENT_MIN {
        ("High Agreement", "#689F38")
    } else if score >= MODERATE_AGREEMENT_MIN {
        ("Moderate Agreement", "#FBC02D")
    } else {
        ("Low Agreement", "#F57C00")
    };

    Some(AgreementScore {
        score,
        label,
        color,
        source_count: values.len(),
    })
}

/// Score a set of optional readings, ignoring sources that reported nothing
#[must_use]
pub fn score_present(values: &[Option<f64>]) -> Option<AgreementScore> {
    let present: Vec<f64> = values.iter().copied().flatten().collect();
    score(&present)
}
