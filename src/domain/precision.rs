// Continuous precision scoring against per-field tolerance bands
use super::alignment::AlignmentResult;

/// Tolerance band for each correction value, in the same units as the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub vn: f64,
    pub vf: f64,
    pub hn: f64,
    pub hf: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            vn: 10.0,
            vf: 10.0,
            hn: 50.0,
            hf: 150.0,
        }
    }
}

/// Correction values where any field may be missing, as read back from storage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialResult {
    pub vn: Option<f64>,
    pub vf: Option<f64>,
    pub hn: Option<f64>,
    pub hf: Option<f64>,
}

impl From<AlignmentResult> for PartialResult {
    fn from(result: AlignmentResult) -> Self {
        Self {
            vn: Some(result.vn()),
            vf: Some(result.vf()),
            hn: Some(result.hn()),
            hf: Some(result.hf()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PrecisionScorer {
    tolerances: Tolerances,
}

impl PrecisionScorer {
    pub fn new(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    /// Precision percentage in [0, 100], one decimal place.
    ///
    /// Only finite fields take part and the mean is unweighted over those,
    /// so a result with a single perfect field scores 100. No fields scores 0.
    pub fn score(&self, result: &PartialResult) -> f64 {
        let t = &self.tolerances;
        let scores: Vec<f64> = [
            (result.vn, t.vn),
            (result.vf, t.vf),
            (result.hn, t.hn),
            (result.hf, t.hf),
        ]
        .into_iter()
        .filter_map(|(value, limit)| {
            value
                .filter(|v| v.is_finite())
                .map(|v| field_score(v, limit))
        })
        .collect();

        if scores.is_empty() {
            return 0.0;
        }

        let average = scores.iter().sum::<f64>() / scores.len() as f64;
        round_to_tenth(average * 100.0)
    }
}

fn field_score(value: f64, limit: f64) -> f64 {
    if !limit.is_finite() || limit <= 0.0 {
        return 0.0;
    }
    let relative = value.abs() / limit;
    (1.0 - relative.min(1.0)).max(0.0)
}

/// Round half away from zero to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alignment::{compute, AlignmentInput};

    fn pct(result: &PartialResult) -> f64 {
        PrecisionScorer::default().score(result)
    }

    fn full(vn: f64, vf: f64, hn: f64, hf: f64) -> PartialResult {
        PartialResult {
            vn: Some(vn),
            vf: Some(vf),
            hn: Some(hn),
            hf: Some(hf),
        }
    }

    #[test]
    fn test_reference_score() {
        assert_eq!(pct(&full(15.0, 25.0, 7.5, 12.5)), 44.2);
    }

    #[test]
    fn test_score_from_computed_result() {
        let result = compute(&AlignmentInput {
            r90: 0.0,
            r180: 10.0,
            r270: 5.0,
            f90: 0.0,
            f180: 20.0,
            f270: 10.0,
            h: 100.0,
            d: 50.0,
            e: 100.0,
        })
        .unwrap();
        assert_eq!(pct(&result.into()), 44.2);
    }

    #[test]
    fn test_perfect_alignment_scores_hundred() {
        assert_eq!(pct(&full(0.0, 0.0, 0.0, 0.0)), 100.0);
    }

    #[test]
    fn test_at_tolerance_scores_zero() {
        assert_eq!(pct(&full(10.0, -10.0, 50.0, -150.0)), 0.0);
    }

    #[test]
    fn test_beyond_tolerance_clamps_to_zero() {
        assert_eq!(pct(&full(1e9, -1e9, 1e9, 1e9)), 0.0);
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(pct(&PartialResult::default()), 0.0);
    }

    #[test]
    fn test_non_finite_fields_are_ignored() {
        let result = PartialResult {
            vn: Some(f64::NAN),
            vf: Some(f64::INFINITY),
            hn: None,
            hf: Some(0.0),
        };
        assert_eq!(pct(&result), 100.0);

        let all_bad = PartialResult {
            vn: Some(f64::NAN),
            ..PartialResult::default()
        };
        assert_eq!(pct(&all_bad), 0.0);
    }

    #[test]
    fn test_partial_fields_average_over_present_only() {
        let result = PartialResult {
            vn: Some(5.0),
            hn: Some(0.0),
            ..PartialResult::default()
        };
        // (0.5 + 1.0) / 2
        assert_eq!(pct(&result), 75.0);
    }

    #[test]
    fn test_monotonic_in_absolute_error() {
        let mut previous = f64::INFINITY;
        for step in 0..40 {
            let hn = step as f64 * 2.5;
            let score = pct(&full(1.0, -2.0, -hn, 30.0));
            assert!(score <= previous, "score rose at hn={hn}");
            previous = score;
        }
    }

    #[test]
    fn test_custom_tolerances() {
        let scorer = PrecisionScorer::new(Tolerances {
            vn: 20.0,
            vf: 20.0,
            hn: 100.0,
            hf: 300.0,
        });
        // VN 0.25, VF 0, HN 0.925, HF 0.958333
        assert_eq!(scorer.score(&full(15.0, 25.0, 7.5, 12.5)), 53.3);
    }

    #[test]
    fn test_non_positive_tolerance_scores_field_zero() {
        let scorer = PrecisionScorer::new(Tolerances {
            vn: 0.0,
            ..Tolerances::default()
        });
        let result = PartialResult {
            vn: Some(0.0),
            vf: Some(0.0),
            ..PartialResult::default()
        };
        assert_eq!(scorer.score(&result), 50.0);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(44.166_666), 44.2);
        assert_eq!(round_to_tenth(-0.04), -0.0);
        assert_eq!(round_to_tenth(12.0), 12.0);
    }
}
