// Alignment service - Use case for one-shot Rim & Face computation
use crate::domain::alignment::{compute_alignment, AlignmentError, AlignmentResult, RawAlignmentInput};
use crate::domain::precision::{PartialResult, PrecisionScorer};

#[derive(Clone)]
pub struct AlignmentService {
    scorer: PrecisionScorer,
}

impl AlignmentService {
    pub fn new(scorer: PrecisionScorer) -> Self {
        Self { scorer }
    }

    pub fn compute(&self, raw: &RawAlignmentInput) -> Result<AlignmentResult, AlignmentError> {
        match compute_alignment(raw) {
            Ok(result) => {
                tracing::debug!(
                    vn = result.vn(),
                    vf = result.vf(),
                    hn = result.hn(),
                    hf = result.hf(),
                    "computed alignment"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::info!("rejected alignment input: {}", e);
                Err(e)
            }
        }
    }

    pub fn precision(&self, result: &PartialResult) -> f64 {
        self.scorer.score(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alignment::RawReading;

    #[test]
    fn test_compute_and_score() {
        let n = |v: f64| Some(RawReading::Number(v));
        let raw = RawAlignmentInput {
            r90: n(0.0),
            r180: n(10.0),
            r270: n(5.0),
            f90: n(0.0),
            f180: Some(RawReading::Text("20".to_string())),
            f270: n(10.0),
            h: n(100.0),
            d: n(50.0),
            e: n(100.0),
        };
        let service = AlignmentService::new(PrecisionScorer::default());
        let result = service.compute(&raw).unwrap();
        assert_eq!(result.vf(), 25.0);
        assert_eq!(service.precision(&result.into()), 44.2);
    }

    #[test]
    fn test_rejects_missing_input() {
        let service = AlignmentService::new(PrecisionScorer::default());
        assert_eq!(
            service.compute(&RawAlignmentInput::default()),
            Err(AlignmentError::InvalidInput { field: "R90" })
        );
    }
}
