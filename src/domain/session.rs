// Multi-step Rim & Face measurement session
use super::alignment::{compute, AlignmentError, AlignmentResult};
use super::report::{Dimensions, IndicatorReadings};
use thiserror::Error;

/// Readings beyond this multiple of the 270 degree reading are out of range.
const RANGE_UPPER_FACTOR: f64 = 1.1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Invalid distance: D cannot be greater than E")]
    InvalidDistance,

    #[error("Missing physical or indicator data")]
    Incomplete,

    #[error(transparent)]
    Alignment(#[from] AlignmentError),
}

/// Step 1: machine geometry, with the optional left-of-coupling feet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalData {
    pub dimensions: Dimensions,
    pub f: Option<f64>,
    pub g: Option<f64>,
}

impl PhysicalData {
    pub fn new(
        dimensions: Dimensions,
        skip_left_side: bool,
        f: Option<f64>,
        g: Option<f64>,
    ) -> Result<Self, SessionError> {
        if dimensions.d > dimensions.e {
            return Err(SessionError::InvalidDistance);
        }
        let (f, g) = if skip_left_side { (None, None) } else { (f, g) };
        Ok(Self { dimensions, f, g })
    }

    pub fn left_side_skipped(&self) -> bool {
        self.f.is_none() && self.g.is_none()
    }
}

/// Step 2: dial readings. 90 degree readings already include SAG.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialReadings {
    pub r0: f64,
    pub f0: f64,
    pub readings: IndicatorReadings,
    pub sag: f64,
}

impl DialReadings {
    /// Apply SAG to the 90 degree rim and face readings.
    pub fn new(r0: f64, f0: f64, mut readings: IndicatorReadings, sag: f64) -> Self {
        readings.r90 += sag;
        readings.f90 += sag;
        Self {
            r0,
            f0,
            readings,
            sag,
        }
    }

    pub fn range_check(&self) -> RangeCheck {
        let r = &self.readings;
        RangeCheck {
            rim180_within: r.r180.abs() <= r.r270.abs() * RANGE_UPPER_FACTOR,
            face180_within: r.f180.abs() <= r.f270.abs() * RANGE_UPPER_FACTOR,
            rim_max: max_abs(&[self.r0, r.r90, r.r180, r.r270]),
            face_max: max_abs(&[self.f0, r.f90, r.f180, r.f270]),
        }
    }
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().map(|v| v.abs()).fold(0.0, f64::max)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeCheck {
    pub rim180_within: bool,
    pub face180_within: bool,
    pub rim_max: f64,
    pub face_max: f64,
}

#[derive(Debug, Clone, Default)]
pub struct RimFaceSession {
    pub id: i64,
    pub machine_name: Option<String>,
    pub description: Option<String>,
    pub physical: Option<PhysicalData>,
    pub dial: Option<DialReadings>,
}

/// Corrections plus the angularity and offset figures shown on the final screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub session_id: i64,
    pub machine_name: Option<String>,
    pub description: Option<String>,
    pub result: AlignmentResult,
    pub left_side_skipped: bool,
    pub angularity_vertical: f64,
    pub offset_vertical: f64,
    pub angularity_horizontal: f64,
    pub offset_horizontal: f64,
}

impl RimFaceSession {
    pub fn calculate(&self) -> Result<SessionOutcome, SessionError> {
        let (physical, dial) = match (&self.physical, &self.dial) {
            (Some(p), Some(d)) => (p, d),
            _ => return Err(SessionError::Incomplete),
        };

        let dims = &physical.dimensions;
        let readings = &dial.readings;
        let result = compute(&readings.with_dimensions(dims))?;

        Ok(SessionOutcome {
            session_id: self.id,
            machine_name: self.machine_name.clone(),
            description: self.description.clone(),
            result,
            left_side_skipped: physical.left_side_skipped(),
            angularity_vertical: readings.f180 / dims.h,
            offset_vertical: result.vf() - result.vn(),
            angularity_horizontal: (readings.f270 - readings.f90) / dims.h,
            offset_horizontal: result.hf() - result.hn(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings() -> IndicatorReadings {
        IndicatorReadings {
            r90: 0.0,
            r180: 10.0,
            r270: 5.0,
            f90: 0.0,
            f180: 20.0,
            f270: 10.0,
        }
    }

    fn dims() -> Dimensions {
        Dimensions {
            h: 100.0,
            d: 50.0,
            e: 100.0,
        }
    }

    #[test]
    fn test_d_greater_than_e_rejected() {
        let bad = Dimensions {
            h: 100.0,
            d: 120.0,
            e: 100.0,
        };
        assert_eq!(
            PhysicalData::new(bad, true, None, None),
            Err(SessionError::InvalidDistance)
        );
    }

    #[test]
    fn test_skip_left_side_drops_f_and_g() {
        let physical = PhysicalData::new(dims(), true, Some(1.0), Some(2.0)).unwrap();
        assert!(physical.left_side_skipped());

        let physical = PhysicalData::new(dims(), false, Some(1.0), Some(2.0)).unwrap();
        assert_eq!(physical.f, Some(1.0));
        assert!(!physical.left_side_skipped());
    }

    #[test]
    fn test_sag_applied_to_90_degree_readings() {
        let dial = DialReadings::new(0.0, 0.0, readings(), 0.5);
        assert_eq!(dial.readings.r90, 0.5);
        assert_eq!(dial.readings.f90, 0.5);
        assert_eq!(dial.readings.r180, 10.0);
    }

    #[test]
    fn test_range_check() {
        let dial = DialReadings::new(-12.0, 1.0, readings(), 0.0);
        let check = dial.range_check();
        // |10| > 1.1 * |5|
        assert!(!check.rim180_within);
        assert!(!check.face180_within);
        assert_eq!(check.rim_max, 12.0);
        assert_eq!(check.face_max, 20.0);

        let mut balanced = readings();
        balanced.r270 = 10.0;
        balanced.f270 = 19.0;
        let check = DialReadings::new(0.0, 0.0, balanced, 0.0).range_check();
        assert!(check.rim180_within);
        assert!(check.face180_within);
    }

    #[test]
    fn test_calculate_requires_both_steps() {
        let session = RimFaceSession {
            physical: Some(PhysicalData::new(dims(), true, None, None).unwrap()),
            ..RimFaceSession::default()
        };
        assert_eq!(session.calculate(), Err(SessionError::Incomplete));
    }

    #[test]
    fn test_calculate_outcome() {
        let session = RimFaceSession {
            id: 1,
            machine_name: Some("Pump 7".to_string()),
            physical: Some(PhysicalData::new(dims(), true, None, None).unwrap()),
            dial: Some(DialReadings::new(0.0, 0.0, readings(), 0.0)),
            ..RimFaceSession::default()
        };
        let outcome = session.calculate().unwrap();
        assert_eq!(outcome.result.vn(), 15.0);
        assert_eq!(outcome.result.hf(), 12.5);
        assert_eq!(outcome.angularity_vertical, 0.2);
        assert_eq!(outcome.offset_vertical, 10.0);
        assert_eq!(outcome.angularity_horizontal, 0.1);
        assert_eq!(outcome.offset_horizontal, 5.0);
        assert!(outcome.left_side_skipped);
        assert_eq!(outcome.session_id, 1);
        assert_eq!(outcome.machine_name.as_deref(), Some("Pump 7"));
        assert_eq!(outcome.description, None);
    }

    #[test]
    fn test_calculate_zero_h() {
        let zero_h = Dimensions {
            h: 0.0,
            d: 1.0,
            e: 2.0,
        };
        let session = RimFaceSession {
            physical: Some(PhysicalData::new(zero_h, true, None, None).unwrap()),
            dial: Some(DialReadings::new(0.0, 0.0, readings(), 0.0)),
            ..RimFaceSession::default()
        };
        assert_eq!(
            session.calculate(),
            Err(SessionError::Alignment(AlignmentError::DivisionByZero))
        );
    }
}
