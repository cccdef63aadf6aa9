// Rim & Face alignment calculation
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
    #[error("invalid input: {field}")]
    InvalidInput { field: &'static str },

    #[error("H cannot be zero")]
    DivisionByZero,
}

/// A single reading as it arrived from a client, before numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawReading {
    Number(f64),
    Text(String),
    /// Anything that is neither a number nor a string (bool, array, object)
    Other,
}

impl RawReading {
    /// Coerce to a finite number. Blank text never becomes zero.
    pub fn to_finite(&self) -> Option<f64> {
        let value = match self {
            RawReading::Number(n) => *n,
            RawReading::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok()?
            }
            RawReading::Other => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// Coerce a required reading, naming the field when it is missing or not numeric.
pub fn require_finite(field: &'static str, raw: Option<&RawReading>) -> Result<f64, AlignmentError> {
    raw.and_then(RawReading::to_finite)
        .ok_or(AlignmentError::InvalidInput { field })
}

/// Coerce an optional reading; absent means `default`, present but invalid is an error.
pub fn optional_finite(
    field: &'static str,
    raw: Option<&RawReading>,
    default: f64,
) -> Result<f64, AlignmentError> {
    match raw {
        None => Ok(default),
        Some(reading) => require_finite(field, Some(reading)),
    }
}

/// Unvalidated alignment input; `None` means the field was absent or null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAlignmentInput {
    pub r90: Option<RawReading>,
    pub r180: Option<RawReading>,
    pub r270: Option<RawReading>,
    pub f90: Option<RawReading>,
    pub f180: Option<RawReading>,
    pub f270: Option<RawReading>,
    pub h: Option<RawReading>,
    pub d: Option<RawReading>,
    pub e: Option<RawReading>,
}

impl RawAlignmentInput {
    fn fields(&self) -> [(&'static str, Option<&RawReading>); 9] {
        [
            ("R90", self.r90.as_ref()),
            ("R180", self.r180.as_ref()),
            ("R270", self.r270.as_ref()),
            ("F90", self.f90.as_ref()),
            ("F180", self.f180.as_ref()),
            ("F270", self.f270.as_ref()),
            ("H", self.h.as_ref()),
            ("D", self.d.as_ref()),
            ("E", self.e.as_ref()),
        ]
    }

    /// Coerce every field, failing on the first one that is not a finite number.
    pub fn parse(&self) -> Result<AlignmentInput, AlignmentError> {
        let mut values = [0.0_f64; 9];
        for (slot, (field, raw)) in values.iter_mut().zip(self.fields()) {
            *slot = require_finite(field, raw)?;
        }

        let [r90, r180, r270, f90, f180, f270, h, d, e] = values;
        Ok(AlignmentInput {
            r90,
            r180,
            r270,
            f90,
            f180,
            f270,
            h,
            d,
            e,
        })
    }
}

/// Indicator readings (dial units) and machine dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentInput {
    pub r90: f64,
    pub r180: f64,
    pub r270: f64,
    pub f90: f64,
    pub f180: f64,
    pub f270: f64,
    /// Swing diameter
    pub h: f64,
    /// Near feet to face point
    pub d: f64,
    /// Far feet to face point
    pub e: f64,
}

impl AlignmentInput {
    fn fields(&self) -> [(&'static str, f64); 9] {
        [
            ("R90", self.r90),
            ("R180", self.r180),
            ("R270", self.r270),
            ("F90", self.f90),
            ("F180", self.f180),
            ("F270", self.f270),
            ("H", self.h),
            ("D", self.d),
            ("E", self.e),
        ]
    }
}

/// Vertical and horizontal corrections at the near and far feet.
///
/// Only [`compute`] builds one, so a published result cannot be altered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentResult {
    vn: f64,
    vf: f64,
    hn: f64,
    hf: f64,
}

impl AlignmentResult {
    pub fn vn(&self) -> f64 {
        self.vn
    }

    pub fn vf(&self) -> f64 {
        self.vf
    }

    pub fn hn(&self) -> f64 {
        self.hn
    }

    pub fn hf(&self) -> f64 {
        self.hf
    }
}

/// Rim & Face corrections for a validated input.
pub fn compute(input: &AlignmentInput) -> Result<AlignmentResult, AlignmentError> {
    for (field, value) in input.fields() {
        if !value.is_finite() {
            return Err(AlignmentError::InvalidInput { field });
        }
    }
    if input.h == 0.0 {
        return Err(AlignmentError::DivisionByZero);
    }

    let face_slope_at_180 = input.f180 / input.h;
    let face_slope_diff = (input.f270 - input.f90) / input.h;
    let rim_half_180 = input.r180 / 2.0;
    let rim_diff_90_270 = (input.r270 - input.r90) / 2.0;

    Ok(AlignmentResult {
        vn: rim_half_180 + input.d * face_slope_at_180,
        vf: rim_half_180 + input.e * face_slope_at_180,
        hn: rim_diff_90_270 + input.d * face_slope_diff,
        hf: rim_diff_90_270 + input.e * face_slope_diff,
    })
}

/// Validate raw client input and compute the corrections.
pub fn compute_alignment(raw: &RawAlignmentInput) -> Result<AlignmentResult, AlignmentError> {
    compute(&raw.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> Option<RawReading> {
        Some(RawReading::Number(v))
    }

    fn reference_input() -> AlignmentInput {
        AlignmentInput {
            r90: 0.0,
            r180: 10.0,
            r270: 5.0,
            f90: 0.0,
            f180: 20.0,
            f270: 10.0,
            h: 100.0,
            d: 50.0,
            e: 100.0,
        }
    }

    fn reference_raw() -> RawAlignmentInput {
        RawAlignmentInput {
            r90: num(0.0),
            r180: num(10.0),
            r270: num(5.0),
            f90: num(0.0),
            f180: num(20.0),
            f270: num(10.0),
            h: num(100.0),
            d: num(50.0),
            e: num(100.0),
        }
    }

    #[test]
    fn test_reference_scenario() {
        let result = compute(&reference_input()).unwrap();
        assert_eq!(result.vn(), 15.0);
        assert_eq!(result.vf(), 25.0);
        assert_eq!(result.hn(), 7.5);
        assert_eq!(result.hf(), 12.5);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let input = AlignmentInput {
            r90: -3.17,
            r180: 11.3,
            r270: 0.7,
            f90: 1.9,
            f180: -7.01,
            f270: 4.4,
            h: 133.3,
            d: 210.0,
            e: 745.5,
        };
        let a = compute(&input).unwrap();
        let b = compute(&input).unwrap();
        assert_eq!(a.vn().to_bits(), b.vn().to_bits());
        assert_eq!(a.vf().to_bits(), b.vf().to_bits());
        assert_eq!(a.hn().to_bits(), b.hn().to_bits());
        assert_eq!(a.hf().to_bits(), b.hf().to_bits());
    }

    #[test]
    fn test_operation_order_matches_formula() {
        let input = AlignmentInput {
            r90: 0.1,
            r180: 0.3,
            r270: 0.7,
            f90: 0.2,
            f180: 0.1,
            f270: 0.9,
            h: 3.0,
            d: 7.0,
            e: 11.0,
        };
        let result = compute(&input).unwrap();
        let slope = 0.1 / 3.0;
        let diff = (0.9 - 0.2) / 3.0;
        assert_eq!(result.vn(), 0.3 / 2.0 + 7.0 * slope);
        assert_eq!(result.hf(), (0.7 - 0.1) / 2.0 + 11.0 * diff);
    }

    #[test]
    fn test_zero_swing_diameter_fails() {
        let mut input = reference_input();
        input.h = 0.0;
        assert_eq!(compute(&input), Err(AlignmentError::DivisionByZero));

        input.h = -0.0;
        input.r90 = 999.0;
        assert_eq!(compute(&input), Err(AlignmentError::DivisionByZero));
    }

    #[test]
    fn test_zero_swing_diameter_from_text_fails() {
        let mut raw = reference_raw();
        raw.h = Some(RawReading::Text("0".to_string()));
        assert_eq!(compute_alignment(&raw), Err(AlignmentError::DivisionByZero));
    }

    #[test]
    fn test_negative_readings_flow_through() {
        let mut input = reference_input();
        input.r180 = -10.0;
        input.f180 = -20.0;
        let result = compute(&input).unwrap();
        assert_eq!(result.vn(), -15.0);
        assert_eq!(result.vf(), -25.0);
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let mut raw = reference_raw();
        raw.r180 = Some(RawReading::Text(" 10 ".to_string()));
        raw.d = Some(RawReading::Text("5e1".to_string()));
        let result = compute_alignment(&raw).unwrap();
        assert_eq!(result.vn(), 15.0);
    }

    #[test]
    fn test_missing_field_is_named() {
        let mut raw = reference_raw();
        raw.f270 = None;
        assert_eq!(
            compute_alignment(&raw),
            Err(AlignmentError::InvalidInput { field: "F270" })
        );
    }

    #[test]
    fn test_non_numeric_text_is_rejected() {
        for bad in ["abc", "", "   ", "NaN", "inf", "12abc"] {
            let mut raw = reference_raw();
            raw.e = Some(RawReading::Text(bad.to_string()));
            assert_eq!(
                compute_alignment(&raw),
                Err(AlignmentError::InvalidInput { field: "E" }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_other_json_values_are_rejected() {
        let mut raw = reference_raw();
        raw.r90 = Some(RawReading::Other);
        assert_eq!(
            compute_alignment(&raw),
            Err(AlignmentError::InvalidInput { field: "R90" })
        );
    }

    #[test]
    fn test_first_invalid_field_wins() {
        let raw = RawAlignmentInput::default();
        assert_eq!(
            compute_alignment(&raw),
            Err(AlignmentError::InvalidInput { field: "R90" })
        );
    }

    #[test]
    fn test_invalid_field_reported_before_zero_h() {
        let mut raw = reference_raw();
        raw.h = num(0.0);
        raw.e = None;
        assert_eq!(
            compute_alignment(&raw),
            Err(AlignmentError::InvalidInput { field: "E" })
        );
    }

    #[test]
    fn test_non_finite_struct_input_is_rejected() {
        let mut input = reference_input();
        input.d = f64::INFINITY;
        assert_eq!(compute(&input), Err(AlignmentError::InvalidInput { field: "D" }));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(AlignmentError::DivisionByZero.to_string(), "H cannot be zero");
        assert_eq!(
            AlignmentError::InvalidInput { field: "R180" }.to_string(),
            "invalid input: R180"
        );
    }
}
