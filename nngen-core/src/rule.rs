//! Distance-decay connection rules and the acceptance probability function.

use std::{fmt, str::FromStr, sync::Arc};

use crate::error::{GenerationError, Result};

/// Shape of the decay applied to distance.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DecayRule {
    /// `max(0, 1 - d / scale)`.
    Linear,
    /// `exp(-d / scale)`.
    Exponential,
}

impl DecayRule {
    /// Returns the short rule name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "lin",
            Self::Exponential => "exp",
        }
    }

    /// Multiple of the scale bounding the box searched when candidate lists
    /// are derived from positions.
    #[must_use]
    pub const fn reach_factor(self) -> f32 {
        match self {
            Self::Linear => 1.0,
            Self::Exponential => 10.0,
        }
    }
}

impl fmt::Display for DecayRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecayRule {
    type Err = GenerationError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "lin" => Ok(Self::Linear),
            "exp" => Ok(Self::Exponential),
            other => Err(GenerationError::InvalidRule {
                rule: Arc::from(other),
            }),
        }
    }
}

/// Maps a distance to an acceptance probability in `[0, 1]`.
///
/// The result is `1` at distance zero and never increases with distance.
///
/// # Examples
/// ```
/// use nngen_core::{DecayRule, connection_probability};
///
/// assert_eq!(connection_probability(DecayRule::Linear, 2.0, 0.0), 1.0);
/// assert_eq!(connection_probability(DecayRule::Linear, 2.0, 0.25), 0.5);
/// assert_eq!(connection_probability(DecayRule::Linear, 2.0, 1.0), 0.0);
/// assert!(connection_probability(DecayRule::Exponential, 1.0, 5.0) < 0.01);
/// ```
#[must_use]
pub fn connection_probability(rule: DecayRule, inv_scale: f32, distance: f32) -> f32 {
    let scaled = distance * inv_scale;
    let p = match rule {
        DecayRule::Linear => 1.0 - scaled,
        DecayRule::Exponential => (-scaled).exp(),
    };
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

/// Validated parameters of a distance-decay rule.
///
/// `area` and `population` calibrate the expected acceptance rate used to
/// size the first sampling round.
///
/// # Examples
/// ```
/// use nngen_core::{ConnectionRule, DecayRule};
///
/// let rule = ConnectionRule::new(DecayRule::Linear, 0.5, 1.0, 50)?;
/// assert_eq!(rule.probability(0.25), 0.5);
/// assert!(ConnectionRule::new(DecayRule::Linear, 0.0, 1.0, 50).is_err());
/// # Ok::<(), nngen_core::GenerationError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectionRule {
    decay: DecayRule,
    scale: f32,
    area: f32,
    population: usize,
}

impl ConnectionRule {
    /// Creates a rule after validating its parameters.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidParameters`] when `scale` or `area`
    /// is not finite and positive, or `population` is below two.
    pub fn new(decay: DecayRule, scale: f32, area: f32, population: usize) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GenerationError::invalid(format!(
                "scale must be finite and positive (got {scale})"
            )));
        }
        if !area.is_finite() || area <= 0.0 {
            return Err(GenerationError::invalid(format!(
                "area must be finite and positive (got {area})"
            )));
        }
        if population < 2 {
            return Err(GenerationError::invalid(format!(
                "population must contain at least two nodes (got {population})"
            )));
        }
        Ok(Self {
            decay,
            scale,
            area,
            population,
        })
    }

    /// Parses the decay name and validates the remaining parameters.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidRule`] for unknown names and the
    /// errors of [`ConnectionRule::new`] otherwise.
    pub fn parse(rule: &str, scale: f32, area: f32, population: usize) -> Result<Self> {
        Self::new(rule.parse()?, scale, area, population)
    }

    /// Returns the decay shape.
    #[must_use]
    #[rustfmt::skip]
    pub const fn decay(&self) -> DecayRule { self.decay }

    /// Returns the distance scale.
    #[must_use]
    #[rustfmt::skip]
    pub const fn scale(&self) -> f32 { self.scale }

    /// Returns the area the population occupies.
    #[must_use]
    #[rustfmt::skip]
    pub const fn area(&self) -> f32 { self.area }

    /// Returns the population size used for calibration.
    #[must_use]
    #[rustfmt::skip]
    pub const fn population(&self) -> usize { self.population }

    /// Returns `1 / scale`.
    #[must_use]
    pub fn inv_scale(&self) -> f32 {
        self.scale.recip()
    }

    /// Half-width of the box candidate lists built from positions cover.
    #[must_use]
    pub fn reach(&self) -> f32 {
        self.scale * self.decay.reach_factor()
    }

    /// Evaluates the acceptance probability at `distance`.
    #[must_use]
    pub fn probability(&self, distance: f32) -> f32 {
        connection_probability(self.decay, self.inv_scale(), distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("lin", DecayRule::Linear)]
    #[case("exp", DecayRule::Exponential)]
    fn rule_names_parse(#[case] name: &str, #[case] expected: DecayRule) {
        let parsed: DecayRule = name.parse().expect("known rule");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), name);
    }

    #[rstest]
    #[case("gauss")]
    #[case("")]
    #[case("LIN")]
    fn unknown_rule_names_are_rejected(#[case] name: &str) {
        let err = name.parse::<DecayRule>().expect_err("unknown rule");
        assert_eq!(
            err,
            GenerationError::InvalidRule {
                rule: Arc::from(name)
            }
        );
    }

    #[rstest]
    #[case(DecayRule::Linear)]
    #[case(DecayRule::Exponential)]
    fn probability_is_one_at_zero_distance(#[case] rule: DecayRule) {
        assert_eq!(connection_probability(rule, 3.0, 0.0), 1.0);
    }

    #[test]
    fn linear_probability_reaches_zero_at_scale() {
        assert_eq!(connection_probability(DecayRule::Linear, 5.0, 0.2), 0.0);
        assert_eq!(connection_probability(DecayRule::Linear, 5.0, 10.0), 0.0);
    }

    #[test]
    fn exponential_probability_matches_closed_form() {
        let p = connection_probability(DecayRule::Exponential, 2.0, 0.5);
        assert!((p - (-1.0_f32).exp()).abs() < 1e-6);
    }

    #[rstest]
    #[case(f32::NAN, 1.0, 10)]
    #[case(-1.0, 1.0, 10)]
    #[case(0.2, f32::INFINITY, 10)]
    #[case(0.2, 0.0, 10)]
    #[case(0.2, 1.0, 1)]
    fn invalid_rule_parameters_are_rejected(
        #[case] scale: f32,
        #[case] area: f32,
        #[case] population: usize,
    ) {
        let err = ConnectionRule::new(DecayRule::Linear, scale, area, population)
            .expect_err("parameters must be rejected");
        assert!(matches!(err, GenerationError::InvalidParameters { .. }));
    }

    #[test]
    fn reach_depends_on_decay() {
        let lin = ConnectionRule::new(DecayRule::Linear, 0.5, 1.0, 2).expect("valid rule");
        let exp = ConnectionRule::new(DecayRule::Exponential, 0.5, 1.0, 2).expect("valid rule");
        assert_eq!(lin.reach(), 0.5);
        assert_eq!(exp.reach(), 5.0);
    }
}
