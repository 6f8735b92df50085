use anyhow::Context;
use serde_with::DeserializeFromStr;

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    ops::{AddAssign, Div},
    str::FromStr,
};

/// Represents a product rating, or an average of ratings.
///
/// The value is stored as a floating-point number. The [`Display`]
/// implementation prints it in its shortest form, so `5.0` shows as `5` and
/// `4.80` as `4.8`.
#[derive(Clone, Copy, Default, DeserializeFromStr, PartialEq, PartialOrd)]
pub struct Rating(f64);

impl Rating {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the rating rounded to 2 decimal places.
    ///
    /// Rounding works on the exact decimal expansion of the value, and ties
    /// go to the even digit, so `4.125` becomes `4.12` and `4.375` becomes
    /// `4.38`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ratings::Rating;
    /// assert_eq!(Rating::new(4.756).round2(), Rating::new(4.76));
    /// assert_eq!(Rating::new(4.800000000000001).round2(), Rating::new(4.8));
    /// assert_eq!(Rating::new(4.125).round2(), Rating::new(4.12));
    /// ```
    #[must_use]
    pub fn round2(self) -> Self {
        Self(format!("{:.2}", self.0).parse().unwrap_or(self.0))
    }

    /// Compares ratings for ranking. Incomparable values (NaN) count as equal.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

impl Debug for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Rating {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse()
            .with_context(|| format!("invalid rating {s:?}"))?;
        Ok(Self(value))
    }
}

impl AddAssign for Rating {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Div<u32> for Rating {
    type Output = Self;

    fn div(self, rhs: u32) -> Self::Output {
        Self(self.0 / f64::from(rhs))
    }
}
