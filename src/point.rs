//! Provides [`Point`].
use std::ops::{Add, AddAssign, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::transformer::Correction;

/// Represents a position on the Earth, a pair of latitude and longitude.
///
/// # Example
///
/// ```
/// # use tky2jgd::*;
/// // Construct
/// let point = Point::new(35.0, 145.0);
/// assert_eq!(point.latitude(), &35.0);
/// assert_eq!(point.longitude(), &145.0);
///
/// // Add/sub Correction
/// let result = &point + Correction::new(1.0, 1.0);
/// assert_eq!(result, Point::new(36.0, 146.0));
/// let result = &result - Correction::new(1.0, 1.0);
/// assert_eq!(result, point);
/// ```
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// The latitude \[deg\] of the point
    pub(crate) latitude: f64,
    /// The longitude \[deg\] of the point
    pub(crate) longitude: f64,
}

impl From<(f64, f64)> for Point {
    /// see [`Point::new()`]
    #[inline]
    fn from(rhs: (f64, f64)) -> Self {
        Self::new(rhs.0, rhs.1)
    }
}

impl Point {
    /// Makes a [`Point`].
    ///
    /// # Example
    ///
    /// ```
    /// # use tky2jgd::*;
    /// let point = Point::new(36.103774791666666, 140.08785504166664);
    /// assert_eq!(point.latitude(), &36.103774791666666);
    /// assert_eq!(point.longitude(), &140.08785504166664);
    /// ```
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns the latitude \[deg\] of `self`.
    #[inline]
    pub fn latitude(&self) -> &f64 {
        &self.latitude
    }

    /// Returns the longitude \[deg\] of `self`.
    #[inline]
    pub fn longitude(&self) -> &f64 {
        &self.longitude
    }
}

impl Add<Correction> for Point {
    type Output = Self;

    fn add(self, rhs: Correction) -> Self::Output {
        Self::Output::new(self.latitude + rhs.latitude, self.longitude + rhs.longitude)
    }
}

impl Add<Correction> for &Point {
    type Output = Point;

    fn add(self, rhs: Correction) -> Self::Output {
        Self::Output::new(self.latitude + rhs.latitude, self.longitude + rhs.longitude)
    }
}

impl AddAssign<Correction> for Point {
    fn add_assign(&mut self, rhs: Correction) {
        self.latitude += rhs.latitude;
        self.longitude += rhs.longitude;
    }
}

impl Sub<Correction> for Point {
    type Output = Self;

    fn sub(self, rhs: Correction) -> Self::Output {
        Self::Output::new(self.latitude - rhs.latitude, self.longitude - rhs.longitude)
    }
}

impl Sub<Correction> for &Point {
    type Output = Point;

    fn sub(self, rhs: Correction) -> Self::Output {
        Self::Output::new(self.latitude - rhs.latitude, self.longitude - rhs.longitude)
    }
}

impl SubAssign<Correction> for Point {
    fn sub_assign(&mut self, rhs: Correction) {
        self.latitude -= rhs.latitude;
        self.longitude -= rhs.longitude;
    }
}
