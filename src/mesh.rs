//! Provides utilities handling the standard area mesh (標準地域メッシュ).
//!
//! [`MeshCode`] identifies a cell of the 3-tier grid which the parameter
//! file is keyed by, an approximately 1 km square (third mesh).
//! [`MeshCode::from_point`] locates the cell a coordinate belongs to,
//! and [`MeshCode::east`], [`MeshCode::north`] and [`MeshCode::north_east`]
//! resolve the neighboring cells whose corrections surround the coordinate.
//!
//! We note that a point exactly on a cell edge belongs to the cell
//! on its north and/or east.
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::point::Point;

/// Nudge added before the tertiary truncation.
///
/// Counteracts the binary representation error of decimal degrees,
/// which otherwise assigns a coordinate exactly on a tertiary cell
/// boundary (e.g. a longitude ending in `.45`) to the cell on its
/// south/west instead of its north/east.
/// The reference implementation inserts the same constant at the same
/// point of the computation; changing either changes which cell
/// boundary points belong to.
const EPS: f64 = 0.000_000_000_01;

/// Represents a cell of the standard area mesh, plus the position within it.
///
/// This has three levels, _primary_ (80 km), _secondary_ (10 km)
/// and _tertiary_ (~1 km), each packing two digits;
/// both secondary digits take 0 to 7, and both tertiary digits 0 to 9
/// inclusive.
///
/// Equality and hashing depend on [`to_meshcode`](MeshCode::to_meshcode)
/// only; the intra-cell offset is positional information carried along
/// for interpolation.
///
/// # Example
///
/// ```
/// # use tky2jgd::*;
/// # use tky2jgd::mesh::MeshCode;
/// # fn main() -> Result<()> {
/// // Construct from the level values
/// let code = MeshCode::try_new(5440, 10, 27)?;
/// assert_eq!(code.to_meshcode(), 54401027);
///
/// // Construct from a combined meshcode
/// let code = MeshCode::try_from_meshcode(54401027)?;
/// assert_eq!(code.primary(), &5440);
/// assert_eq!(code.secondary(), &10);
/// assert_eq!(code.tertiary(), &27);
///
/// // Construct from a coordinate
/// let point = Point::new(36.103774791666666, 140.08785504166664);
/// assert_eq!(MeshCode::from_point(&point).to_meshcode(), 54401027);
/// # Ok(())}
/// ```
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshCode {
    /// `lat1 * 100 + lon1`, the 80 km grid index
    ///
    /// This may be negative for coordinates outside of the meshed
    /// territory, [`MeshCode::from_point`] stays total.
    pub(crate) primary: i32,
    /// The packed 10 km digits, each takes 0 to 7 inclusive
    pub(crate) secondary: u8,
    /// The packed 1 km digits, each takes 0 to 9 inclusive
    pub(crate) tertiary: u8,
    /// Position within the tertiary cell from the south edge, 0.0 <= and < 1.0
    pub(crate) offset_latitude: f64,
    /// Position within the tertiary cell from the west edge, 0.0 <= and < 1.0
    pub(crate) offset_longitude: f64,
}

impl PartialEq for MeshCode {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.to_meshcode().eq(&other.to_meshcode())
    }
}

impl Eq for MeshCode {}

impl Hash for MeshCode {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_meshcode().hash(state)
    }
}

impl TryFrom<i32> for MeshCode {
    type Error = Error;

    /// Makes a [`MeshCode`] from a combined meshcode
    fn try_from(value: i32) -> Result<Self> {
        Self::try_from_meshcode(value)
    }
}

impl From<MeshCode> for i32 {
    /// Makes a combined meshcode of [`MeshCode`]
    #[inline]
    fn from(value: MeshCode) -> Self {
        value.to_meshcode()
    }
}

/// Carry-aware single step toward the next cell on one axis.
const fn step_up(first: i32, second: u8, third: u8) -> (i32, u8, u8) {
    if third != 9 {
        (first, second, third + 1)
    } else if second != 7 {
        (first, second + 1, 0)
    } else {
        (first + 1, 0, 0)
    }
}

/// Carry-aware single step toward the previous cell on one axis.
const fn step_down(first: i32, second: u8, third: u8) -> (i32, u8, u8) {
    if third != 0 {
        (first, second, third - 1)
    } else if second != 0 {
        (first, second - 1, 9)
    } else {
        (first - 1, 7, 9)
    }
}

impl MeshCode {
    /// Makes a [`MeshCode`].
    ///
    /// The resulting offset is (0, 0), the south-west corner of the cell.
    ///
    /// # Errors
    ///
    /// If `secondary` or `tertiary` is out-of-range.
    /// Both digits of `secondary` take values from 0 to 7,
    /// and `tertiary` does from 0 to 99 inclusive.
    ///
    /// # Example
    ///
    /// ```
    /// # use tky2jgd::*;
    /// # use tky2jgd::mesh::MeshCode;
    /// # fn main() -> Result<()> {
    /// let code = MeshCode::try_new(5440, 10, 27)?;
    /// assert_eq!(code.primary(), &5440);
    /// assert_eq!(code.secondary(), &10);
    /// assert_eq!(code.tertiary(), &27);
    ///
    /// // 8 is not a valid secondary digit
    /// assert!(MeshCode::try_new(5440, 18, 27).is_err());
    /// assert!(MeshCode::try_new(5440, 80, 27).is_err());
    /// # Ok(())}
    /// ```
    pub fn try_new(primary: i32, secondary: u8, tertiary: u8) -> Result<Self> {
        if secondary.gt(&77) || (secondary % 10).gt(&7) {
            return Err(Error::new_out_of_range_secondary(secondary));
        }
        if tertiary.gt(&99) {
            return Err(Error::new_out_of_range_tertiary(tertiary));
        }

        Ok(Self {
            primary,
            secondary,
            tertiary,
            offset_latitude: 0.0,
            offset_longitude: 0.0,
        })
    }

    /// Makes a [`MeshCode`] from a combined meshcode.
    ///
    /// # Errors
    ///
    /// If the decomposition of `meshcode` has an out-of-range level.
    ///
    /// # Example
    ///
    /// ```
    /// # use tky2jgd::*;
    /// # use tky2jgd::mesh::MeshCode;
    /// # fn main() -> Result<()> {
    /// let code = MeshCode::try_from_meshcode(54401027)?;
    /// assert_eq!(code.to_meshcode(), 54401027);
    ///
    /// assert!(MeshCode::try_from_meshcode(54408000).is_err());
    /// assert!(MeshCode::try_from_meshcode(54401927).is_err());
    /// # Ok(())}
    /// ```
    pub fn try_from_meshcode(meshcode: i32) -> Result<Self> {
        let primary = meshcode.div_euclid(10000);
        let secondary = meshcode.rem_euclid(10000) / 100;
        let tertiary = meshcode.rem_euclid(100);

        Self::try_new(primary, secondary as u8, tertiary as u8)
            .map_err(|_| Error::new_out_of_range_meshcode(meshcode))
    }

    /// Returns the primary level of `self`, `lat1 * 100 + lon1`.
    #[inline]
    pub fn primary(&self) -> &i32 {
        &self.primary
    }

    /// Returns the packed secondary digits of `self`.
    #[inline]
    pub fn secondary(&self) -> &u8 {
        &self.secondary
    }

    /// Returns the packed tertiary digits of `self`.
    #[inline]
    pub fn tertiary(&self) -> &u8 {
        &self.tertiary
    }

    /// Returns the position within the tertiary cell from its south edge,
    /// 0.0 <= and < 1.0.
    #[inline]
    pub fn offset_latitude(&self) -> &f64 {
        &self.offset_latitude
    }

    /// Returns the position within the tertiary cell from its west edge,
    /// 0.0 <= and < 1.0.
    #[inline]
    pub fn offset_longitude(&self) -> &f64 {
        &self.offset_longitude
    }

    /// Returns the combined meshcode of `self`,
    /// the key of the parameter table.
    ///
    /// # Example
    ///
    /// ```
    /// # use tky2jgd::*;
    /// # use tky2jgd::mesh::MeshCode;
    /// # fn main() -> Result<()> {
    /// let code = MeshCode::try_new(5440, 10, 27)?;
    /// assert_eq!(code.to_meshcode(), 54401027);
    /// # Ok(())}
    /// ```
    #[inline]
    pub fn to_meshcode(&self) -> i32 {
        self.primary * 10000 + self.secondary as i32 * 100 + self.tertiary as i32
    }

    /// Makes the [`MeshCode`] of the cell which `point` belongs to.
    ///
    /// This is total for finite coordinates, even outside of the meshed
    /// territory (callers enforce the coverage bounds separately).
    /// A point exactly on a cell edge belongs to the cell
    /// on its north and/or east.
    ///
    /// # Example
    ///
    /// ```
    /// # use tky2jgd::*;
    /// # use tky2jgd::mesh::MeshCode;
    /// let point = Point::new(36.103774791666666, 140.08785504166664);
    /// let code = MeshCode::from_point(&point);
    /// assert_eq!(code.to_meshcode(), 54401027);
    ///
    /// // a cell edge belongs to the cell on its north
    /// let point = Point::new(36.1, 140.08785504166664);
    /// let code = MeshCode::from_point(&point);
    /// assert_eq!(code.to_meshcode(), 54401027);
    /// ```
    pub fn from_point(point: &Point) -> Self {
        let lat = point.latitude;
        let lon = point.longitude;

        // 2-digit primary components
        let mut lat1 = (lat * 1.5).floor();
        let mut lon1 = lon.floor() - 100.0;
        // 1-digit secondary components
        let mut lat2 = (8.0 * (1.5 * lat - lat1)).floor();
        let mut lon2 = (8.0 * (lon - (lon1 + 100.0))).floor();
        // 1-digit tertiary components, nudged before truncation (see EPS)
        let mut lat3 = (10.0 * (12.0 * lat - 8.0 * lat1 - lat2) + EPS).floor();
        let mut lon3 = (10.0 * (8.0 * (lon - (lon1 + 100.0)) - lon2) + EPS).floor();

        // the nudge can push a tertiary component to 10, carry it up
        if lat3 == 10.0 {
            lat3 = 0.0;
            lat2 += 1.0;
            if lat2 == 8.0 {
                lat2 = 0.0;
                lat1 += 1.0;
            }
        }
        if lon3 == 10.0 {
            lon3 = 0.0;
            lon2 += 1.0;
            if lon2 == 8.0 {
                lon2 = 0.0;
                lon1 += 1.0;
            }
        }

        debug_assert!(lat2.ge(&0.0) && lat2.le(&7.0));
        debug_assert!(lon2.ge(&0.0) && lon2.le(&7.0));
        debug_assert!(lat3.ge(&0.0) && lat3.le(&9.0));
        debug_assert!(lon3.ge(&0.0) && lon3.le(&9.0));

        // remainder from the south-west corner of the tertiary cell
        let offset_latitude = 120.0 * lat - 80.0 * lat1 - 10.0 * lat2 - lat3;
        let offset_longitude = 80.0 * (lon - (lon1 + 100.0)) - 10.0 * lon2 - lon3;

        Self {
            primary: (lat1 * 100.0 + lon1) as i32,
            secondary: (lat2 * 10.0 + lon2) as u8,
            tertiary: (lat3 * 10.0 + lon3) as u8,
            offset_latitude,
            offset_longitude,
        }
    }

    /// Returns the [`MeshCode`] of the cell on the east of `self`.
    ///
    /// The offset of the result is (0, 0).
    ///
    /// # Example
    ///
    /// ```
    /// # use tky2jgd::*;
    /// # use tky2jgd::mesh::MeshCode;
    /// # fn main() -> Result<()> {
    /// let code = MeshCode::try_from_meshcode(54401027)?;
    /// assert_eq!(code.east().to_meshcode(), 54401028);
    ///
    /// // carries into the secondary, and the primary, level
    /// let code = MeshCode::try_from_meshcode(54401029)?;
    /// assert_eq!(code.east().to_meshcode(), 54401120);
    /// let code = MeshCode::try_from_meshcode(54401729)?;
    /// assert_eq!(code.east().to_meshcode(), 54411020);
    /// # Ok(())}
    /// ```
    pub fn east(&self) -> Self {
        let ((lat1, lon1), (lat2, lon2), (lat3, lon3)) = self.components();
        let (lon1, lon2, lon3) = step_up(lon1, lon2, lon3);

        Self::pack(lat1, lon1, lat2, lon2, lat3, lon3)
    }

    /// Returns the [`MeshCode`] of the cell on the north of `self`.
    ///
    /// The offset of the result is (0, 0).
    ///
    /// # Example
    ///
    /// ```
    /// # use tky2jgd::*;
    /// # use tky2jgd::mesh::MeshCode;
    /// # fn main() -> Result<()> {
    /// let code = MeshCode::try_from_meshcode(54401027)?;
    /// assert_eq!(code.north().to_meshcode(), 54401037);
    /// # Ok(())}
    /// ```
    pub fn north(&self) -> Self {
        let ((lat1, lon1), (lat2, lon2), (lat3, lon3)) = self.components();
        let (lat1, lat2, lat3) = step_up(lat1, lat2, lat3);

        Self::pack(lat1, lon1, lat2, lon2, lat3, lon3)
    }

    /// Returns the [`MeshCode`] of the cell on the north-east of `self`.
    ///
    /// Both axes step independently, there is no cross term.
    /// The offset of the result is (0, 0).
    ///
    /// # Example
    ///
    /// ```
    /// # use tky2jgd::*;
    /// # use tky2jgd::mesh::MeshCode;
    /// # fn main() -> Result<()> {
    /// let code = MeshCode::try_from_meshcode(54401027)?;
    /// assert_eq!(code.north_east().to_meshcode(), 54401038);
    /// # Ok(())}
    /// ```
    pub fn north_east(&self) -> Self {
        let ((lat1, lon1), (lat2, lon2), (lat3, lon3)) = self.components();
        let (lat1, lat2, lat3) = step_up(lat1, lat2, lat3);
        let (lon1, lon2, lon3) = step_up(lon1, lon2, lon3);

        Self::pack(lat1, lon1, lat2, lon2, lat3, lon3)
    }

    /// Returns the [`MeshCode`] of the cell on the west of `self`,
    /// the inverse of [`MeshCode::east`].
    pub fn west(&self) -> Self {
        let ((lat1, lon1), (lat2, lon2), (lat3, lon3)) = self.components();
        let (lon1, lon2, lon3) = step_down(lon1, lon2, lon3);

        Self::pack(lat1, lon1, lat2, lon2, lat3, lon3)
    }

    /// Returns the [`MeshCode`] of the cell on the south of `self`,
    /// the inverse of [`MeshCode::north`].
    pub fn south(&self) -> Self {
        let ((lat1, lon1), (lat2, lon2), (lat3, lon3)) = self.components();
        let (lat1, lat2, lat3) = step_down(lat1, lat2, lat3);

        Self::pack(lat1, lon1, lat2, lon2, lat3, lon3)
    }

    /// Decomposes `self` into the per-axis digits,
    /// `((lat1, lon1), (lat2, lon2), (lat3, lon3))`.
    fn components(&self) -> ((i32, i32), (u8, u8), (u8, u8)) {
        (
            (self.primary.div_euclid(100), self.primary.rem_euclid(100)),
            (self.secondary / 10, self.secondary % 10),
            (self.tertiary / 10, self.tertiary % 10),
        )
    }

    /// The inverse of [`MeshCode::components`], with offset (0, 0).
    const fn pack(lat1: i32, lon1: i32, lat2: u8, lon2: u8, lat3: u8, lon3: u8) -> Self {
        Self {
            primary: lat1 * 100 + lon1,
            secondary: lat2 * 10 + lon2,
            tertiary: lat3 * 10 + lon3,
            offset_latitude: 0.0,
            offset_longitude: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod tests_mesh_code {
        use super::*;

        #[test]
        fn test_try_new() {
            // each secondary digit takes 0 to 7
            assert!(MeshCode::try_new(5440, 78, 0).is_err());
            assert!(MeshCode::try_new(5440, 80, 0).is_err());
            assert!(MeshCode::try_new(5440, 8, 0).is_err());
            assert!(MeshCode::try_new(5440, 100, 0).is_err());
            // tertiary takes 0 to 99
            assert!(MeshCode::try_new(5440, 0, 100).is_err());

            assert!(MeshCode::try_new(5440, 77, 99).is_ok());
            assert!(MeshCode::try_new(-135, 0, 0).is_ok());
        }

        #[test]
        fn test_getter() {
            let code = MeshCode::try_new(5440, 10, 27).unwrap();
            assert_eq!(code.primary(), &5440);
            assert_eq!(code.secondary(), &10);
            assert_eq!(code.tertiary(), &27);
            assert_eq!(code.offset_latitude(), &0.0);
            assert_eq!(code.offset_longitude(), &0.0);
        }

        #[test]
        fn test_to_meshcode() {
            let code = MeshCode::try_new(5440, 10, 27).unwrap();
            assert_eq!(code.to_meshcode(), 54401027);
            assert_eq!(i32::from(code), 54401027);
        }

        #[test]
        fn test_try_from_meshcode() {
            let code = MeshCode::try_from_meshcode(54401027).unwrap();
            assert_eq!(code.primary(), &5440);
            assert_eq!(code.secondary(), &10);
            assert_eq!(code.tertiary(), &27);

            assert!(MeshCode::try_from_meshcode(54408000).is_err());
            assert!(MeshCode::try_from_meshcode(54401927).is_err());
            assert!(MeshCode::try_from_meshcode(-1).is_err());

            assert_eq!(
                MeshCode::try_from(54401027).unwrap(),
                MeshCode::try_from_meshcode(54401027).unwrap()
            );
        }

        #[test]
        fn test_eq_ignores_offset() {
            let by_code = MeshCode::try_from_meshcode(54401027).unwrap();
            let by_point =
                MeshCode::from_point(&Point::new(36.103774791666666, 140.08785504166664));

            assert_ne!(by_point.offset_latitude(), &0.0);
            assert_eq!(by_point, by_code);
        }
    }

    mod tests_from_point {
        use super::*;

        #[test]
        fn test_digits() {
            let code = MeshCode::from_point(&Point::new(36.103774791666666, 140.08785504166664));

            // (lat1, lon1) = (54, 40), (lat2, lon2) = (1, 0), (lat3, lon3) = (2, 7)
            assert_eq!(code.primary(), &5440);
            assert_eq!(code.secondary(), &10);
            assert_eq!(code.tertiary(), &27);
            assert_eq!(code.to_meshcode(), 54401027);
        }

        #[test]
        fn test_offset() {
            let code = MeshCode::from_point(&Point::new(36.103774791666666, 140.08785504166664));

            assert!((code.offset_latitude() - 0.452975).abs() < 1e-9);
            assert!((code.offset_longitude() - 0.028403).abs() < 1e-6);
        }

        #[test]
        fn test_south_west_corner() {
            // both 36.0 and 140.0 decompose exactly, the offset is zero
            let code = MeshCode::from_point(&Point::new(36.0, 140.0));

            assert_eq!(code.to_meshcode(), 54400000);
            assert_eq!(code.offset_latitude(), &0.0);
            assert_eq!(code.offset_longitude(), &0.0);
        }

        #[test]
        fn test_tertiary_boundary() {
            // 80 * 0.45 = 36, exactly on the boundary of the tertiary
            // digits 5 and 6; the nudge assigns it to the east cell
            let code = MeshCode::from_point(&Point::new(36.05, 138.45));
            assert_eq!(code.tertiary() % 10, 6);
        }

        #[test]
        fn test_carry() {
            // the nudge pushes lat3 to 10 here, which carries into lat2
            // (the regression case of the reference implementation)
            let code = MeshCode::from_point(&Point::new(36.0833333333333, 140.0));
            assert_eq!(code.to_meshcode(), 54401000);
        }

        #[test]
        fn test_digit_invariants() {
            let mut lat = 20.0_f64;
            while lat < 46.0 {
                let mut lon = 120.0_f64;
                while lon < 154.0 {
                    let code = MeshCode::from_point(&Point::new(lat, lon));

                    assert!(code.secondary() / 10 <= 7, "lat {lat} lon {lon}");
                    assert!(code.secondary() % 10 <= 7, "lat {lat} lon {lon}");
                    assert!(code.tertiary() <= &99, "lat {lat} lon {lon}");
                    assert!(
                        (0.0..1.0).contains(code.offset_latitude()),
                        "lat {lat} lon {lon}"
                    );
                    assert!(
                        (0.0..1.0).contains(code.offset_longitude()),
                        "lat {lat} lon {lon}"
                    );

                    lon += 0.7771;
                }
                lat += 0.6131;
            }
        }
    }

    mod tests_neighbors {
        use super::*;

        #[test]
        fn test_east() {
            let code = MeshCode::try_from_meshcode(54401027).unwrap();
            assert_eq!(code.east().to_meshcode(), 54401028);

            // carry into the secondary level
            let code = MeshCode::try_from_meshcode(54401029).unwrap();
            assert_eq!(code.east().to_meshcode(), 54401120);

            // carry into the primary level
            let code = MeshCode::try_from_meshcode(54401729).unwrap();
            assert_eq!(code.east().to_meshcode(), 54411020);
        }

        #[test]
        fn test_north() {
            let code = MeshCode::try_from_meshcode(54401027).unwrap();
            assert_eq!(code.north().to_meshcode(), 54401037);

            // carry into the secondary level
            let code = MeshCode::try_from_meshcode(54401097).unwrap();
            assert_eq!(code.north().to_meshcode(), 54402007);

            // carry into the primary level
            let code = MeshCode::try_from_meshcode(54407394).unwrap();
            assert_eq!(code.north().to_meshcode(), 55400304);
        }

        #[test]
        fn test_north_east() {
            let code = MeshCode::try_from_meshcode(54401027).unwrap();
            assert_eq!(code.north_east().to_meshcode(), 54401038);
        }

        #[test]
        fn test_axes_are_orthogonal() {
            for meshcode in [54401027, 54401029, 54401729, 54401097, 54407394, 54407799] {
                let code = MeshCode::try_from_meshcode(meshcode).unwrap();

                assert_eq!(code.north_east(), code.east().north());
                assert_eq!(code.north_east(), code.north().east());
            }
        }

        #[test]
        fn test_offset_cleared() {
            let code = MeshCode::from_point(&Point::new(36.103774791666666, 140.08785504166664));

            assert_eq!(code.east().offset_longitude(), &0.0);
            assert_eq!(code.north().offset_latitude(), &0.0);
            assert_eq!(code.north_east().offset_latitude(), &0.0);
        }

        #[test]
        fn test_round_trip() {
            for meshcode in [54401027, 54401029, 54401729, 54401097, 54407394] {
                let code = MeshCode::try_from_meshcode(meshcode).unwrap();

                assert_eq!(code.east().west(), code);
                assert_eq!(code.north().south(), code);
                assert_eq!(code.north_east().south().west(), code);
            }

            // reconstructs the digits of the located cell
            let code = MeshCode::from_point(&Point::new(36.103774791666666, 140.08785504166664));
            assert_eq!(code.east().west().to_meshcode(), code.to_meshcode());
            assert_eq!(code.north().south().to_meshcode(), code.to_meshcode());
        }
    }
}
