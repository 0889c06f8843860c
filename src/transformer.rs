//! Provides [`Transformer`] etc.
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::mesh::MeshCode;
use crate::point::Point;

/// The parameter doublet.
///
/// We emphasize that the unit of latitude and longitude is \[sec\],
/// not \[deg\].
///
/// # Example
///
/// ```
/// # use tky2jgd::*;
/// let parameter = Parameter::new(1., 2.);
/// assert_eq!(parameter.latitude, 1.);
/// assert_eq!(parameter.longitude, 2.);
/// ```
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameter {
    /// The latitude parameter \[sec\]
    pub latitude: f64,
    /// The longitude parameter \[sec\]
    pub longitude: f64,
}

impl From<(f64, f64)> for Parameter {
    #[inline]
    fn from(value: (f64, f64)) -> Self {
        Self {
            latitude: value.0,
            longitude: value.1,
        }
    }
}

impl From<[f64; 2]> for Parameter {
    #[inline]
    fn from(value: [f64; 2]) -> Self {
        Self {
            latitude: value[0],
            longitude: value[1],
        }
    }
}

impl Parameter {
    /// Makes a `Parameter`.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns √𝑙𝑎𝑡𝑖𝑡𝑢𝑑𝑒² + 𝑙𝑜𝑛𝑔𝑖𝑡𝑢𝑑𝑒².
    #[inline]
    pub fn horizontal(&self) -> f64 {
        f64::hypot(self.latitude, self.longitude)
    }
}

/// The transformation correction.
///
/// We emphasize that the unit of latitude and longitude is \[deg\],
/// not \[sec\].
///
/// # Example
///
/// ```
/// # use tky2jgd::*;
/// let correction = Correction::new(1., 2.);
/// assert_eq!(correction.latitude, 1.);
/// assert_eq!(correction.longitude, 2.);
/// ```
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Correction {
    /// The latitude correction \[deg\].
    pub latitude: f64,
    /// The longitude correction \[deg\].
    pub longitude: f64,
}

impl Correction {
    /// Makes a [`Correction`].
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns √𝑙𝑎𝑡𝑖𝑡𝑢𝑑𝑒² + 𝑙𝑜𝑛𝑔𝑖𝑡𝑢𝑑𝑒².
    #[inline]
    pub fn horizontal(&self) -> f64 {
        f64::hypot(self.latitude, self.longitude)
    }
}

/// Bilinear interpolation on the unit square.
///
/// `x` and `y` are measured from the south-west corner,
/// 0.0 <= and < 1.0;
///
/// ```text
///  y
///  ^
///  | nw    ne
///  |
///  | sw    se  -> x
/// ```
///
/// exact on `sw` at the origin, linear along either axis
/// when the other coordinate is 0.
fn bilinear(sw: f64, se: f64, nw: f64, ne: f64, x: f64, y: f64) -> f64 {
    sw + (se - sw) * x + (nw - sw) * y + (ne - se - nw + sw) * x * y
}

/// The coordinate Transformer, the deserializing result of a par file.
///
/// The transformation corrects a Tokyo Datum coordinate to JGD2000
/// (or Tokyo97, depending on the parameter file)
/// by bilinear interpolation of the four corrections surrounding it.
///
/// No operation mutates the table after construction, so a built
/// [`Transformer`] may be shared immutably, across threads included.
///
/// There is a builder, see [`TransformerBuilder`].
///
/// # Example
///
/// ```
/// # use tky2jgd::*;
/// // a tiny table around the cell 54400000
/// let tf = TransformerBuilder::new()
///     .parameters([
///         (54400000, (12.345, -5.678)),
///         (54400001, (12.445, -5.578)),
///         (54400010, (12.545, -5.478)),
///         (54400011, (12.645, -5.378)),
///     ])
///     .build();
///
/// // the south-west corner of the cell
/// let origin = Point::new(36.0, 140.0);
/// let result = tf.forward(&origin).unwrap();
/// assert_eq!(result, Point::new(36.0 + 12.345 / 3600.0, 140.0 - 5.678 / 3600.0));
///
/// // outside of the mesh coverage
/// assert!(tf.forward(&Point::new(10.0, 130.0)).is_none());
/// ```
#[derive(Debug, PartialEq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transformer {
    /// The transformation parameter table.
    ///
    /// The entry represents a single parameter record of the par file,
    /// the key is the combined meshcode, and the value the correction
    /// to the cell's south-west corner \[sec\].
    pub parameter: HashMap<i32, Parameter>,
    /// The description, the provenance of the table.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub description: Option<String>,
}

impl Transformer {
    /// Minimum latitude \[deg\] of the meshed territory.
    pub const MIN_LATITUDE: f64 = 20.0;
    /// Maximum latitude \[deg\] of the meshed territory.
    pub const MAX_LATITUDE: f64 = 46.0;
    /// Minimum longitude \[deg\] of the meshed territory.
    pub const MIN_LONGITUDE: f64 = 120.0;
    /// Maximum longitude \[deg\] of the meshed territory.
    pub const MAX_LONGITUDE: f64 = 154.0;

    /// Makes a [`Transformer`].
    ///
    /// We note that we provide a builder, see [`TransformerBuilder`],
    /// and the deserializers, see [`par::from_str`](crate::par::from_str)
    /// and [`par::from_path`](crate::par::from_path).
    #[inline]
    pub const fn new(parameter: HashMap<i32, Parameter>) -> Self {
        Self {
            parameter,
            description: None,
        }
    }

    /// Makes a [`Transformer`] with [`description`](Transformer::description).
    #[inline]
    pub const fn with_description(
        parameter: HashMap<i32, Parameter>,
        description: String,
    ) -> Self {
        Self {
            parameter,
            description: Some(description),
        }
    }

    /// Deserialize par-formatted [`&str`] into a [`Transformer`].
    ///
    /// See [`par::from_str`](crate::par::from_str) for detail.
    ///
    /// # Example
    ///
    /// ```
    /// # use tky2jgd::*;
    /// let s = r"JGD2000-TokyoDatum Ver.2.1.2
    /// MeshCode   dB(sec)   dL(sec)
    /// 46303582   11.49105  -11.80078";
    /// let tf = Transformer::from_par(s);
    ///
    /// assert_eq!(
    ///     tf.parameter.get(&46303582),
    ///     Some(&Parameter::new(11.49105, -11.80078))
    /// );
    /// ```
    #[inline]
    pub fn from_par(s: &str) -> Self {
        crate::par::from_str(s)
    }

    /// Returns the interpolated correction at `point`, or [`None`]
    /// when `point` is outside of the mesh coverage.
    ///
    /// The correction is resolved by locating the mesh cell of `point`,
    /// looking up the parameters of the cell and of its east, north and
    /// north-east neighbors, and interpolating bilinearly at the position
    /// of `point` within the cell.
    /// It requires all four parameters;
    /// [`None`] results when any is absent from the table,
    /// or when `point` is outside of the meshed territory
    /// (latitude [`MIN_LATITUDE`](Transformer::MIN_LATITUDE) to
    /// [`MAX_LATITUDE`](Transformer::MAX_LATITUDE), longitude
    /// [`MIN_LONGITUDE`](Transformer::MIN_LONGITUDE) to
    /// [`MAX_LONGITUDE`](Transformer::MAX_LONGITUDE)).
    ///
    /// # Example
    ///
    /// ```
    /// # use tky2jgd::*;
    /// let tf = TransformerBuilder::new()
    ///     .parameters([
    ///         (54400000, (12.345, -5.678)),
    ///         (54400001, (12.445, -5.578)),
    ///         (54400010, (12.545, -5.478)),
    ///         (54400011, (12.645, -5.378)),
    ///     ])
    ///     .build();
    ///
    /// // at the south-west corner the correction is the corner parameter,
    /// // exactly, converted to [deg]
    /// let corr = tf.correction(&Point::new(36.0, 140.0)).unwrap();
    /// assert_eq!(corr, Correction::new(12.345 / 3600.0, -5.678 / 3600.0));
    ///
    /// // south of the meshed territory
    /// assert!(tf.correction(&Point::new(10.0, 130.0)).is_none());
    /// ```
    pub fn correction(&self, point: &Point) -> Option<Correction> {
        // Outside of the meshed territory no parameter exists; return
        // before the meshcode search, which otherwise could find an
        // unrelated in-territory record for such a point.
        if !point.latitude.is_finite() || !point.longitude.is_finite() {
            return None;
        }
        if point.latitude < Self::MIN_LATITUDE
            || point.latitude > Self::MAX_LATITUDE
            || point.longitude < Self::MIN_LONGITUDE
            || point.longitude > Self::MAX_LONGITUDE
        {
            return None;
        }

        let sw = MeshCode::from_point(point);
        let se = sw.east();
        let nw = sw.north();
        let ne = sw.north_east();

        let p_sw = self.parameter.get(&sw.to_meshcode())?;
        let p_se = self.parameter.get(&se.to_meshcode())?;
        let p_nw = self.parameter.get(&nw.to_meshcode())?;
        let p_ne = self.parameter.get(&ne.to_meshcode())?;

        let x = *sw.offset_longitude();
        let y = *sw.offset_latitude();

        let latitude = bilinear(
            p_sw.latitude,
            p_se.latitude,
            p_nw.latitude,
            p_ne.latitude,
            x,
            y,
        );
        let longitude = bilinear(
            p_sw.longitude,
            p_se.longitude,
            p_nw.longitude,
            p_ne.longitude,
            x,
            y,
        );

        // [sec] to [deg]
        Some(Correction::new(latitude / 3600.0, longitude / 3600.0))
    }

    /// Returns the transformation of `point`, or [`None`]
    /// when `point` is outside of the mesh coverage.
    ///
    /// See [`Transformer::correction`] for the resolution of the
    /// correction; the caller decides how to represent "no coverage"
    /// (the original command prints the pair `-9999.0 -9999.0`).
    ///
    /// # Example
    ///
    /// ```
    /// # use tky2jgd::*;
    /// let tf = TransformerBuilder::new()
    ///     .parameters([
    ///         (54400000, (12.345, -5.678)),
    ///         (54400001, (12.445, -5.578)),
    ///         (54400010, (12.545, -5.478)),
    ///         (54400011, (12.645, -5.378)),
    ///     ])
    ///     .build();
    ///
    /// let result = tf.forward(&Point::new(36.0, 140.0)).unwrap();
    /// assert_eq!(result, Point::new(36.0 + 12.345 / 3600.0, 140.0 - 5.678 / 3600.0));
    /// ```
    #[inline]
    pub fn forward(&self, point: &Point) -> Option<Point> {
        self.correction(point).map(|correction| point + correction)
    }
}

/// The builder of [`Transformer`].
///
/// # Example
///
/// ```
/// # use std::collections::HashMap;
/// # use tky2jgd::*;
/// let tf: Transformer = TransformerBuilder::new()
///     .parameters([
///         (46303582, (11.49105, -11.80078)),
///         (46303583, (11.49085, -11.80115)),
///     ])
///     .description("My parameter".to_string())
///     .build();
///
/// assert_eq!(
///     tf.parameter,
///     HashMap::from([
///         (46303582, Parameter::new(11.49105, -11.80078)),
///         (46303583, Parameter::new(11.49085, -11.80115)),
///     ])
/// );
/// assert_eq!(tf.description, Some("My parameter".to_string()));
/// ```
#[derive(Debug, Default, Clone)]
pub struct TransformerBuilder {
    parameter: HashMap<i32, Parameter>,
    description: Option<String>,
}

impl TransformerBuilder {
    /// Makes a [`TransformerBuilder`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a [`Parameter`].
    ///
    /// # Example
    ///
    /// ```
    /// # use std::collections::HashMap;
    /// # use tky2jgd::*;
    /// let tf = TransformerBuilder::new()
    ///     .parameter(46303582, (11.49105, -11.80078))
    ///     .build();
    ///
    /// assert_eq!(
    ///     tf.parameter,
    ///     HashMap::from([(46303582, Parameter::new(11.49105, -11.80078))])
    /// );
    /// ```
    #[inline]
    pub fn parameter(mut self, meshcode: i32, parameter: impl Into<Parameter>) -> Self {
        self.parameter.insert(meshcode, parameter.into());
        self
    }

    /// Adds [`Parameter`]s.
    #[inline]
    pub fn parameters(
        mut self,
        parameters: impl IntoIterator<Item = (i32, impl Into<Parameter>)>,
    ) -> Self {
        for (meshcode, parameter) in parameters.into_iter() {
            self.parameter.insert(meshcode, parameter.into());
        }
        self
    }

    /// Updates [`description`](Transformer::description).
    #[inline]
    pub fn description(mut self, s: String) -> Self {
        self.description = Some(s);
        self
    }

    /// Builds [`Transformer`].
    #[inline]
    pub fn build(self) -> Transformer {
        Transformer {
            parameter: self.parameter,
            description: self.description,
        }
    }
}
