//! # tky2jgd
//!
//! Coordinate transformer from the Tokyo Datum to JGD2000 (or Tokyo97)
//! by _Gridded Correction Parameter_
//! which Geospatial Information Authority of Japan (GIAJ) distributing [^1].
//!
//! 国土地理院が公開している地域毎の変換パラメータ（TKY2JGD.par）による
//! 日本測地系から世界測地系への座標変換を提供します [^2]。
//!
//! ```no_run
//! use std::error::Error;
//!
//! use tky2jgd::Point;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     // Deserialize the par-formatted file, e.g. TKY2JGD.par
//!     let tf = tky2jgd::par::from_path("TKY2JGD.par")?;
//!
//!     // Makes the origin of transformation, Tokyo Datum [deg]
//!     let origin = Point::new(36.103774791666666, 140.08785504166664);
//!
//!     // Perform transformation resulting a Point, JGD2000 [deg],
//!     // or None when the origin is outside of the mesh coverage
//!     match tf.forward(&origin) {
//!         Some(result) => println!("{result:?}"),
//!         None => println!("outside of the mesh coverage"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! Features:
//!
//! - Supports offline transformation (no web API)
//! - Locates the standard area mesh cell of a coordinate
//!   and resolves its east, north and north-east neighbors
//! - Bilinear interpolation of the correction over the unit cell
//! - "Outside of the coverage" is a quiet [`None`], never an error
//! - It depends on [`serde`][serde] crate only if the feature `serde` is on
//!
//! [serde]: https://crates.io/crates/serde
//!
//! This package does not contain the parameter file,
//! download it from GIAJ [^2].
//!
//! We use _TKY2JGD for Windows Ver.1.3.79_ as the reference of behavior [^3].
//!
//! [^1]: Geospatial Information Authority of Japan (GIAJ, 国土地理院):
//!       <https://www.gsi.go.jp/>.
//!
//! [^2]: TKY2JGD download page:
//!       <https://www.gsi.go.jp/sokuchikijun/tky2jgd_download.html>.
//!
//! [^3]: Released under 国土地理院コンテンツ利用規約
//!       which compatible to CC BY 4.0.

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use point::Point;
#[doc(inline)]
pub use transformer::{Correction, Parameter, Transformer, TransformerBuilder};

pub mod error;
pub mod mesh;
pub mod par;
pub mod point;
pub mod transformer;
