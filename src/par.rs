//! Provides deserializer of the TKY2JGD par file.
//!
//! A parameter record is a line shaped
//! `<meshcode> <dB [sec]> <dL [sec]>`,
//! e.g. `46303582   11.49105  -11.80078`.
//! Lines which do not match the shape, such as the header,
//! are skipped silently.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::transformer::{Parameter, Transformer};

/// Deserialize par-formatted [`&str`] into a [`Transformer`].
///
/// A record is recognized anchored at the start of the line;
/// the meshcode is a run of digits, the corrections are plain decimals
/// (a dot and a fraction part required) separated by whitespace.
/// Any other line is not an error, it is skipped.
/// Trailing content after the third field is ignored.
/// The record of a duplicated meshcode overwrites the earlier one.
///
/// # Example
///
/// ```
/// # use tky2jgd::*;
/// let s = r"JGD2000-TokyoDatum Ver.2.1.2
/// MeshCode   dB(sec)   dL(sec)
/// 46303582   11.49105  -11.80078
/// 46303583   11.49085  -11.80115";
/// let tf = par::from_str(s);
///
/// assert_eq!(
///     tf.parameter.get(&46303582),
///     Some(&Parameter::new(11.49105, -11.80078))
/// );
/// ```
pub fn from_str(s: &str) -> Transformer {
    let mut parameter = HashMap::new();
    for line in s.lines() {
        if let Some((meshcode, param)) = parse_line(line) {
            parameter.insert(meshcode, param);
        }
    }

    parameter.shrink_to_fit();

    Transformer::new(parameter)
}

/// Reads and deserializes a par file into a [`Transformer`].
///
/// The [`description`](Transformer::description) of the result
/// is the path of the file.
///
/// # Errors
///
/// Returns [`Err`] only when the file cannot be opened or read.
///
/// # Example
///
/// ```no_run
/// # use tky2jgd::*;
/// # fn main() -> Result<()> {
/// let tf = par::from_path("TKY2JGD.par")?;
/// assert_eq!(tf.description, Some("TKY2JGD.par".to_string()));
/// # Ok(())}
/// ```
pub fn from_path(path: impl AsRef<Path>) -> Result<Transformer> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(Error::new_io)?;

    let mut tf = from_str(&s);
    tf.description = Some(path.display().to_string());

    Ok(tf)
}

/// Recognizes `<digits><ws><decimal><ws><decimal>`
/// anchored at the start of `line`.
fn parse_line(line: &str) -> Option<(i32, Parameter)> {
    let (meshcode, rest) = take_meshcode(line)?;
    let rest = take_whitespace(rest)?;
    let (latitude, rest) = take_decimal(rest)?;
    let rest = take_whitespace(rest)?;
    let (longitude, _) = take_decimal(rest)?;

    Some((meshcode, Parameter::new(latitude, longitude)))
}

/// Returns the length of the leading run of ASCII digits.
fn digits_end(s: &str) -> usize {
    s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len())
}

/// Splits a run of digits off the head of `s`, parsed as a meshcode.
fn take_meshcode(s: &str) -> Option<(i32, &str)> {
    let end = digits_end(s);
    if end == 0 {
        return None;
    }

    let meshcode = s[..end].parse().ok()?;
    Some((meshcode, &s[end..]))
}

/// Strips at least one whitespace character off the head of `s`.
fn take_whitespace(s: &str) -> Option<&str> {
    let rest = s.trim_start();
    if rest.len() == s.len() {
        return None;
    }

    Some(rest)
}

/// Splits a plain signed decimal, `-?<digits>.<digits>`, off the head of `s`.
fn take_decimal(s: &str) -> Option<(f64, &str)> {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let int_end = digits_end(unsigned);
    if int_end == 0 {
        return None;
    }

    let fract = unsigned[int_end..].strip_prefix('.')?;
    let fract_end = digits_end(fract);
    if fract_end == 0 {
        return None;
    }

    let end = (s.len() - unsigned.len()) + int_end + 1 + fract_end;
    let value: f64 = s[..end].parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some((value, &s[end..]))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_records() {
        let s = "JGD2000-TokyoDatum Ver.2.1.2
MeshCode   dB(sec)   dL(sec)
46303582   11.49105  -11.80078
46303583   11.49085  -11.80115
46303584   11.49065  -11.80152";
        let tf = from_str(s);

        assert_eq!(tf.parameter.len(), 3);
        assert_eq!(
            tf.parameter.get(&46303582),
            Some(&Parameter::new(11.49105, -11.80078))
        );
        assert_eq!(
            tf.parameter.get(&46303584),
            Some(&Parameter::new(11.49065, -11.80152))
        );
        assert_eq!(tf.description, None);
    }

    #[test]
    fn test_skips_silently() {
        let s = "JGD2000-TokyoDatum Ver.2.1.2
MeshCode   dB(sec)   dL(sec)

# a comment
46303582   11.49105
46303583   11.49085  -11
46303584   eleven    -11.80152
 46303585  11.49065  -11.80152
-46303586  11.49065  -11.80152
46303587 11.49065 -11.80152 trailing content is fine
46303588\t11.49065\t-11.80152";
        let tf = from_str(s);

        // only the last two lines match; a record is anchored at the
        // start of the line and both corrections require a fraction part
        assert_eq!(tf.parameter.len(), 2);
        assert_eq!(
            tf.parameter.get(&46303587),
            Some(&Parameter::new(11.49065, -11.80152))
        );
        assert_eq!(
            tf.parameter.get(&46303588),
            Some(&Parameter::new(11.49065, -11.80152))
        );
    }

    #[test]
    fn test_empty() {
        let tf = from_str("");
        assert!(tf.parameter.is_empty());

        let tf = from_str("JGD2000-TokyoDatum Ver.2.1.2\n");
        assert!(tf.parameter.is_empty());
    }

    #[test]
    fn test_duplicate_last_wins() {
        let s = "46303582   11.49105  -11.80078
46303582    0.00001    0.00002";
        let tf = from_str(s);

        assert_eq!(tf.parameter.len(), 1);
        assert_eq!(
            tf.parameter.get(&46303582),
            Some(&Parameter::new(0.00001, 0.00002))
        );
    }

    #[test]
    fn test_sign() {
        // `+` prefixes match neither the meshcode nor the corrections
        let s = "+46303582  11.49105  -11.80078
46303583  +11.49085  -11.80115
46303584  -11.49065  -11.80152";
        let tf = from_str(s);

        assert_eq!(tf.parameter.len(), 1);
        assert_eq!(
            tf.parameter.get(&46303584),
            Some(&Parameter::new(-11.49065, -11.80152))
        );
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "JGD2000-TokyoDatum Ver.2.1.2\nMeshCode   dB(sec)   dL(sec)\n46303582   11.49105  -11.80078\n"
        )
        .unwrap();

        let tf = from_path(file.path()).unwrap();
        assert_eq!(
            tf.parameter.get(&46303582),
            Some(&Parameter::new(11.49105, -11.80078))
        );
        assert_eq!(tf.description, Some(file.path().display().to_string()));
    }

    #[test]
    fn test_from_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = from_path(dir.path().join("TKY2JGD.par"));

        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err().kind(),
            crate::error::ErrorImpl::Io { .. }
        ));
    }
}
