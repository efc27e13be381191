/// Parsing of raw control values into numbers
///
/// Controls hand over their value as text. The leading numeric prefix is read
/// and anything after it is ignored, so `"12.5cm"` reads as `12.5` while an
/// empty field or `"abc"` is rejected. An exponent marker with no digits
/// after it ends the number, so `"4e"` reads as `4`.
use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{map_res, opt, recognize},
    number::complete::double,
    sequence::{pair, tuple},
    IResult,
};

use crate::error::{Error, Result};

/// Sign, digits and fraction without an exponent
fn mantissa(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
        ))),
        str::parse,
    )(input)
}

fn leading_number(input: &str) -> IResult<&str, f64> {
    let (input, _) = multispace0::<_, nom::error::Error<&str>>(input)?;
    match double(input) {
        // `double` commits once it sees `e`; fall back to the part before it
        Err(nom::Err::Failure(_)) => mantissa(input),
        result => result,
    }
}

/// Read the leading number of `raw`. `name` identifies the control in errors.
pub fn parse_number(name: &str, raw: &str) -> Result<f64> {
    match leading_number(raw) {
        Ok((_, value)) => Ok(value),
        Err(_) => Err(Error::invalid(name, raw)),
    }
}

/// Read the leading number of `raw` and require it to be a finite positive value.
pub fn parse_positive(name: &str, raw: &str) -> Result<f64> {
    let value = parse_number(name, raw)?;
    ensure_positive(name, value)
}

pub fn ensure_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::invalid(name, value))
    }
}

/// A positive value that survives conversion to mesh coordinates
pub fn ensure_dimension(name: &str, value: f64) -> Result<f64> {
    let value = ensure_positive(name, value)?;
    if (f32::MIN_POSITIVE as f64..=f32::MAX as f64).contains(&value) {
        Ok(value)
    } else {
        Err(Error::invalid(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_number("height", "2").unwrap(), 2.0);
        assert_eq!(parse_number("height", "12.5").unwrap(), 12.5);
        assert_eq!(parse_number("height", ".5").unwrap(), 0.5);
        assert_eq!(parse_number("height", "-3").unwrap(), -3.0);
    }

    #[test]
    fn test_leading_prefix_wins() {
        assert_eq!(parse_number("length", "  7.25 units").unwrap(), 7.25);
        assert_eq!(parse_number("length", "4abc").unwrap(), 4.0);
        assert_eq!(parse_number("length", "4e").unwrap(), 4.0);
        assert_eq!(parse_number("length", "2.5em").unwrap(), 2.5);
        assert_eq!(parse_number("length", "-3.e+x").unwrap(), -3.0);
        assert_eq!(parse_number("length", "1.5e2px").unwrap(), 150.0);
    }

    #[test]
    fn test_non_numeric_rejected() {
        for raw in ["", "   ", "abc", "-"] {
            let err = parse_number("sideA", raw).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { ref name, .. } if name == "sideA"));
        }
    }

    #[test]
    fn test_positive_required() {
        assert!(parse_positive("radius", "0").is_err());
        assert!(parse_positive("radius", "-1.5").is_err());
        assert_eq!(parse_positive("radius", "1.5").unwrap(), 1.5);
        assert!(ensure_positive("radius", f64::NAN).is_err());
        assert!(ensure_positive("radius", f64::INFINITY).is_err());
    }

    #[test]
    fn test_dimension_must_fit_mesh_coordinates() {
        assert_eq!(ensure_dimension("height", 2.5).unwrap(), 2.5);
        assert!(ensure_dimension("height", 1e-200).is_err());
        assert!(ensure_dimension("height", 1e300).is_err());
        assert!(ensure_dimension("height", 0.0).is_err());
        // the target volume is never tessellated
        assert!(ensure_positive("targetVolume", 1e300).is_ok());
    }
}
