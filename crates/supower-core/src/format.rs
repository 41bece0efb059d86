//! Template rendering
//!
//! Templates substitute `{Property}` or `{Property:spec}` placeholders with
//! decoded device values. Only schema property names are accepted as keys.
//! `{{` and `}}` produce literal braces.
//!
//! The spec grammar is `[[fill]align][0][width][.precision][type]`, with align
//! one of `<`, `>`, `^` and type one of `f`, `d`, `%`. Fill, align and width
//! apply to any value; precision and type require a numeric value.

use crate::device::DeviceInfo;
use crate::schema::{DecodedValue, Property};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error("Empty placeholder in template")]
    EmptyPlaceholder,

    #[error("Unterminated placeholder in template: {0}")]
    Unterminated(String),

    #[error("Single '}}' encountered in template")]
    UnmatchedBrace,

    #[error("Invalid format specifier: {0}")]
    InvalidSpec(String),

    #[error("Format specifier '{spec}' needs a numeric value, {key} is {value:?}")]
    NonNumeric {
        key: String,
        spec: String,
        value: String,
    },

    #[error("Percentage is not a number: {0:?}")]
    InvalidPercentage(String),
}

/// Render `template` against the decoded properties of a device
pub fn render(template: &str, info: &DeviceInfo) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(|c: char| c == '{' || c == '}') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            return Err(FormatError::UnmatchedBrace);
        } else {
            let close = tail
                .find('}')
                .ok_or_else(|| FormatError::Unterminated(tail.to_string()))?;
            let field = &tail[1..close];
            if field.contains('{') {
                return Err(FormatError::Unterminated(tail.to_string()));
            }
            render_field(field, info, &mut out)?;
            rest = &tail[close + 1..];
        }
    }

    out.push_str(rest);
    Ok(out)
}

/// Render the percentage template and parse the result as a finite float
pub fn render_percentage(template: &str, info: &DeviceInfo) -> Result<f64, FormatError> {
    let rendered = render(template, info)?;
    match rendered.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FormatError::InvalidPercentage(rendered)),
    }
}

fn render_field(field: &str, info: &DeviceInfo, out: &mut String) -> Result<(), FormatError> {
    let (key, spec) = match field.split_once(':') {
        Some((key, spec)) => (key, Some(spec)),
        None => (field, None),
    };

    if key.is_empty() {
        return Err(FormatError::EmptyPlaceholder);
    }

    let property =
        Property::from_name(key).ok_or_else(|| FormatError::UnknownKey(key.to_string()))?;
    let value = info.get(property);

    match spec {
        None | Some("") => out.push_str(&value.to_string()),
        Some(spec) => {
            let parsed = FormatSpec::parse(spec)?;
            out.push_str(&parsed.apply(key, spec, value)?);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

impl Align {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberKind {
    Fixed,
    Integer,
    Percent,
}

/// Largest width or precision a spec may ask for
const MAX_SPEC_NUMBER: usize = u16::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
struct FormatSpec {
    fill: Option<char>,
    align: Option<Align>,
    /// Leading `0` before the width
    zero: bool,
    width: usize,
    precision: Option<usize>,
    kind: Option<NumberKind>,
}

impl FormatSpec {
    fn parse(spec: &str) -> Result<Self, FormatError> {
        let invalid = || FormatError::InvalidSpec(spec.to_string());
        let chars: Vec<char> = spec.chars().collect();
        let mut i = 0;

        let mut fill = None;
        let mut align = None;
        if let Some(a) = chars.get(1).copied().and_then(Align::from_char) {
            fill = Some(chars[0]);
            align = Some(a);
            i = 2;
        } else if let Some(a) = chars.first().copied().and_then(Align::from_char) {
            align = Some(a);
            i = 1;
        }

        let zero = chars.get(i) == Some(&'0');
        if zero {
            i += 1;
        }

        let (width, next) = take_digits(&chars, i).ok_or_else(invalid)?;
        let width = width.unwrap_or(0);
        i = next;

        let mut precision = None;
        if chars.get(i) == Some(&'.') {
            let (digits, next) = take_digits(&chars, i + 1).ok_or_else(invalid)?;
            precision = Some(digits.ok_or_else(invalid)?);
            i = next;
        }

        let kind = match chars.get(i) {
            Some('f') => Some(NumberKind::Fixed),
            Some('d') => Some(NumberKind::Integer),
            Some('%') => Some(NumberKind::Percent),
            Some(_) => return Err(invalid()),
            None => None,
        };
        if kind.is_some() {
            i += 1;
        }

        if i != chars.len() || (kind == Some(NumberKind::Integer) && precision.is_some()) {
            return Err(invalid());
        }

        Ok(Self {
            fill,
            align,
            zero,
            width,
            precision,
            kind,
        })
    }

    fn apply(&self, key: &str, spec: &str, value: &DecodedValue) -> Result<String, FormatError> {
        let numeric = self.precision.is_some() || self.kind.is_some();
        let non_numeric = || FormatError::NonNumeric {
            key: key.to_string(),
            spec: spec.to_string(),
            value: value.to_string(),
        };

        let body = if numeric {
            match (self.kind, value) {
                (Some(NumberKind::Integer), DecodedValue::Integer(n)) => n.to_string(),
                (Some(NumberKind::Integer), _) => return Err(non_numeric()),
                (Some(NumberKind::Percent), _) => {
                    let v = value.as_f64().ok_or_else(non_numeric)?;
                    format!("{:.*}%", self.precision.unwrap_or(6), v * 100.0)
                }
                // A bare precision behaves like `f`
                (Some(NumberKind::Fixed) | None, _) => {
                    let v = value.as_f64().ok_or_else(non_numeric)?;
                    format!("{:.*}", self.precision.unwrap_or(6), v)
                }
            }
        } else {
            value.to_string()
        };

        // `0` with neither fill nor align pads numbers between sign and digits
        if self.zero && self.fill.is_none() && self.align.is_none() && value.is_numeric() {
            return Ok(pad_after_sign(&body, self.width));
        }

        let fill = self.fill.unwrap_or(if self.zero { '0' } else { ' ' });
        let default_align = if value.is_numeric() {
            Align::Right
        } else {
            Align::Left
        };
        Ok(pad(&body, fill, self.align.unwrap_or(default_align), self.width))
    }
}

/// Parse a run of digits at `start`; `None` when it exceeds [`MAX_SPEC_NUMBER`]
fn take_digits(chars: &[char], start: usize) -> Option<(Option<usize>, usize)> {
    let end = chars[start.min(chars.len())..]
        .iter()
        .position(|c| !c.is_ascii_digit())
        .map_or(chars.len(), |offset| start + offset);
    if end <= start {
        return Some((None, start));
    }
    let digits: String = chars[start..end].iter().collect();
    let number = digits.parse::<usize>().ok().filter(|n| *n <= MAX_SPEC_NUMBER)?;
    Some((Some(number), end))
}

fn pad_after_sign(body: &str, width: usize) -> String {
    match body.strip_prefix('-') {
        Some(digits) => format!("-{}", pad(digits, '0', Align::Right, width.saturating_sub(1))),
        None => pad(body, '0', Align::Right, width),
    }
}

fn pad(body: &str, fill: char, align: Align, width: usize) -> String {
    let len = body.chars().count();
    if len >= width {
        return body.to_string();
    }
    let total = width - len;
    let (left, right) = match align {
        Align::Left => (0, total),
        Align::Right => (total, 0),
        Align::Center => (total / 2, total - total / 2),
    };

    let mut out = String::with_capacity(body.len() + total);
    out.extend(std::iter::repeat_n(fill, left));
    out.push_str(body);
    out.extend(std::iter::repeat_n(fill, right));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> DeviceInfo {
        DeviceInfo::unavailable("/org/freedesktop/UPower/devices/battery_BAT0")
            .with(Property::Percentage, DecodedValue::Float(87.6))
            .with(Property::Model, DecodedValue::Text("MX Master 2S".into()))
            .with(Property::BatteryLevel, DecodedValue::Label("normal"))
            .with(Property::TimeToEmpty, DecodedValue::Integer(5400))
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        for template in ["", "battery", "no placeholders here: 42%", "ünïcødé"] {
            assert_eq!(render(template, &info()).unwrap(), template);
        }
    }

    #[test]
    fn test_substitution() {
        assert_eq!(
            render("{Model} is {BatteryLevel}", &info()).unwrap(),
            "MX Master 2S is normal"
        );
        assert_eq!(render("{Percentage}%", &info()).unwrap(), "87.6%");
        assert_eq!(render("{Luminosity}", &info()).unwrap(), "none");
    }

    #[test]
    fn test_precision() {
        assert_eq!(render("{Percentage:.0f}", &info()).unwrap(), "88");
        assert_eq!(render("{Percentage:.2f}", &info()).unwrap(), "87.60");
        assert_eq!(render("{Percentage:.1}", &info()).unwrap(), "87.6");
        assert_eq!(render("{TimeToEmpty:.1f}", &info()).unwrap(), "5400.0");
        assert_eq!(render("{TimeToEmpty:d}", &info()).unwrap(), "5400");
    }

    #[test]
    fn test_percentage_field() {
        assert_eq!(render_percentage("{Percentage:.0f}", &info()).unwrap(), 88.0);
        assert_eq!(render_percentage(" 12 ", &info()).unwrap(), 12.0);
        assert!(matches!(
            render_percentage("{Model}", &info()),
            Err(FormatError::InvalidPercentage(_))
        ));
        // "none" is not a number either
        assert!(render_percentage("{Luminosity}", &info()).is_err());
    }

    #[test]
    fn test_width_and_alignment() {
        assert_eq!(render("[{Percentage:>6.1f}]", &info()).unwrap(), "[  87.6]");
        assert_eq!(render("[{Percentage:6.0f}]", &info()).unwrap(), "[    88]");
        assert_eq!(render("[{BatteryLevel:8}]", &info()).unwrap(), "[normal  ]");
        assert_eq!(render("[{BatteryLevel:*^10}]", &info()).unwrap(), "[**normal**]");
        assert_eq!(render("[{Model:3}]", &info()).unwrap(), "[MX Master 2S]");
    }

    #[test]
    fn test_percent_type() {
        let info = info().with(Property::Capacity, DecodedValue::Float(0.905));
        assert_eq!(render("{Capacity:.1%}", &info).unwrap(), "90.5%");
    }

    #[test]
    fn test_escaped_braces() {
        assert_eq!(render("{{Model}}", &info()).unwrap(), "{Model}");
        assert_eq!(render("{{{Model}}}", &info()).unwrap(), "{MX Master 2S}");
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            render("{Modle}", &info()),
            Err(FormatError::UnknownKey("Modle".into()))
        );
        assert!(render("{model}", &info()).is_err());
        assert!(render("{__class__}", &info()).is_err());
    }

    #[test]
    fn test_malformed_templates() {
        assert!(matches!(render("{Model", &info()), Err(FormatError::Unterminated(_))));
        assert_eq!(render("Model}", &info()), Err(FormatError::UnmatchedBrace));
        assert_eq!(render("{}", &info()), Err(FormatError::EmptyPlaceholder));
        assert!(matches!(render("{{Model}", &info()), Err(FormatError::UnmatchedBrace)));
        assert!(matches!(render("{Mo{del}", &info()), Err(FormatError::Unterminated(_))));
    }

    #[test]
    fn test_numeric_spec_on_text_is_rejected() {
        assert!(matches!(
            render("{Model:.0f}", &info()),
            Err(FormatError::NonNumeric { .. })
        ));
        assert!(matches!(
            render("{Luminosity:.0f}", &info()),
            Err(FormatError::NonNumeric { .. })
        ));
        assert!(matches!(
            render("{Percentage:d}", &info()),
            Err(FormatError::NonNumeric { .. })
        ));
    }

    #[test]
    fn test_invalid_specs() {
        for spec in ["{Percentage:.f}", "{Percentage:x}", "{Percentage:.1d}", "{Percentage:.0ff}"] {
            assert!(
                matches!(render(spec, &info()), Err(FormatError::InvalidSpec(_))),
                "{spec} should be rejected"
            );
        }
    }

    #[test]
    fn test_oversized_width_and_precision() {
        for spec in [
            "{Percentage:.70000f}",
            "{Percentage:99999999999999}",
            "{Percentage:.99999999999999999999999f}",
            "{Model:>70000}",
        ] {
            assert!(
                matches!(render(spec, &info()), Err(FormatError::InvalidSpec(_))),
                "{spec} should be rejected"
            );
        }
        assert_eq!(render("{Percentage:.3f}", &info()).unwrap(), "87.600");
    }

    #[test]
    fn test_non_finite_percentage() {
        for template in ["nan", "inf", "-infinity", "{Percentage:.0f}"] {
            let info = info().with(Property::Percentage, DecodedValue::Float(f64::NAN));
            assert!(
                matches!(
                    render_percentage(template, &info),
                    Err(FormatError::InvalidPercentage(_))
                ),
                "{template} should be rejected"
            );
        }
        let info = info().with(Property::Percentage, DecodedValue::Float(f64::INFINITY));
        assert!(render_percentage("{Percentage}", &info).is_err());
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(render("{Percentage:05.1f}", &info()).unwrap(), "087.6");
        assert_eq!(render("{TimeToEmpty:06d}", &info()).unwrap(), "005400");
        let info = info().with(Property::Temperature, DecodedValue::Float(-3.5));
        assert_eq!(render("{Temperature:06.1f}", &info).unwrap(), "-003.5");
        assert_eq!(render("{Temperature:<06.1f}", &info).unwrap(), "-3.500");
        assert_eq!(render("{Temperature:*>06.1f}", &info).unwrap(), "**-3.5");
        assert_eq!(render("{BatteryLevel:08}", &info).unwrap(), "normal00");
    }

    #[test]
    fn test_empty_spec() {
        assert_eq!(render("{Model:}", &info()).unwrap(), "MX Master 2S");
    }
}
