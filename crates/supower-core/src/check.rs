//! Boolean property checks for scripting

use crate::device::DeviceInfo;
use crate::schema::{DecodedValue, Property};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CheckError {
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("{0} is not a yes/no property")]
    NotBoolean(String),

    #[error("{0} is unavailable")]
    Unavailable(String),
}

/// Exit code for `name`: 0 when it is "yes", 1 when it is "no"
pub fn check(name: &str, info: &DeviceInfo) -> Result<u8, CheckError> {
    let property =
        Property::from_name(name).ok_or_else(|| CheckError::UnknownProperty(name.to_string()))?;

    if !property.is_flag() {
        return Err(CheckError::NotBoolean(name.to_string()));
    }

    match info.get(property) {
        DecodedValue::Label("yes") => Ok(0),
        DecodedValue::Label("no") => Ok(1),
        DecodedValue::None => Err(CheckError::Unavailable(name.to_string())),
        _ => Err(CheckError::NotBoolean(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn online(value: DecodedValue) -> DeviceInfo {
        DeviceInfo::unavailable("/org/freedesktop/UPower/devices/line_power_AC")
            .with(Property::Online, value)
    }

    #[test]
    fn test_yes_and_no() {
        assert_eq!(check("Online", &online(DecodedValue::Label("yes"))), Ok(0));
        assert_eq!(check("Online", &online(DecodedValue::Label("no"))), Ok(1));
    }

    #[test]
    fn test_none_is_an_error() {
        assert_eq!(
            check("Online", &online(DecodedValue::None)),
            Err(CheckError::Unavailable("Online".into()))
        );
    }

    #[test]
    fn test_non_boolean_property() {
        let info = online(DecodedValue::Label("yes"))
            .with(Property::State, DecodedValue::Label("charging"));
        assert_eq!(
            check("State", &info),
            Err(CheckError::NotBoolean("State".into()))
        );
        assert_eq!(
            check("Percentage", &info),
            Err(CheckError::NotBoolean("Percentage".into()))
        );
    }

    #[test]
    fn test_unknown_property() {
        assert_eq!(
            check("IsCharging", &online(DecodedValue::Label("yes"))),
            Err(CheckError::UnknownProperty("IsCharging".into()))
        );
    }
}
