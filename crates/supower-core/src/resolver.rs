//! Device resolution
//!
//! Maps what the user typed (a device path or a model name) onto a
//! canonical device path.

use crate::device::fetch_property;
use crate::schema::{DecodedValue, Property};
use crate::service::PowerService;
use crate::CoreError;

/// Resolve `identifier` against the enumerated `devices`.
///
/// An exact path match is returned without touching the service. Otherwise
/// the first device, in enumeration order, whose `Model` equals the
/// identifier wins.
pub fn resolve<S: PowerService + ?Sized>(
    service: &S,
    identifier: &str,
    devices: &[String],
) -> crate::Result<String> {
    if devices.iter().any(|path| path == identifier) {
        tracing::debug!("{} is a known device path", identifier);
        return Ok(identifier.to_string());
    }

    for path in devices {
        if let DecodedValue::Text(model) = fetch_property(service, path, Property::Model) {
            if model == identifier {
                tracing::info!("Model {:?} resolved to {}", identifier, path);
                return Ok(path.clone());
            }
        }
    }

    Err(CoreError::DeviceNotFound(identifier.to_string()))
}

/// Resolve an optional identifier, falling back to the display device
pub fn resolve_or_display<S: PowerService + ?Sized>(
    service: &S,
    identifier: Option<&str>,
) -> crate::Result<String> {
    match identifier {
        Some(identifier) => {
            let devices = service.enumerate_devices()?;
            resolve(service, identifier, &devices)
        }
        None => {
            let path = service.display_device()?;
            tracing::debug!("No device requested, using {}", path);
            Ok(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{DISPLAY_DEVICE_PATH, MockDevice, MockService};

    const BAT0: &str = "/org/freedesktop/UPower/devices/battery_BAT0";
    const AC: &str = "/org/freedesktop/UPower/devices/line_power_AC";
    const MOUSE: &str = "/org/freedesktop/UPower/devices/battery_hidpp_battery_0";

    fn service() -> MockService {
        MockService::new()
            .with_device(MockDevice::laptop_battery(BAT0))
            .with_device(MockDevice::line_power(AC))
            .with_device(MockDevice::mouse(MOUSE, "MX Master 2S"))
    }

    #[test]
    fn test_path_is_returned_without_service_calls() {
        let service = service();
        let devices = service.enumerate_devices().unwrap();

        assert_eq!(resolve(&service, AC, &devices).unwrap(), AC);
        assert_eq!(service.property_calls(), 0);
    }

    #[test]
    fn test_model_match() {
        let service = service();
        let devices = service.enumerate_devices().unwrap();
        assert_eq!(resolve(&service, "MX Master 2S", &devices).unwrap(), MOUSE);
    }

    #[test]
    fn test_first_match_wins() {
        let second = "/org/freedesktop/UPower/devices/battery_hidpp_battery_1";
        let service = MockService::new()
            .with_device(MockDevice::mouse(MOUSE, "MX Master 2S"))
            .with_device(MockDevice::mouse(second, "MX Master 2S"));
        let devices = service.enumerate_devices().unwrap();

        assert_eq!(resolve(&service, "MX Master 2S", &devices).unwrap(), MOUSE);
        // Scanning stops at the first hit
        assert_eq!(service.property_calls(), 1);
    }

    #[test]
    fn test_model_must_match_exactly() {
        let service = service();
        let devices = service.enumerate_devices().unwrap();
        assert!(resolve(&service, "MX Master", &devices).is_err());
    }

    #[test]
    fn test_sentinel_model_never_matches() {
        // Line power has no Model, which decodes to "none"
        let service = MockService::new().with_device(MockDevice::line_power(AC));
        let devices = service.enumerate_devices().unwrap();
        assert!(resolve(&service, "none", &devices).is_err());
    }

    #[test]
    fn test_not_found_carries_identifier() {
        let service = service();
        let devices = service.enumerate_devices().unwrap();

        match resolve(&service, "Keychron K2", &devices) {
            Err(CoreError::DeviceNotFound(id)) => assert_eq!(id, "Keychron K2"),
            other => panic!("expected DeviceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_display_fallback() {
        let service = service();
        assert_eq!(resolve_or_display(&service, None).unwrap(), DISPLAY_DEVICE_PATH);
        assert_eq!(resolve_or_display(&service, Some(BAT0)).unwrap(), BAT0);
    }

    #[test]
    fn test_enumeration_failure_propagates() {
        let service = MockService::new().unavailable();
        assert!(matches!(
            resolve_or_display(&service, Some("MX Master 2S")),
            Err(CoreError::Service(_))
        ));
    }
}
