//! Decoded device snapshots
//!
//! A [`DeviceInfo`] holds one slot per schema property, always initialized.
//! Fetching never fails as a whole: a property the service cannot deliver
//! is stored as the "none" sentinel.

use crate::schema::{DecodedValue, Property};
use crate::service::PowerService;
use crate::tooltip::DeviceKind;

/// All decoded properties of one device
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    path: String,
    values: [DecodedValue; Property::COUNT],
}

impl DeviceInfo {
    /// A device whose every property is unavailable
    pub fn unavailable(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            values: std::array::from_fn(|_| DecodedValue::None),
        }
    }

    /// Query every schema property of `path`, one call per property
    pub fn fetch<S: PowerService + ?Sized>(service: &S, path: &str) -> Self {
        tracing::debug!("Fetching properties of {}", path);
        Self {
            path: path.to_string(),
            values: std::array::from_fn(|slot| fetch_property(service, path, Property::ALL[slot])),
        }
    }

    /// Replace one value, for building snapshots by hand
    pub fn with(mut self, property: Property, value: DecodedValue) -> Self {
        self.values[property.slot()] = value;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn get(&self, property: Property) -> &DecodedValue {
        &self.values[property.slot()]
    }

    /// Device kind derived from the decoded `Type`
    pub fn kind(&self) -> DeviceKind {
        DeviceKind::from_type(self.get(Property::Type))
    }
}

/// Fetch and decode a single property, degrading any failure to "none"
pub fn fetch_property<S: PowerService + ?Sized>(
    service: &S,
    path: &str,
    property: Property,
) -> DecodedValue {
    match service.get_property(path, property.name()) {
        Ok(raw) => property.decode(&raw),
        Err(e) => {
            tracing::debug!("{} unavailable on {}: {}", property, path, e);
            DecodedValue::None
        }
    }
}

/// `(path, Model)` for every device, in the given order
pub fn list_devices<S: PowerService + ?Sized>(
    service: &S,
    devices: &[String],
) -> Vec<(String, DecodedValue)> {
    devices
        .iter()
        .map(|path| (path.clone(), fetch_property(service, path, Property::Model)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDevice, MockService};
    use crate::service::RawValue;

    const BAT0: &str = "/org/freedesktop/UPower/devices/battery_BAT0";

    #[test]
    fn test_fetch_is_complete() {
        let service = MockService::new().with_device(MockDevice::laptop_battery(BAT0));
        let info = DeviceInfo::fetch(&service, BAT0);

        assert_eq!(info.path(), BAT0);
        assert_eq!(service.property_calls(), Property::COUNT);
        assert_eq!(info.get(Property::State), &DecodedValue::Label("discharging"));
        assert_eq!(info.get(Property::Percentage), &DecodedValue::Float(87.6));
    }

    #[test]
    fn test_missing_property_degrades_to_none() {
        let service = MockService::new().with_device(MockDevice::laptop_battery(BAT0));
        let info = DeviceInfo::fetch(&service, BAT0);

        // Batteries have no luminosity
        assert!(info.get(Property::Luminosity).is_none());
        assert_eq!(info.get(Property::Model), &DecodedValue::Text("5B10W13930".into()));
    }

    #[test]
    fn test_unknown_device_is_all_none() {
        let service = MockService::new();
        let info = DeviceInfo::fetch(&service, "/nope");
        assert!(Property::ALL.iter().all(|property| info.get(*property).is_none()));
    }

    #[test]
    fn test_out_of_range_code_degrades_to_none() {
        let device = MockDevice::new(BAT0).with("State", RawValue::UInt(42));
        let service = MockService::new().with_device(device);
        let info = DeviceInfo::fetch(&service, BAT0);
        assert!(info.get(Property::State).is_none());
    }

    #[test]
    fn test_list_devices() {
        let service = MockService::new()
            .with_device(MockDevice::laptop_battery(BAT0))
            .with_device(MockDevice::new("/org/freedesktop/UPower/devices/hid_dev"));
        let devices = service.enumerate_devices().unwrap();

        let listed = list_devices(&service, &devices);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].1.to_string(), "5B10W13930");
        assert_eq!(listed[1].1.to_string(), "none");
    }
}
