//! In-memory power service for testing without a system bus
//!
//! # Usage
//!
//! ```
//! use supower_core::mock::{MockDevice, MockService};
//! use supower_core::{DeviceInfo, Property};
//!
//! let service = MockService::new()
//!     .with_device(MockDevice::laptop_battery("/org/freedesktop/UPower/devices/battery_BAT0"));
//!
//! let info = DeviceInfo::fetch(&service, "/org/freedesktop/UPower/devices/battery_BAT0");
//! assert_eq!(info.get(Property::State).to_string(), "discharging");
//! ```

use crate::service::{PowerService, RawValue, ServiceError};
use std::cell::Cell;
use std::collections::HashMap;

/// Path UPower uses for its composite display device
pub const DISPLAY_DEVICE_PATH: &str = "/org/freedesktop/UPower/devices/DisplayDevice";

/// One mocked device and the properties it exposes
#[derive(Debug, Clone)]
pub struct MockDevice {
    pub path: String,
    pub properties: HashMap<String, RawValue>,
}

impl MockDevice {
    /// A device exposing no properties at all
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with(mut self, property: &str, value: RawValue) -> Self {
        self.properties.insert(property.to_string(), value);
        self
    }

    /// Discharging internal laptop battery
    pub fn laptop_battery(path: impl Into<String>) -> Self {
        Self::new(path)
            .with("NativePath", RawValue::Str("BAT0".into()))
            .with("Vendor", RawValue::Str("SMP".into()))
            .with("Model", RawValue::Str("5B10W13930".into()))
            .with("Serial", RawValue::Str("1185".into()))
            .with("PowerSupply", RawValue::Bool(true))
            .with("UpdateTime", RawValue::UInt(1_700_000_000))
            .with("HasHistory", RawValue::Bool(true))
            .with("HasStatistics", RawValue::Bool(true))
            .with("Type", RawValue::UInt(2))
            .with("IsPresent", RawValue::Bool(true))
            .with("IsRechargeable", RawValue::Bool(true))
            .with("State", RawValue::UInt(2))
            .with("WarningLevel", RawValue::UInt(1))
            .with("Energy", RawValue::Double(45.2))
            .with("EnergyEmpty", RawValue::Double(0.0))
            .with("EnergyFull", RawValue::Double(51.6))
            .with("EnergyFullDesign", RawValue::Double(57.0))
            .with("EnergyRate", RawValue::Double(8.3))
            .with("Voltage", RawValue::Double(12.4))
            .with("Capacity", RawValue::Double(90.5))
            .with("Percentage", RawValue::Double(87.6))
            .with("Technology", RawValue::UInt(2))
            .with("IconName", RawValue::Str("battery-full-symbolic".into()))
            .with("BatteryLevel", RawValue::UInt(1))
            .with("Temperature", RawValue::Double(0.0))
            .with("TimeToEmpty", RawValue::Int(19_605))
            .with("TimeToFull", RawValue::Int(0))
    }

    /// Connected AC adapter
    pub fn line_power(path: impl Into<String>) -> Self {
        Self::new(path)
            .with("NativePath", RawValue::Str("AC".into()))
            .with("PowerSupply", RawValue::Bool(true))
            .with("UpdateTime", RawValue::UInt(1_700_000_000))
            .with("HasHistory", RawValue::Bool(false))
            .with("HasStatistics", RawValue::Bool(false))
            .with("Type", RawValue::UInt(1))
            .with("Online", RawValue::Bool(true))
            .with("WarningLevel", RawValue::UInt(0))
            .with("IconName", RawValue::Str("ac-adapter-symbolic".into()))
    }

    /// Wireless mouse reporting a coarse battery level
    pub fn mouse(path: impl Into<String>, model: &str) -> Self {
        Self::new(path)
            .with("NativePath", RawValue::Str("hidpp_battery_0".into()))
            .with("Model", RawValue::Str(model.into()))
            .with("Serial", RawValue::Str("4082-a1-b2-c3".into()))
            .with("PowerSupply", RawValue::Bool(false))
            .with("UpdateTime", RawValue::UInt(1_700_000_000))
            .with("HasHistory", RawValue::Bool(true))
            .with("HasStatistics", RawValue::Bool(false))
            .with("Type", RawValue::UInt(5))
            .with("IsPresent", RawValue::Bool(true))
            .with("IsRechargeable", RawValue::Bool(true))
            .with("State", RawValue::UInt(2))
            .with("WarningLevel", RawValue::UInt(1))
            .with("Percentage", RawValue::Double(55.0))
            .with("IconName", RawValue::Str("battery-good-symbolic".into()))
            .with("BatteryLevel", RawValue::UInt(4))
    }
}

/// Power service backed by a fixed list of devices
#[derive(Debug, Default)]
pub struct MockService {
    devices: Vec<MockDevice>,
    display: Option<MockDevice>,
    unavailable: bool,
    property_calls: Cell<usize>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an enumerated device; enumeration keeps insertion order
    pub fn with_device(mut self, device: MockDevice) -> Self {
        self.devices.push(device);
        self
    }

    /// Set the composite display device, which is not enumerated
    pub fn with_display_device(mut self, device: MockDevice) -> Self {
        self.display = Some(device);
        self
    }

    /// Make every enumeration and display-device call fail
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Number of `get_property` calls served so far
    pub fn property_calls(&self) -> usize {
        self.property_calls.get()
    }

    fn find(&self, path: &str) -> Option<&MockDevice> {
        self.devices
            .iter()
            .chain(self.display.iter())
            .find(|device| device.path == path)
    }
}

impl PowerService for MockService {
    fn enumerate_devices(&self) -> Result<Vec<String>, ServiceError> {
        if self.unavailable {
            return Err(ServiceError::Unavailable("mock service offline".into()));
        }
        Ok(self.devices.iter().map(|d| d.path.clone()).collect())
    }

    fn display_device(&self) -> Result<String, ServiceError> {
        if self.unavailable {
            return Err(ServiceError::Unavailable("mock service offline".into()));
        }
        Ok(self
            .display
            .as_ref()
            .map_or_else(|| DISPLAY_DEVICE_PATH.to_string(), |d| d.path.clone()))
    }

    fn get_property(&self, device: &str, property: &str) -> Result<RawValue, ServiceError> {
        self.property_calls.set(self.property_calls.get() + 1);

        let mock = self
            .find(device)
            .ok_or_else(|| ServiceError::UnknownDevice(device.to_string()))?;

        mock.properties
            .get(property)
            .cloned()
            .ok_or_else(|| ServiceError::UnsupportedProperty {
                device: device.to_string(),
                property: property.to_string(),
            })
    }
}
