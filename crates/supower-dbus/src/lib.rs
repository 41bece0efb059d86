//! UPower over the D-Bus system bus
//!
//! Implements [`PowerService`] with zbus' blocking API. Every property read
//! is its own `org.freedesktop.DBus.Properties.Get` round trip; nothing is
//! cached between calls.
//!
//! # Example
//!
//! ```no_run
//! use supower_core::{DeviceInfo, PowerService};
//! use supower_dbus::UPowerService;
//!
//! fn main() -> Result<(), supower_core::ServiceError> {
//!     let upower = UPowerService::connect()?;
//!     for path in upower.enumerate_devices()? {
//!         let info = DeviceInfo::fetch(&upower, &path);
//!         println!("{}: {}", path, info.get(supower_core::Property::Model));
//!     }
//!     Ok(())
//! }
//! ```

use supower_core::service::{DEVICE_INTERFACE, UPOWER_SERVICE};
use supower_core::{PowerService, RawValue, ServiceError};
use zbus::blocking::Connection;
use zbus::blocking::fdo::PropertiesProxy;
use zbus::fdo;
use zbus::names::InterfaceName;
use zbus::zvariant::{OwnedObjectPath, Value};

#[zbus::proxy(
    interface = "org.freedesktop.UPower",
    default_service = "org.freedesktop.UPower",
    default_path = "/org/freedesktop/UPower"
)]
pub trait UPower {
    /// EnumerateDevices method
    fn enumerate_devices(&self) -> zbus::Result<Vec<OwnedObjectPath>>;

    /// GetDisplayDevice method
    fn get_display_device(&self) -> zbus::Result<OwnedObjectPath>;
}

/// Power service backed by the UPower daemon
pub struct UPowerService {
    connection: Connection,
    interface: InterfaceName<'static>,
}

impl UPowerService {
    /// Connect to the system bus
    pub fn connect() -> Result<Self, ServiceError> {
        let connection =
            Connection::system().map_err(|e| ServiceError::Unavailable(e.to_string()))?;
        tracing::debug!("Connected to the system bus");
        Self::with_connection(connection)
    }

    /// Use an existing connection
    pub fn with_connection(connection: Connection) -> Result<Self, ServiceError> {
        let interface = InterfaceName::from_static_str(DEVICE_INTERFACE)
            .map_err(|e| ServiceError::CallFailed(e.to_string()))?;
        Ok(Self {
            connection,
            interface,
        })
    }

    fn manager(&self) -> Result<UPowerProxyBlocking<'static>, ServiceError> {
        UPowerProxyBlocking::new(&self.connection).map_err(unavailable)
    }

    fn device_properties<'a>(&self, device: &'a str) -> zbus::Result<PropertiesProxy<'a>> {
        PropertiesProxy::builder(&self.connection)
            .destination(UPOWER_SERVICE)?
            .path(device)?
            .build()
    }
}

impl PowerService for UPowerService {
    fn enumerate_devices(&self) -> Result<Vec<String>, ServiceError> {
        let devices = self.manager()?.enumerate_devices().map_err(unavailable)?;
        tracing::debug!("UPower enumerated {} devices", devices.len());
        Ok(devices.iter().map(|path| path.as_str().to_string()).collect())
    }

    fn display_device(&self) -> Result<String, ServiceError> {
        let path = self.manager()?.get_display_device().map_err(unavailable)?;
        Ok(path.as_str().to_string())
    }

    fn get_property(&self, device: &str, property: &str) -> Result<RawValue, ServiceError> {
        let proxy = self
            .device_properties(device)
            .map_err(|e| ServiceError::CallFailed(e.to_string()))?;
        let value = proxy
            .get(self.interface.clone(), property)
            .map_err(|e| property_error(device, property, e))?;
        raw_value(&value)
    }
}

fn unavailable(err: zbus::Error) -> ServiceError {
    ServiceError::Unavailable(err.to_string())
}

fn property_error(device: &str, property: &str, err: fdo::Error) -> ServiceError {
    match err {
        fdo::Error::UnknownProperty(_) | fdo::Error::InvalidArgs(_) => {
            ServiceError::UnsupportedProperty {
                device: device.to_string(),
                property: property.to_string(),
            }
        }
        fdo::Error::UnknownObject(_) => ServiceError::UnknownDevice(device.to_string()),
        other => ServiceError::CallFailed(other.to_string()),
    }
}

/// Convert a D-Bus variant into the engine's raw value
fn raw_value(value: &Value<'_>) -> Result<RawValue, ServiceError> {
    let raw = match value {
        Value::Bool(b) => RawValue::Bool(*b),
        Value::U8(n) => RawValue::UInt(u64::from(*n)),
        Value::U16(n) => RawValue::UInt(u64::from(*n)),
        Value::U32(n) => RawValue::UInt(u64::from(*n)),
        Value::U64(n) => RawValue::UInt(*n),
        Value::I16(n) => RawValue::Int(i64::from(*n)),
        Value::I32(n) => RawValue::Int(i64::from(*n)),
        Value::I64(n) => RawValue::Int(*n),
        Value::F64(f) => RawValue::Double(*f),
        Value::Str(s) => RawValue::Str(s.to_string()),
        Value::ObjectPath(p) => RawValue::Str(p.to_string()),
        Value::Value(inner) => return raw_value(inner),
        other => {
            return Err(ServiceError::UnsupportedValue(
                other.value_signature().to_string(),
            ));
        }
    };
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversion() {
        assert_eq!(raw_value(&Value::from(true)).unwrap(), RawValue::Bool(true));
        assert_eq!(raw_value(&Value::from(2u32)).unwrap(), RawValue::UInt(2));
        assert_eq!(
            raw_value(&Value::from(1_700_000_000u64)).unwrap(),
            RawValue::UInt(1_700_000_000)
        );
        assert_eq!(raw_value(&Value::from(-5i64)).unwrap(), RawValue::Int(-5));
        assert_eq!(raw_value(&Value::from(87.6f64)).unwrap(), RawValue::Double(87.6));
        assert_eq!(
            raw_value(&Value::from("BAT0")).unwrap(),
            RawValue::Str("BAT0".into())
        );
    }

    #[test]
    fn test_nested_variant() {
        let nested = Value::Value(Box::new(Value::from(4u32)));
        assert_eq!(raw_value(&nested).unwrap(), RawValue::UInt(4));
    }

    #[test]
    fn test_container_is_unsupported() {
        let array = Value::from(vec![1u32, 2u32]);
        assert!(matches!(
            raw_value(&array),
            Err(ServiceError::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_property_error_mapping() {
        let device = "/org/freedesktop/UPower/devices/battery_BAT0";
        assert!(matches!(
            property_error(device, "Luminosity", fdo::Error::UnknownProperty("Luminosity".into())),
            ServiceError::UnsupportedProperty { .. }
        ));
        assert!(matches!(
            property_error(device, "Model", fdo::Error::UnknownObject(device.into())),
            ServiceError::UnknownDevice(_)
        ));
        assert!(matches!(
            property_error(device, "Model", fdo::Error::AccessDenied("nope".into())),
            ServiceError::CallFailed(_)
        ));
    }

    #[test]
    fn test_interface_name() {
        assert!(InterfaceName::from_static_str(DEVICE_INTERFACE).is_ok());
    }
}
