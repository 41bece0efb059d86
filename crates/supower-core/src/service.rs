//! Power-management service seam
//!
//! The engine only needs three calls from the service: device enumeration,
//! the composite display device, and a single property read.

use thiserror::Error;

/// Well-known UPower bus name
pub const UPOWER_SERVICE: &str = "org.freedesktop.UPower";

/// Interface carrying per-device properties
pub const DEVICE_INTERFACE: &str = "org.freedesktop.UPower.Device";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Power service unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    #[error("Property {property} not supported by {device}")]
    UnsupportedProperty { device: String, property: String },

    #[error("Unsupported value type: {0}")]
    UnsupportedValue(String),

    #[error("Service call failed: {0}")]
    CallFailed(String),
}

/// A property value as delivered by the service, before decoding
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    Str(String),
}

impl RawValue {
    /// Interpret the value as a label table index
    pub fn as_index(&self) -> Option<usize> {
        match self {
            RawValue::Bool(b) => Some(usize::from(*b)),
            RawValue::Int(n) => usize::try_from(*n).ok(),
            RawValue::UInt(n) => usize::try_from(*n).ok(),
            RawValue::Double(_) | RawValue::Str(_) => None,
        }
    }

    /// Interpret the value as seconds since the Unix epoch
    pub fn as_epoch(&self) -> Option<i64> {
        match self {
            RawValue::Int(n) => Some(*n),
            RawValue::UInt(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }
}

/// Blocking access to a power-management service
pub trait PowerService {
    /// Canonical paths of every device, in the service's order
    fn enumerate_devices(&self) -> Result<Vec<String>, ServiceError>;

    /// Path of the composite device summarizing all batteries
    fn display_device(&self) -> Result<String, ServiceError>;

    /// Read one property of one device
    fn get_property(&self, device: &str, property: &str) -> Result<RawValue, ServiceError>;
}
