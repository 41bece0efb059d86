//! Property schema
//!
//! Every UPower device property the engine knows about, with the label table
//! used to decode enumerated values.

use crate::service::RawValue;
use chrono::{DateTime, Local};
use std::fmt;

/// Sentinel rendered for anything that could not be fetched or decoded
pub const NONE: &str = "none";

/// Labels for boolean properties, indexed by the raw boolean
pub const FLAG: &[&str] = &["no", "yes"];

pub const BATTERY_LEVEL: &[&str] = &[
    "unknown", "none", "low", "critical", "normal", "high", "full",
];

pub const STATE: &[&str] = &[
    "unknown",
    "charging",
    "discharging",
    "empty",
    "fully charged",
    "pending charge",
    "pending discharge",
];

pub const TECHNOLOGY: &[&str] = &[
    "unknown",
    "lithium ion",
    "lithium polymer",
    "lithium iron phosphate",
    "lead acid",
    "nickel cadmium",
    "nickel metal hydride",
];

pub const DEVICE_TYPE: &[&str] = &[
    "unknown",
    "line-power",
    "battery",
    "ups",
    "monitor",
    "mouse",
    "keyboard",
    "pda",
    "phone",
    "media-player",
    "tablet",
    "computer",
    "gaming_input",
    "pen",
    "touchpad",
    "modem",
    "network",
    "headset",
    "speakers",
    "headphones",
    "video",
    "other_audio",
    "remote_control",
    "printer",
    "scanner",
    "camera",
    "wearable",
    "toy",
    "bluetooth-generic",
];

pub const WARNING_LEVEL: &[&str] = &[
    "unknown",
    "none",
    "discharging",
    "low",
    "critical",
    "action",
];

/// Format used for `UpdateTime`, in local time
pub const UPDATE_TIME_FORMAT: &str = "%c";

/// A device property known to the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    BatteryLevel,
    Capacity,
    Energy,
    EnergyEmpty,
    EnergyFull,
    EnergyFullDesign,
    EnergyRate,
    HasHistory,
    HasStatistics,
    IconName,
    IsPresent,
    IsRechargeable,
    Luminosity,
    Model,
    NativePath,
    Online,
    Percentage,
    PowerSupply,
    Serial,
    State,
    Technology,
    Temperature,
    TimeToEmpty,
    TimeToFull,
    Type,
    UpdateTime,
    Vendor,
    Voltage,
    WarningLevel,
}

impl Property {
    pub const COUNT: usize = 29;

    /// Every property, in slot order
    pub const ALL: [Property; Property::COUNT] = [
        Property::BatteryLevel,
        Property::Capacity,
        Property::Energy,
        Property::EnergyEmpty,
        Property::EnergyFull,
        Property::EnergyFullDesign,
        Property::EnergyRate,
        Property::HasHistory,
        Property::HasStatistics,
        Property::IconName,
        Property::IsPresent,
        Property::IsRechargeable,
        Property::Luminosity,
        Property::Model,
        Property::NativePath,
        Property::Online,
        Property::Percentage,
        Property::PowerSupply,
        Property::Serial,
        Property::State,
        Property::Technology,
        Property::Temperature,
        Property::TimeToEmpty,
        Property::TimeToFull,
        Property::Type,
        Property::UpdateTime,
        Property::Vendor,
        Property::Voltage,
        Property::WarningLevel,
    ];

    /// D-Bus property name
    pub fn name(self) -> &'static str {
        match self {
            Property::BatteryLevel => "BatteryLevel",
            Property::Capacity => "Capacity",
            Property::Energy => "Energy",
            Property::EnergyEmpty => "EnergyEmpty",
            Property::EnergyFull => "EnergyFull",
            Property::EnergyFullDesign => "EnergyFullDesign",
            Property::EnergyRate => "EnergyRate",
            Property::HasHistory => "HasHistory",
            Property::HasStatistics => "HasStatistics",
            Property::IconName => "IconName",
            Property::IsPresent => "IsPresent",
            Property::IsRechargeable => "IsRechargeable",
            Property::Luminosity => "Luminosity",
            Property::Model => "Model",
            Property::NativePath => "NativePath",
            Property::Online => "Online",
            Property::Percentage => "Percentage",
            Property::PowerSupply => "PowerSupply",
            Property::Serial => "Serial",
            Property::State => "State",
            Property::Technology => "Technology",
            Property::Temperature => "Temperature",
            Property::TimeToEmpty => "TimeToEmpty",
            Property::TimeToFull => "TimeToFull",
            Property::Type => "Type",
            Property::UpdateTime => "UpdateTime",
            Property::Vendor => "Vendor",
            Property::Voltage => "Voltage",
            Property::WarningLevel => "WarningLevel",
        }
    }

    /// Look up a property by its exact D-Bus name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Label table for enumerated properties, `None` for pass-through ones
    pub fn labels(self) -> Option<&'static [&'static str]> {
        match self {
            Property::BatteryLevel => Some(BATTERY_LEVEL),
            Property::HasHistory
            | Property::HasStatistics
            | Property::IsPresent
            | Property::IsRechargeable
            | Property::Online
            | Property::PowerSupply => Some(FLAG),
            Property::State => Some(STATE),
            Property::Technology => Some(TECHNOLOGY),
            Property::Type => Some(DEVICE_TYPE),
            Property::WarningLevel => Some(WARNING_LEVEL),
            _ => None,
        }
    }

    /// Whether this property decodes to a yes/no label
    pub fn is_flag(self) -> bool {
        self.labels() == Some(FLAG)
    }

    /// Slot of this property in a fetched device
    pub(crate) fn slot(self) -> usize {
        self as usize
    }

    /// Decode a raw service value. Never fails: anything out of range or of
    /// the wrong shape becomes [`DecodedValue::None`].
    pub fn decode(self, raw: &RawValue) -> DecodedValue {
        if let Some(labels) = self.labels() {
            return raw
                .as_index()
                .and_then(|index| labels.get(index))
                .map_or(DecodedValue::None, |label| DecodedValue::Label(*label));
        }

        if self == Property::UpdateTime {
            return raw
                .as_epoch()
                .and_then(format_timestamp)
                .map_or(DecodedValue::None, DecodedValue::Timestamp);
        }

        match raw {
            RawValue::Str(s) => DecodedValue::Text(s.clone()),
            RawValue::Double(f) => DecodedValue::Float(*f),
            RawValue::Int(n) => DecodedValue::Integer(*n),
            RawValue::UInt(n) => i64::try_from(*n).map_or(DecodedValue::None, DecodedValue::Integer),
            RawValue::Bool(b) => DecodedValue::Label(FLAG[usize::from(*b)]),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn format_timestamp(epoch: i64) -> Option<String> {
    let utc = DateTime::from_timestamp(epoch, 0)?;
    Some(utc.with_timezone(&Local).format(UPDATE_TIME_FORMAT).to_string())
}

/// A decoded property value, ready for templating
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Text(String),
    Float(f64),
    Integer(i64),
    /// Entry of a label table (including "yes"/"no")
    Label(&'static str),
    Timestamp(String),
    /// Unavailable or undecodable, rendered as "none"
    None,
}

impl DecodedValue {
    pub fn is_none(&self) -> bool {
        matches!(self, DecodedValue::None)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DecodedValue::Float(_) | DecodedValue::Integer(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DecodedValue::Float(f) => Some(*f),
            DecodedValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Text(s) | DecodedValue::Timestamp(s) => f.write_str(s),
            DecodedValue::Label(s) => f.write_str(s),
            DecodedValue::Integer(n) => write!(f, "{n}"),
            DecodedValue::Float(v) => write_float(f, *v),
            DecodedValue::None => f.write_str(NONE),
        }
    }
}

// Whole floats keep one decimal so "3.0" never prints as "3"
fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        f.write_str("nan")
    } else if v.is_infinite() {
        f.write_str(if v > 0.0 { "inf" } else { "-inf" })
    } else if v.fract() == 0.0 && v.abs() < 1e16 {
        write!(f, "{v:.1}")
    } else {
        write!(f, "{v}")
    }
}
