//! Default tooltip templates
//!
//! When no tooltip template is configured, one is assembled from the device
//! type in the style of `upower -i`. Line power gets a short summary, every
//! other device gets the peripheral block, and batteries add their energy
//! block on top of it.

use crate::schema::DecodedValue;

/// Device family driving tooltip assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    LinePower,
    Battery,
    Other,
}

impl DeviceKind {
    /// Classify a decoded `Type` value
    pub fn from_type(value: &DecodedValue) -> Self {
        match value {
            DecodedValue::Label("line-power") => DeviceKind::LinePower,
            DecodedValue::Label("battery") => DeviceKind::Battery,
            _ => DeviceKind::Other,
        }
    }

    fn includes(self, block: Block) -> bool {
        match (self, block) {
            (_, Block::Common) => true,
            (DeviceKind::LinePower, Block::LinePower) => true,
            (DeviceKind::Battery | DeviceKind::Other, Block::Peripheral) => true,
            (DeviceKind::Battery, Block::Battery) => true,
            _ => false,
        }
    }
}

/// Which device kinds a tooltip line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Common,
    LinePower,
    /// Everything that is not line power, batteries included
    Peripheral,
    Battery,
}

// Kept in `upower -i` order; blocks interleave rather than append
const HEADER: &[(Block, &str)] = &[
    (Block::Common, "native-path:          {NativePath}"),
    (Block::Battery, "vendor:               {Vendor}"),
    (Block::Peripheral, "model:                {Model}"),
    (Block::Peripheral, "serial:               {Serial}"),
    (Block::Common, "power supply:         {PowerSupply}"),
    (Block::Common, "updated:              {UpdateTime}"),
    (Block::Common, "has history:          {HasHistory}"),
    (Block::Common, "has statistics:       {HasStatistics}"),
];

const BODY: &[(Block, &str)] = &[
    (Block::Common, "{Type}"),
    (Block::Peripheral, "  present:             {IsPresent}"),
    (Block::Battery, "  rechargeable:        {IsRechargeable}"),
    (Block::Battery, "  state:               {State}"),
    (Block::Common, "  warning-level:       {WarningLevel}"),
    (Block::LinePower, "  online:              {Online}"),
    (Block::Battery, "  energy:              {Energy} Wh"),
    (Block::Battery, "  energy-empty:        {EnergyEmpty} Wh"),
    (Block::Battery, "  energy-full:         {EnergyFull} Wh"),
    (Block::Battery, "  energy-full-design:  {EnergyFullDesign} Wh"),
    (Block::Battery, "  energy-rate:         {EnergyRate} W"),
    (Block::Battery, "  voltage:             {Voltage} V"),
    (Block::Battery, "  capacity:            {Capacity}%"),
    (Block::Peripheral, "  percentage:          {Percentage}%"),
    (Block::Battery, "  technology:          {Technology}"),
    (Block::Common, "  icon-name:           {IconName}"),
    (Block::Battery, "  battery-level:       {BatteryLevel}"),
    (Block::Battery, "  temperature:         {Temperature}"),
    (Block::Battery, "  time-to-empty:       {TimeToEmpty}"),
    (Block::Battery, "  time-to-full:        {TimeToFull}"),
];

/// Build the default tooltip template for a device kind
pub fn default_tooltip(kind: DeviceKind) -> String {
    HEADER
        .iter()
        .chain(BODY)
        .filter(|(block, _)| kind.includes(*block))
        .map(|(_, line)| *line)
        .collect::<Vec<_>>()
        .join("\n")
}
