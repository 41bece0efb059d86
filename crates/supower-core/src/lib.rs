//! Device property model and formatting engine
//!
//! Reads the properties of UPower devices through a [`PowerService`],
//! decodes them against a fixed schema and renders user templates into the
//! record a status bar consumes.
//!
//! # Example
//!
//! ```
//! use supower_core::mock::{MockDevice, MockService};
//! use supower_core::{Action, Query, Report, Templates, execute};
//!
//! let service = MockService::new()
//!     .with_device(MockDevice::mouse("/org/freedesktop/UPower/devices/mouse_0", "MX Master 2S"));
//!
//! let query = Query {
//!     device: Some("MX Master 2S".into()),
//!     action: Action::Render(Templates::default()),
//! };
//! let report = execute(&service, &query);
//! assert_eq!(report.exit_code(), 0);
//! ```

pub mod check;
pub mod device;
pub mod format;
pub mod mock;
pub mod output;
pub mod query;
pub mod resolver;
pub mod schema;
pub mod service;
pub mod tooltip;

pub use check::{CheckError, check};
pub use device::{DeviceInfo, fetch_property, list_devices};
pub use format::{FormatError, render, render_percentage};
pub use output::{OutputRecord, Templates};
pub use query::{Action, Query, Report, execute};
pub use resolver::{resolve, resolve_or_display};
pub use schema::{DecodedValue, Property};
pub use service::{PowerService, RawValue, ServiceError};
pub use tooltip::{DeviceKind, default_tooltip};

use thiserror::Error;

pub const EXIT_SUCCESS: u8 = 0;
/// `--check` found the property set to "no"
pub const EXIT_NO: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_FORMAT: u8 = 3;
pub const EXIT_CHECK: u8 = 4;
pub const EXIT_SERVICE: u8 = 5;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Device Not Found")]
    DeviceNotFound(String),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Check(#[from] CheckError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl CoreError {
    /// Process exit code reported for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CoreError::DeviceNotFound(_) => EXIT_NOT_FOUND,
            CoreError::Format(_) => EXIT_FORMAT,
            CoreError::Check(_) => EXIT_CHECK,
            CoreError::Service(_) => EXIT_SERVICE,
        }
    }
}

/// Core Result type
pub type Result<T> = std::result::Result<T, CoreError>;
