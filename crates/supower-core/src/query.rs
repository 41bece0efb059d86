//! One invocation of the tool, from request to report

use crate::check;
use crate::device::{self, DeviceInfo};
use crate::output::{OutputRecord, Templates};
use crate::resolver;
use crate::schema::DecodedValue;
use crate::service::PowerService;
use crate::{CoreError, EXIT_SUCCESS};

/// Name shown in failure records when no device was requested
pub const DISPLAY_DEVICE_NAME: &str = "DisplayDevice";

/// What the user asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Print every device path with its model
    ListDevices,
    /// Map a yes/no property to the exit code
    Check(String),
    /// Render the output record
    Render(Templates),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Device path or model; `None` selects the display device
    pub device: Option<String>,
    pub action: Action,
}

/// Result of a query, ready to print
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Devices(Vec<(String, DecodedValue)>),
    Checked(u8),
    Record { record: OutputRecord, exit_code: u8 },
}

impl Report {
    pub fn exit_code(&self) -> u8 {
        match self {
            Report::Devices(_) => EXIT_SUCCESS,
            Report::Checked(code) => *code,
            Report::Record { exit_code, .. } => *exit_code,
        }
    }

    fn failed(identifier: &str, error: CoreError) -> Self {
        tracing::warn!("{}: {}", identifier, error);
        Report::Record {
            record: OutputRecord::failure(identifier, &error),
            exit_code: error.exit_code(),
        }
    }
}

/// Run `query` against `service`. Errors are folded into the report.
pub fn execute<S: PowerService + ?Sized>(service: &S, query: &Query) -> Report {
    let identifier = query.device.as_deref().unwrap_or(DISPLAY_DEVICE_NAME);

    match &query.action {
        Action::ListDevices => match service.enumerate_devices() {
            Ok(devices) => Report::Devices(device::list_devices(service, &devices)),
            Err(e) => Report::failed(identifier, e.into()),
        },
        Action::Check(property) => match fetch_requested(service, query.device.as_deref()) {
            Ok(info) => match check::check(property, &info) {
                Ok(code) => Report::Checked(code),
                Err(e) => Report::failed(info.path(), e.into()),
            },
            Err(e) => Report::failed(identifier, e),
        },
        Action::Render(templates) => match fetch_requested(service, query.device.as_deref()) {
            Ok(info) => match OutputRecord::success(templates, &info) {
                Ok(record) => Report::Record {
                    record,
                    exit_code: EXIT_SUCCESS,
                },
                Err(e) => Report::failed(info.path(), e.into()),
            },
            Err(e) => Report::failed(identifier, e),
        },
    }
}

fn fetch_requested<S: PowerService + ?Sized>(
    service: &S,
    device: Option<&str>,
) -> crate::Result<DeviceInfo> {
    let path = resolver::resolve_or_display(service, device)?;
    Ok(DeviceInfo::fetch(service, &path))
}
