//! # psem-rs
//!
//! A driver layer for ANSI C12.19 electricity meters reached over a PSEM
//! (C12.18/C12.21) session. The crate turns raw register reads and table
//! blobs into the things an application cares about:
//!
//! - **Display formatting**: render raw register values into the exact
//!   fixed-width strings the meter's own faceplate shows, including the
//!   truncate-never-round and leading-zero rules of the hardware.
//! - **TOU schedules**: translate the packed season/day-type/switchpoint
//!   tables into a generic schedule model and back, and drive the DST and
//!   TOU reconfiguration procedure sequences.
//! - **Session context**: [`meter::AnsiMeter`] wraps any
//!   [`psem::PsemSession`] with cached, invalidation-aware operations.
//!
//! ## Example
//!
//! ```
//! use psem_rs::display::{format_unsigned, DisplayDimension, format_fixed_point};
//!
//! assert_eq!(format_unsigned(42, true), "000042");
//! assert_eq!(format_fixed_point(1234.5678, DisplayDimension::new(6, 2), false), "1234.56");
//! ```
//!
//! Transport framing, authentication, and optical/modem link management
//! live below this crate; callers hand in any type implementing
//! [`psem::PsemSession`].

pub mod constants;
pub mod device;
pub mod display;
pub mod error;
pub mod logging;
pub mod meter;
pub mod psem;
pub mod tables;
pub mod tou;

pub use device::{GenericMeter, MeterVariant, OpenWay};
pub use error::PsemError;
pub use logging::{init_logger, log_debug, log_error, log_info, log_warn};
pub use meter::AnsiMeter;
pub use psem::{Lid, PsemSession, RegisterValue};
pub use tou::{DstSchedule, DstUpdateResult, TouReconfigResult, TouSchedule};
