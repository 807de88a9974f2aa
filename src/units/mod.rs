pub mod format;
pub mod unit;

pub use format::{NumberFormat, format_area, format_number};
pub use unit::{AreaUnit, UnknownUnit};
