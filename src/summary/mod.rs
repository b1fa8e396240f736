//! Human-readable renderings of bookings and tree paths.
mod formatter;

pub use formatter::SummaryFormatter;
