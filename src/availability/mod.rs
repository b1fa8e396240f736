//! Bookable days and time slots.
use crate::error::{AvailabilityError, ValidationError};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

mod mock;

pub use mock::MockAvailability;

/// A bookable start time, written `HH:mm` on a 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(TimeSlot)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeSlot {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (hour, minute) = trimmed
            .split_once(':')
            .ok_or_else(|| ValidationError::InvalidTimeFormat(s.to_string()))?;
        if hour.len() != 2 || minute.len() != 2 {
            return Err(ValidationError::InvalidTimeFormat(s.to_string()));
        }
        let hour: u32 = hour
            .parse()
            .map_err(|_| ValidationError::InvalidTimeFormat(s.to_string()))?;
        let minute: u32 = minute
            .parse()
            .map_err(|_| ValidationError::InvalidTimeFormat(s.to_string()))?;
        TimeSlot::new(hour, minute).ok_or_else(|| ValidationError::InvalidTimeFormat(s.to_string()))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Bookable days of one month and the slots of each day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthAvailability {
    pub year: i32,
    pub month: u32,
    pub days: BTreeMap<NaiveDate, Vec<TimeSlot>>,
}

impl MonthAvailability {
    pub fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            days: BTreeMap::new(),
        }
    }

    pub fn is_available(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    pub fn slots(&self, date: NaiveDate) -> &[TimeSlot] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, date: NaiveDate, slot: TimeSlot) -> bool {
        self.slots(date).contains(&slot)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn available_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }
}

/// Supplies bookable days and slots. A real scheduling backend implements this.
#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    /// Bookable days of `month` (1-12) and each day's slots.
    async fn month(&self, year: i32, month: u32) -> Result<MonthAvailability, AvailabilityError>;

    /// Slots of a single day; empty when the day is not bookable.
    async fn day(&self, date: NaiveDate) -> Result<Vec<TimeSlot>, AvailabilityError>;
}

/// A ticket for one month fetch, used to discard responses that arrive late.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityRequest {
    pub token: u64,
    pub year: i32,
    pub month: u32,
}
