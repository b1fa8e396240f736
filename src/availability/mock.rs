use super::{AvailabilityProvider, MonthAvailability, TimeSlot};
use crate::error::AvailabilityError;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc, Weekday};

const DEFAULT_SLOTS: [(u32, u32); 8] = [
    (8, 0),
    (9, 0),
    (10, 0),
    (11, 0),
    (13, 0),
    (14, 0),
    (15, 0),
    (16, 0),
];

/// Stand-in availability: every weekday from `today` onward, all with the same slots.
#[derive(Debug, Clone)]
pub struct MockAvailability {
    today: NaiveDate,
    slots: Vec<TimeSlot>,
}

impl MockAvailability {
    /// Uses the current date in the given timezone.
    pub fn new(timezone: chrono_tz::Tz) -> Self {
        Self::starting(Utc::now().with_timezone(&timezone).date_naive())
    }

    pub fn starting(today: NaiveDate) -> Self {
        let slots = DEFAULT_SLOTS
            .iter()
            .filter_map(|&(h, m)| TimeSlot::new(h, m))
            .collect();
        Self { today, slots }
    }

    pub fn with_slots(mut self, slots: Vec<TimeSlot>) -> Self {
        self.slots = slots;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn is_bookable(&self, date: NaiveDate) -> bool {
        date >= self.today && !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

#[async_trait]
impl AvailabilityProvider for MockAvailability {
    async fn month(&self, year: i32, month: u32) -> Result<MonthAvailability, AvailabilityError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(AvailabilityError::InvalidMonth { year, month })?;
        let mut availability = MonthAvailability::empty(year, month);
        for date in first.iter_days().take_while(|d| d.month() == month) {
            if self.is_bookable(date) {
                availability.days.insert(date, self.slots.clone());
            }
        }
        Ok(availability)
    }

    async fn day(&self, date: NaiveDate) -> Result<Vec<TimeSlot>, AvailabilityError> {
        if self.is_bookable(date) {
            Ok(self.slots.clone())
        } else {
            Ok(Vec::new())
        }
    }
}
