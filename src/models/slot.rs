use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::job::Schedule;

/// A free one-hour interval aligned to a whole UTC hour.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FreeSlot {
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// "HH:MM - HH:MM" in UTC.
    pub fn label(&self) -> String {
        format!("{} - {}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }

    pub fn to_schedule(&self) -> Schedule {
        Schedule {
            scheduled_start: self.start,
            scheduled_end: self.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_label_and_schedule() {
        let slot = FreeSlot {
            start: Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 3, 10, 0, 0).unwrap(),
        };
        assert_eq!(slot.label(), "09:00 - 10:00");
        assert_eq!(slot.date(), NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(slot.to_schedule().scheduled_end, slot.end);
    }
}
