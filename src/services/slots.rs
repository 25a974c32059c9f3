use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::models::{BookedInterval, FreeSlot};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotWindowError {
    #[error("working hours must start before they end (got {start}..{end})")]
    EmptyWorkingDay { start: u32, end: u32 },
    #[error("working hours must end by 24 (got {0})")]
    EndPastMidnight(u32),
    #[error("look-ahead must be at most 90 days (got {0})")]
    LookaheadTooLong(u32),
}

/// Upper bound on `lookahead_days`; every request materializes the window.
pub const MAX_LOOKAHEAD_DAYS: u32 = 90;

/// Look-ahead window and working hours, all in UTC.
///
/// `lookahead_days` is inclusive: a value of 3 covers the reference day and
/// the three days after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotWindow {
    pub lookahead_days: u32,
    pub work_start_hour: u32,
    pub work_end_hour: u32,
}

impl Default for SlotWindow {
    fn default() -> Self {
        Self {
            lookahead_days: 3,
            work_start_hour: 10,
            work_end_hour: 18,
        }
    }
}

impl SlotWindow {
    pub fn new(
        lookahead_days: u32,
        work_start_hour: u32,
        work_end_hour: u32,
    ) -> Result<Self, SlotWindowError> {
        if lookahead_days > MAX_LOOKAHEAD_DAYS {
            return Err(SlotWindowError::LookaheadTooLong(lookahead_days));
        }
        if work_end_hour > 24 {
            return Err(SlotWindowError::EndPastMidnight(work_end_hour));
        }
        if work_start_hour >= work_end_hour {
            return Err(SlotWindowError::EmptyWorkingDay {
                start: work_start_hour,
                end: work_end_hour,
            });
        }
        Ok(Self {
            lookahead_days,
            work_start_hour,
            work_end_hour,
        })
    }

    pub fn slots_per_day(&self) -> usize {
        self.work_end_hour.saturating_sub(self.work_start_hour) as usize
    }

    /// Number of candidate slots before any exclusion.
    pub fn capacity(&self) -> usize {
        (self.lookahead_days as usize + 1) * self.slots_per_day()
    }

    /// Calendar days covered by the window, starting at the UTC day of
    /// `reference`.
    pub fn days(&self, reference: DateTime<Utc>) -> Vec<NaiveDate> {
        let first = reference.date_naive();
        (0..=self.lookahead_days)
            .filter_map(|offset| first.checked_add_days(Days::new(offset.into())))
            .collect()
    }
}

/// Computes the free one-hour slots in `window`, starting at 00:00 UTC of the
/// day containing `reference`.
///
/// `booked` is treated as an unordered set of exclusion ranges. A candidate
/// is dropped when it overlaps any of them; touching endpoints do not count.
/// Output is in ascending order.
pub fn compute_free_slots(
    booked: &[BookedInterval],
    reference: DateTime<Utc>,
    window: &SlotWindow,
) -> Vec<FreeSlot> {
    window
        .days(reference)
        .into_iter()
        .flat_map(|day| {
            let midnight = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
            (window.work_start_hour..window.work_end_hour).map(move |hour| {
                let start = midnight + Duration::hours(hour.into());
                FreeSlot {
                    start,
                    end: start + Duration::hours(1),
                }
            })
        })
        .filter(|slot| !booked.iter().any(|b| b.overlaps(slot.start, slot.end)))
        .collect()
}

/// Slots whose start falls on `date` (UTC).
pub fn slots_on(slots: &[FreeSlot], date: NaiveDate) -> Vec<FreeSlot> {
    slots.iter().copied().filter(|s| s.date() == date).collect()
}
