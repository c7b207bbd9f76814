//! Date helpers

use chrono::{Local, NaiveDate};

/// Today's calendar date in the server's local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whether `last` is any calendar day other than `today`.
/// A date ahead of `today` (clock moved back, zone change) counts as new.
pub fn is_new_day(last: Option<NaiveDate>, today: NaiveDate) -> bool {
    last != Some(today)
}
