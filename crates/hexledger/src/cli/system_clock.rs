use chrono::{DateTime, Local, NaiveDate, Utc};

use hexledger_core::Clock;

/// Wall clock. Instants are UTC; "today" follows the local calendar, which
/// is what a date typed at the prompt means.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
