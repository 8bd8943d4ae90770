use chrono::{DateTime, Datelike, Duration, Local, Offset, TimeZone, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    #[default]
    Monthly,
    Lifetime,
}

impl TimeWindow {
    /// Inclusive lower bound on row timestamps, `None` for no bound.
    pub fn lower_bound(&self) -> Option<DateTime<Utc>> {
        match self {
            TimeWindow::Monthly => Some(month_start(Local::now())),
            TimeWindow::Lifetime => None,
        }
    }
}

/// Search step and reach, in minutes, when local midnight falls in a gap.
const GAP_STEP_MINUTES: i64 = 15;
const GAP_SEARCH_MINUTES: i64 = 25 * 60;

/// First instant of `now`'s calendar month in `now`'s own time zone.
///
/// A repeated midnight resolves to its earlier instant. A skipped midnight
/// resolves to the first local time on the 1st that exists, which is the
/// transition itself for every gap that ends on a quarter hour.
pub fn month_start<Tz: TimeZone>(now: DateTime<Tz>) -> DateTime<Utc> {
    let tz = now.timezone();
    let Some(first) = now.date_naive().with_day(1).and_then(|d| d.and_hms_opt(0, 0, 0)) else {
        return now.with_timezone(&Utc);
    };

    (0..=GAP_SEARCH_MINUTES / GAP_STEP_MINUTES)
        .find_map(|step| {
            tz.from_local_datetime(&(first + Duration::minutes(step * GAP_STEP_MINUTES)))
                .earliest()
        })
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| {
            // No local time on the 1st resolved; read midnight at today's offset.
            let offset = i64::from(now.offset().fix().local_minus_utc());
            Utc.from_utc_datetime(&(first - Duration::seconds(offset)))
        })
}
