//! 时间工具: 业务时区时钟
//!
//! Every timestamp the engine writes is local wall-clock time in the
//! business timezone, formatted `YYYY-MM-DD HH:MM:SS`.

use chrono::{NaiveDate, NaiveDateTime, SubsecRound, Utc};
use chrono_tz::Tz;
use parking_lot::Mutex;

/// Storage format for timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Storage format for dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of "now" for the engine
pub trait Clock: Send + Sync {
    /// Current local time in the business timezone
    fn now(&self) -> NaiveDateTime;

    /// Current business date
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock in a fixed business timezone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    /// Whole seconds, matching what storage keeps
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local().trunc_subsecs(0)
    }
}

/// Manually driven clock (tests, replays)
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Midnight of the given date
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::MIN))
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}

/// 格式化时间戳
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// 格式化日期
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 解析时间戳，接受旧表单常见写法 (`/` 分隔、无秒)
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    [
        TIMESTAMP_FORMAT,
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// 解析日期 (YYYY-MM-DD，兼容 YYYY/MM/DD 与 YYYYMMDD)
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    [DATE_FORMAT, "%Y/%m/%d", "%Y%m%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_advances() {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        clock.advance(chrono::Duration::minutes(90));
        assert_eq!(format_timestamp(&clock.now()), "2026-01-01 01:30:00");
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn test_parse_legacy_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 4)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2026-03-04 09:15:00"), Some(expected));
        assert_eq!(parse_timestamp("2026/03/04 09:15"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_parse_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert_eq!(parse_date("2026-01-31"), Some(expected));
        assert_eq!(parse_date("2026/01/31"), Some(expected));
        assert_eq!(parse_date("20260131"), Some(expected));
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_system_clock_uses_business_timezone() {
        let taipei = SystemClock::new(chrono_tz::Asia::Taipei).now();
        let utc = Utc::now().naive_utc();
        let offset = (taipei - utc).num_minutes();
        // UTC+8, allow for the two reads straddling a minute
        assert!((479..=481).contains(&offset));
    }

    #[test]
    fn test_system_clock_whole_seconds() {
        use chrono::Timelike;

        let now = SystemClock::new(chrono_tz::Asia::Taipei).now();
        assert_eq!(now.nanosecond(), 0);
        assert_eq!(parse_timestamp(&format_timestamp(&now)), Some(now));
    }
}
