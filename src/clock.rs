//! Clock overlay text
//!
//! Purely cosmetic: the simulation never reads the time.

use chrono::{Local, NaiveTime};

/// Source of the overlay string
pub trait Clock {
    fn now_string(&self) -> String;
}

/// Local wall time
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now_string(&self) -> String {
        format_time(&Local::now().time())
    }
}

/// Always reports the same time (demos and tests)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl Clock for FixedClock {
    fn now_string(&self) -> String {
        format_time(&self.0)
    }
}

/// Medium time style: `3:07:42 PM`
pub fn format_time(time: &NaiveTime) -> String {
    time.format("%-I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_format_afternoon() {
        assert_eq!(format_time(&at(15, 7, 42)), "3:07:42 PM");
    }

    #[test]
    fn test_format_midnight_and_noon() {
        assert_eq!(format_time(&at(0, 0, 5)), "12:00:05 AM");
        assert_eq!(format_time(&at(12, 30, 0)), "12:30:00 PM");
    }

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(at(9, 41, 0)).now_string(), "9:41:00 AM");
    }
}
