//! Time label formatting
//!
//! Renders `"%b %d %l:%M %p"` (e.g. `"Oct 19  2:05 PM"`) into a fixed
//! stack buffer without allocation.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Offset, Timelike, Utc};

use crate::{fmt::warn, host::ClockSample};

/// Longest possible label: `"Dec 31 12:59 PM"`
const BUF_LEN: usize = 15;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Shown when the timestamp has no calendar representation
const PLACEHOLDER: &str = "--- -- --:-- --";

/// Formatted time label.
///
/// One instance backs both the time text and its outline, so the two can
/// never disagree.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DisplayTime {
    str_buf: [u8; BUF_LEN],
    len: usize,
}

impl DisplayTime {
    /// Capacity of the label in bytes
    pub const MAX_LEN: usize = BUF_LEN;

    /// Label shown before a valid time is known.
    pub fn placeholder() -> Self {
        Self::from_str_truncated(PLACEHOLDER)
    }

    /// Copy `text` into a label, cutting it at the last character that fits.
    pub fn from_str_truncated(text: &str) -> Self {
        let mut end = text.len().min(BUF_LEN);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let mut str_buf = [0; BUF_LEN];
        str_buf[..end].copy_from_slice(&text.as_bytes()[..end]);
        Self { str_buf, len: end }
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.str_buf[..self.len]).unwrap_or("")
    }

}

impl Default for DisplayTime {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl core::fmt::Debug for DisplayTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("DisplayTime").field(&self.as_str()).finish()
    }
}

/// Converts clock samples to local-time labels.
#[derive(Clone, Copy, Debug)]
pub struct TimeFormatter {
    /// Local time zone
    offset: FixedOffset,
}

impl TimeFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Formatter for a zone `secs` east of UTC, `None` if out of range (±24 h).
    pub fn east(secs: i32) -> Option<Self> {
        FixedOffset::east_opt(secs).map(Self::new)
    }

    /// Format a clock sample as local time.
    pub fn format(&self, sample: ClockSample) -> DisplayTime {
        let Some(local) = self.local_time(sample) else {
            warn!("No calendar time for timestamp {}", sample.0);
            return DisplayTime::placeholder();
        };

        let (pm, hour) = local.hour12();
        let month = MONTHS.get(local.month0() as usize).copied().unwrap_or("---");

        let mut time = DisplayTime {
            str_buf: [0; BUF_LEN],
            len: 0,
        };
        let written = format_no_std::show(
            &mut time.str_buf,
            format_args!(
                "{} {:02} {:>2}:{:02} {}",
                month,
                local.day(),
                hour,
                local.minute(),
                if pm { "PM" } else { "AM" }
            ),
        )
        .map(str::len);

        match written {
            Ok(len) => {
                time.len = len;
                time
            }
            Err(_) => DisplayTime::placeholder(),
        }
    }

    fn local_time(&self, sample: ClockSample) -> Option<NaiveDateTime> {
        let secs = sample
            .0
            .checked_add(i64::from(self.offset.local_minus_utc()))?;
        DateTime::<Utc>::from_timestamp(secs, 0).map(|local| local.naive_utc())
    }
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> ClockSample {
        let time = NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap();
        ClockSample(time.and_utc().timestamp())
    }

    #[test]
    fn afternoon_uses_space_padded_twelve_hour_clock() {
        let time = TimeFormatter::default().format(at(2026, 10, 19, 14, 5));
        assert_eq!(time.as_str(), "Oct 19  2:05 PM");
    }

    #[test]
    fn midnight_and_noon() {
        let fmt = TimeFormatter::default();
        assert_eq!(fmt.format(at(2024, 3, 1, 0, 0)).as_str(), "Mar 01 12:00 AM");
        assert_eq!(fmt.format(at(2024, 3, 1, 12, 0)).as_str(), "Mar 01 12:00 PM");
        assert_eq!(fmt.format(at(2024, 3, 1, 11, 59)).as_str(), "Mar 01 11:59 AM");
    }

    #[test]
    fn every_month_fits_the_buffer() {
        let fmt = TimeFormatter::default();
        for month in 1..=12 {
            let time = fmt.format(at(2025, month, 28, 22, 47));
            assert_eq!(time.as_str().len(), DisplayTime::MAX_LEN);
            assert!(time.as_str().ends_with("10:47 PM"));
        }
    }

    #[test]
    fn offset_shifts_to_local_time() {
        let cet = TimeFormatter::east(3_600).unwrap();
        assert_eq!(cet.format(at(2024, 12, 31, 23, 30)).as_str(), "Jan 01 12:30 AM");

        let pst = TimeFormatter::east(-8 * 3_600).unwrap();
        assert_eq!(pst.format(at(2024, 7, 4, 3, 15)).as_str(), "Jul 03  7:15 PM");
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        assert!(TimeFormatter::east(86_400).is_none());
    }

    #[test]
    fn unrepresentable_timestamp_falls_back_to_placeholder() {
        let fmt = TimeFormatter::east(3_600).unwrap();
        assert_eq!(fmt.format(ClockSample(i64::MAX)).as_str(), PLACEHOLDER);
        assert_eq!(fmt.format(ClockSample(i64::MIN)).as_str(), PLACEHOLDER);
    }

    #[test]
    fn formatting_is_idempotent() {
        let fmt = TimeFormatter::default();
        let sample = at(2023, 2, 9, 8, 3);
        assert_eq!(fmt.format(sample), fmt.format(sample));
        assert_eq!(fmt.format(sample).as_str(), "Feb 09  8:03 AM");
    }

    #[test]
    fn truncation_respects_capacity_and_char_boundaries() {
        let long = DisplayTime::from_str_truncated("Sept 30 10:00 in the evening");
        assert_eq!(long.as_str(), "Sept 30 10:00 i");

        // 14 ASCII bytes followed by a two-byte character
        let wide = DisplayTime::from_str_truncated("Mai 01 10:00 Uß");
        assert_eq!(wide.as_str(), "Mai 01 10:00 U");
    }
}
