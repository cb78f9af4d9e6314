//! Local timestamps in the formats used across the vault

use chrono::{DateTime, Local, NaiveDate};

/// One instant, rendered in the vault's formats
#[derive(Debug, Clone, Copy)]
pub struct Stamp(DateTime<Local>);

impl Stamp {
    /// The current local time
    pub fn now() -> Self {
        Self(Local::now())
    }

    /// Wrap a specific instant
    pub fn at(time: DateTime<Local>) -> Self {
        Self(time)
    }

    /// Calendar day of the instant
    pub fn day(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// `YYYY-MM-DD`
    pub fn date(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// `HH:mm:ss`
    pub fn time(&self) -> String {
        self.0.format("%H:%M:%S").to_string()
    }

    /// `YYYY-MM-DD HH:mm`
    pub fn minute(&self) -> String {
        self.0.format("%Y-%m-%d %H:%M").to_string()
    }

    /// `YYYY-MM-DD HH:mm:ss`
    pub fn second(&self) -> String {
        self.0.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// `YYYY-MM-DD-HHmmss`, for document names
    pub fn file(&self) -> String {
        self.0.format("%Y-%m-%d-%H%M%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_formats() {
        let time = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).single().unwrap();
        let stamp = Stamp::at(time);
        assert_eq!(stamp.day(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(stamp.date(), "2024-03-01");
        assert_eq!(stamp.time(), "09:05:07");
        assert_eq!(stamp.minute(), "2024-03-01 09:05");
        assert_eq!(stamp.second(), "2024-03-01 09:05:07");
        assert_eq!(stamp.file(), "2024-03-01-090507");
    }
}
