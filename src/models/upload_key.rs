//! Keys assigned to uploaded files.

use chrono::{DateTime, Utc};
use std::fmt;

/// `<millisecond-epoch>-<original-filename>`.
///
/// Readable in a bucket browser and unique for sequential uploads. Two uploads
/// of the same filename within one millisecond collide; that is accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadKey(String);

impl UploadKey {
    pub fn new(uploaded_at: DateTime<Utc>, filename: &str) -> Self {
        Self(format!("{}-{}", uploaded_at.timestamp_millis(), filename))
    }

    pub fn now(filename: &str) -> Self {
        Self::new(Utc::now(), filename)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UploadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn prefixes_filename_with_epoch_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(UploadKey::new(at, "cat.png").as_str(), "1700000000123-cat.png");
    }

    #[test]
    fn keeps_filename_verbatim() {
        let at = Utc.timestamp_millis_opt(5).unwrap();
        let key = UploadKey::new(at, "my holiday-2024 (1).JPG");
        assert_eq!(key.to_string(), "5-my holiday-2024 (1).JPG");
    }

    #[test]
    fn now_uses_current_clock() {
        let before = Utc::now().timestamp_millis();
        let key = UploadKey::now("a.png").to_string();
        let after = Utc::now().timestamp_millis();

        let (ts, name) = key.split_once('-').unwrap();
        let ts: i64 = ts.parse().unwrap();
        assert!(before <= ts && ts <= after);
        assert_eq!(name, "a.png");
    }
}
