use chrono::DateTime;

pub trait ToEpochMillis {
    /// Parses an RFC 3339 timestamp such as `2020-12-03T06:41:54.441Z` into milliseconds since the epoch.
    fn to_epoch_millis(&self) -> Option<i64>;
}

impl ToEpochMillis for str {
    fn to_epoch_millis(&self) -> Option<i64> {
        DateTime::parse_from_rfc3339(self).ok().map(|date_time| date_time.timestamp_millis())
    }
}
