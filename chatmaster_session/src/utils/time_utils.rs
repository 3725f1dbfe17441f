use chrono::prelude::*;

/// Format a line timestamp the way message streams display it, e.g. `(09:05:30)`
pub fn format_clock<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.format("(%H:%M:%S)").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_zero_padded() {
        let ts = Utc.with_ymd_and_hms(2015, 6, 1, 9, 5, 3).unwrap();
        assert_eq!(format_clock(&ts), "(09:05:03)");
    }
}
