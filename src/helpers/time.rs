use chrono::{DateTime, Duration, Utc};

/// Source of the current time for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by `Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// `now + seconds`, saturating instead of overflowing on absurd server values.
pub fn expires_at_from(now: DateTime<Utc>, expires_in_seconds: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(expires_in_seconds).and_then(|ttl| now.checked_add_signed(ttl))
}

pub fn safety_margin(seconds: u64) -> Duration {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn expires_at_adds_ttl_to_now() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let exp = expires_at_from(now, 3600).unwrap();
        assert_eq!(exp, Utc.with_ymd_and_hms(2026, 1, 1, 13, 0, 0).unwrap());
    }

    #[test]
    fn expires_at_overflow_is_none() {
        let now = Utc::now();
        assert!(expires_at_from(now, i64::MAX).is_none());
    }
}
