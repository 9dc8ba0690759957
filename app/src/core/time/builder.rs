#[macro_export]
macro_rules! t {
    (now) => {{
        $crate::core::time::DateTime::now()
    }};

    ($from_hour:literal : $from_minute:literal - $to_hour:literal : $to_minute:literal) => {{
        $crate::core::time::DailyTimeRange::new(t!($from_hour:$from_minute), t!($to_hour:$to_minute))
    }};

    ($hour:literal : $minute:literal) => {{
        $crate::core::time::Time::at($hour, $minute).unwrap()
    }};

    ($amount:literal minutes) => {{
        $crate::core::time::Duration::minutes($amount)
    }};
    ($amount:literal hours) => {{
        $crate::core::time::Duration::hours($amount)
    }};
    ($amount:literal days) => {{
        $crate::core::time::Duration::days($amount)
    }};

    ($amount:literal hours ago) => {{
        t!(now) - t!($amount hours)
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_time() {
        let t = t!(5:34);

        assert_eq!(t.hour(), 5);
        assert_eq!(t.minute(), 34);
    }

    #[test]
    fn test_duration() {
        assert_eq!(t!(2 hours), t!(120 minutes));
        assert_eq!(t!(2 days), t!(48 hours));
    }

    #[test]
    fn test_daily_range() {
        let range = t!(6:00 - 17:59);

        assert!(range.contains(t!(6:00)));
        assert!(range.contains(t!(17:59)));
        assert!(!range.contains(t!(18:00)));
    }
}
