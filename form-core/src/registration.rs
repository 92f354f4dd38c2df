use chrono::NaiveDateTime;

/// Wall-clock reading taken once per user action.
///
/// `epoch_ms` feeds identifiers; `local` feeds the printed dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timestamp {
    pub epoch_ms: u64,
    pub local: NaiveDateTime,
}

/// Build a registration identifier `<prefix>-<epoch-ms>-<0..999>`.
///
/// `unit_random` is a uniform draw in `[0, 1)`; values outside that range
/// are clamped so the suffix always stays within `0..=999`.
pub fn registration_id(prefix: &str, epoch_ms: u64, unit_random: f64) -> String {
    let r = if unit_random.is_finite() {
        (unit_random * 1000.0).floor().clamp(0.0, 999.0) as u32
    } else {
        0
    };
    format!("{prefix}-{epoch_ms}-{r}")
}

/// Short date in the `en-IN` locale, e.g. `5/1/2026`.
pub fn format_date_en_in(t: &NaiveDateTime) -> String {
    t.format("%-d/%-m/%Y").to_string()
}

/// Date and time in the `en-IN` locale, e.g. `5/1/2026, 3:07:09 pm`.
pub fn format_datetime_en_in(t: &NaiveDateTime) -> String {
    t.format("%-d/%-m/%Y, %-I:%M:%S %P").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // (prefix, epoch_ms, random)
    fn parse_registration_id(id: &str) -> Option<(&str, u64, u32)> {
        let mut it = id.rsplitn(3, '-');
        let random = it.next()?.parse().ok()?;
        let millis = it.next()?.parse().ok()?;
        let prefix = it.next()?;
        if prefix.is_empty() || random >= 1000 {
            return None;
        }
        Some((prefix, millis, random))
    }

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(h, mi, s))
            .unwrap()
    }

    #[test]
    fn id_has_three_numeric_groups() {
        let id = registration_id("BTPL2026", 1_767_225_600_123, 0.4567);
        assert_eq!(id, "BTPL2026-1767225600123-456");
        let (prefix, ms, r) = parse_registration_id(&id).unwrap();
        assert_eq!((prefix, ms, r), ("BTPL2026", 1_767_225_600_123, 456));
    }

    #[test]
    fn random_suffix_is_bounded() {
        assert!(registration_id("P", 1, 0.0).ends_with("-0"));
        assert!(registration_id("P", 1, 0.999_999).ends_with("-999"));
        assert!(registration_id("P", 1, 1.0).ends_with("-999"));
        assert!(registration_id("P", 1, -3.0).ends_with("-0"));
        assert!(registration_id("P", 1, f64::NAN).ends_with("-0"));
    }

    #[test]
    fn same_millisecond_different_draws_differ() {
        let a = registration_id("P", 42, 0.1);
        let b = registration_id("P", 42, 0.2);
        assert_ne!(a, b);
    }

    #[test]
    fn millis_group_is_non_decreasing_over_time() {
        let ids: Vec<String> = [10u64, 10, 11, 500, 90_000]
            .iter()
            .zip([0.9, 0.1, 0.5, 0.0, 0.3])
            .map(|(ms, r)| registration_id("BTPL2026", *ms, r))
            .collect();
        let millis: Vec<u64> = ids
            .iter()
            .map(|id| parse_registration_id(id).unwrap().1)
            .collect();
        assert!(millis.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn prefix_may_contain_dashes() {
        let id = registration_id("CUP-2027", 7, 0.5);
        assert_eq!(parse_registration_id(&id), Some(("CUP-2027", 7, 500)));
        assert_eq!(parse_registration_id("nodashes"), None);
        assert_eq!(parse_registration_id("P-x-1"), None);
    }

    #[test]
    fn en_in_formats() {
        let t = at(2026, 1, 5, 15, 7, 9);
        assert_eq!(format_date_en_in(&t), "5/1/2026");
        assert_eq!(format_datetime_en_in(&t), "5/1/2026, 3:07:09 pm");
        let m = at(2026, 10, 19, 0, 30, 0);
        assert_eq!(format_datetime_en_in(&m), "19/10/2026, 12:30:00 am");
    }
}
