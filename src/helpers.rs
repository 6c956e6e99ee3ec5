use chrono::{DateTime, Local, TimeZone};

/// GB with one decimal, switching to TB (÷1024) from 1000 GB. Zero reads as `N/A`.
pub fn format_storage_size(gb: f64) -> String {
    if gb == 0.0 || !gb.is_finite() {
        return "N/A".to_string();
    }
    if gb >= 1000.0 {
        return format!("{:.1} TB", gb / 1024.0);
    }
    format!("{:.1} GB", gb)
}

/// Growth amounts below 1 GB are shown in MB.
pub fn format_growth(gb: f64) -> String {
    if gb >= 1.0 {
        format!("{:.1} GB", gb)
    } else {
        format!("{:.0} MB", gb * 1024.0)
    }
}

/// Size column of the growth tables: like [`format_storage_size`] but zero stays numeric.
pub fn format_size_column(gb: f64) -> String {
    if gb >= 1000.0 {
        format!("{:.1} TB", gb / 1024.0)
    } else {
        format!("{:.1} GB", gb)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaTrend {
    Unknown,
    Flat,
    Up,
    Down,
}

impl DeltaTrend {
    pub fn css_class(&self) -> &'static str {
        match self {
            DeltaTrend::Unknown | DeltaTrend::Flat => "delta-flat",
            DeltaTrend::Up => "delta-up",
            DeltaTrend::Down => "delta-down",
        }
    }
}

/// Signed growth delta for the SQL database drill-down.
pub fn format_delta(gb: Option<f64>) -> (String, DeltaTrend) {
    let Some(gb) = gb else {
        return ("-".to_string(), DeltaTrend::Unknown);
    };
    if gb.abs() < 0.01 {
        return ("~0".to_string(), DeltaTrend::Flat);
    }
    let size = format_storage_size(gb.abs());
    if gb > 0.0 {
        (format!("+{}", size), DeltaTrend::Up)
    } else {
        (format!("-{}", size), DeltaTrend::Down)
    }
}

/// Retained storage of a deleted job: TB with two decimals from 1 TB, GB below.
pub fn format_retained_tb(tb: f64) -> String {
    if tb >= 1.0 {
        format!("{:.2} TB", tb)
    } else {
        format!("{:.1} GB", tb * 1024.0)
    }
}

pub fn hours_ago(hours: f64) -> String {
    if hours < 1.0 {
        format!("{}m ago", (hours * 60.0).round() as i64)
    } else if hours < 24.0 {
        format!("{}h ago", trim_float(hours))
    } else {
        format!("{}d ago", (hours / 24.0).round() as i64)
    }
}

/// Drops the `k` enum prefix the backup platform puts on type and status names
/// (`kSuccess` becomes `Success`).
pub fn strip_kind_prefix(s: &str) -> &str {
    match s.strip_prefix('k') {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => rest,
        _ => s,
    }
}

pub fn thousands(n: f64) -> String {
    let whole = n.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if whole < 0 {
        out.insert(0, '-');
    }
    out
}

/// `4` instead of `4.0`, `4.5` stays as is.
pub fn trim_float(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        let s = format!("{:.2}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub fn timestamp_label<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Local date and time for an RFC 3339 timestamp; the raw string when it does not parse.
pub fn local_time(ts: &Option<String>) -> String {
    let ts = match ts {
        Some(s) if !s.is_empty() => s,
        _ => return String::new(),
    };

    match DateTime::parse_from_rfc3339(ts) {
        Ok(dt) => timestamp_label(&dt.with_timezone(&Local)),
        Err(_) => ts.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_sizes() {
        assert_eq!(format_storage_size(0.0), "N/A");
        assert_eq!(format_storage_size(999.0), "999.0 GB");
        assert_eq!(format_storage_size(1000.0), "1.0 TB");
        assert_eq!(format_storage_size(1024.0), "1.0 TB");
        assert_eq!(format_storage_size(2048.0), "2.0 TB");
        assert_eq!(format_storage_size(12.34), "12.3 GB");
    }

    #[test]
    fn growth_below_one_gb_is_megabytes() {
        assert_eq!(format_growth(0.5), "512 MB");
        assert_eq!(format_growth(1.0), "1.0 GB");
        assert_eq!(format_growth(8.3), "8.3 GB");
        assert_eq!(format_growth(0.0), "0 MB");
    }

    #[test]
    fn deltas_carry_sign_and_trend() {
        assert_eq!(format_delta(None), ("-".to_string(), DeltaTrend::Unknown));
        assert_eq!(format_delta(Some(0.004)), ("~0".to_string(), DeltaTrend::Flat));
        assert_eq!(format_delta(Some(2.0)), ("+2.0 GB".to_string(), DeltaTrend::Up));
        assert_eq!(format_delta(Some(-2048.0)), ("-2.0 TB".to_string(), DeltaTrend::Down));
    }

    #[test]
    fn retained_storage() {
        assert_eq!(format_retained_tb(1.5), "1.50 TB");
        assert_eq!(format_retained_tb(0.5), "512.0 GB");
    }

    #[test]
    fn ages() {
        assert_eq!(hours_ago(0.5), "30m ago");
        assert_eq!(hours_ago(5.0), "5h ago");
        assert_eq!(hours_ago(5.5), "5.5h ago");
        assert_eq!(hours_ago(72.0), "3d ago");
    }

    #[test]
    fn kind_prefix() {
        assert_eq!(strip_kind_prefix("kSuccess"), "Success");
        assert_eq!(strip_kind_prefix("kVMware"), "VMware");
        assert_eq!(strip_kind_prefix("kafka"), "kafka");
        assert_eq!(strip_kind_prefix("Host"), "Host");
    }

    #[test]
    fn thousands_separator() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(1234567.0), "1,234,567");
        assert_eq!(thousands(-1200.0), "-1,200");
    }

    #[test]
    fn local_time_falls_back_to_raw() {
        assert_eq!(local_time(&None), "");
        assert_eq!(local_time(&Some("yesterday".to_string())), "yesterday");
        assert_eq!(local_time(&Some("2026-01-02T03:04:05Z".to_string())).len(), 19);
    }
}
