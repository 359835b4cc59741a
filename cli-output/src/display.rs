use {
    chrono::{DateTime, SecondsFormat},
    num_bigint::BigUint,
    std::time::Duration,
};

/// Shown in place of any value whose backing read failed.
pub const PLACEHOLDER: &str = "-";

/// Decimals of the payment token and of every on-chain amount shown.
pub const TOKEN_DECIMALS: u32 = 18;

/// Shown by the countdown once a stake has matured.
pub const READY: &str = "READY";

/// Renders a fixed-point integer with `decimals` implied decimals.
///
/// Trailing zeros of the fraction are trimmed, keeping at least one digit,
/// so `10^18` with 18 decimals renders as `1.0`.
pub fn format_units(amount: &BigUint, decimals: u32) -> String {
    let digits = amount.to_str_radix(10);
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }
    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    let frac = frac_part.trim_end_matches('0');
    let frac = if frac.is_empty() { "0" } else { frac };
    format!("{int_part}.{frac}")
}

/// Renders an 18-decimal amount with the fraction truncated (never rounded)
/// to at most `dp` digits. `dp == 0` renders the integer part only.
pub fn format_amount(amount: &BigUint, dp: usize) -> String {
    let full = format_units(amount, TOKEN_DECIMALS);
    match full.split_once('.') {
        Some((int_part, _)) if dp == 0 => int_part.to_string(),
        Some((int_part, frac)) => {
            let cut = frac.len().min(dp);
            format!("{int_part}.{}", &frac[..cut])
        }
        None => full,
    }
}

/// `0x1234...abcd`, or the placeholder for an empty string.
pub fn short_address(address: &str) -> String {
    if address.is_empty() {
        return PLACEHOLDER.to_string();
    }
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Label of an earnings rank code.
pub fn rank_name(rank: u8) -> &'static str {
    match rank {
        1 => "Bronze",
        2 => "Silver",
        3 => "Gold",
        _ => "None",
    }
}

/// Remaining time until `end_ts` as `{d}d HH:MM:SS`, or [`READY`] once
/// `now >= end_ts`.
pub fn format_countdown(end_ts: u64, now: u64) -> String {
    let Some(diff) = end_ts.checked_sub(now).filter(|d| *d > 0) else {
        return READY.to_string();
    };
    let days = diff / 86_400;
    let hours = (diff % 86_400) / 3_600;
    let minutes = (diff % 3_600) / 60;
    let seconds = diff % 60;
    format!("{days}d {hours:02}:{minutes:02}:{seconds:02}")
}

pub fn unix_timestamp_to_string(unix_timestamp: u64) -> String {
    match i64::try_from(unix_timestamp)
        .ok()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
    {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => format!("UnixTimestamp {unix_timestamp}"),
    }
}

/// Lock period in human units (`30days`, `1year 5days`).
pub fn format_lock(seconds: u64) -> String {
    if seconds == 0 {
        return "none".to_string();
    }
    humantime::format_duration(Duration::from_secs(seconds)).to_string()
}

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    fn wei(s: &str) -> BigUint {
        s.parse().unwrap()
    }

    #[test_case("0", "0.0")]
    #[test_case("1000000000000000000", "1.0")]
    #[test_case("1500000000000000000", "1.5")]
    #[test_case("1", "0.000000000000000001")]
    #[test_case("123456789000000000000", "123.456789")]
    fn test_format_units(amount: &str, expected: &str) {
        assert_eq!(format_units(&wei(amount), 18), expected);
    }

    #[test_case("1999999999999999999", 2, "1.99" ; "truncates rather than rounds")]
    #[test_case("1999999999999999999", 0, "1" ; "integer part only")]
    #[test_case("1000000000000000000", 4, "1.0" ; "integer amount")]
    #[test_case("123456789000000000000", 4, "123.4567" ; "four places")]
    #[test_case("5", 4, "0.0000" ; "dust")]
    fn test_format_amount(amount: &str, dp: usize, expected: &str) {
        assert_eq!(format_amount(&wei(amount), dp), expected);
    }

    #[test]
    fn test_format_amount_truncation_law() {
        // integer part equals the true quotient, fraction is a prefix of the
        // exact fraction.
        let one = BigUint::from(10u64).pow(18);
        for raw in [
            "0",
            "7",
            "999999999999999999",
            "1000000000000000001",
            "98765432109876543210987",
        ] {
            let amount = wei(raw);
            let exact = format_units(&amount, 18);
            for dp in 0..=18 {
                let shown = format_amount(&amount, dp);
                let (int_part, frac) = shown.split_once('.').unwrap_or((&shown, ""));
                assert_eq!(int_part, (&amount / &one).to_string());
                assert!(frac.len() <= dp);
                assert!(exact.split_once('.').unwrap().1.starts_with(frac));
            }
        }
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0xF1e4eAD1b7f772AF0eC629f0e2695c78C29E11dE"),
            "0xF1e4...11dE"
        );
        assert_eq!(short_address(""), PLACEHOLDER);
    }

    #[test_case(0, "None")]
    #[test_case(1, "Bronze")]
    #[test_case(2, "Silver")]
    #[test_case(3, "Gold")]
    #[test_case(4, "None")]
    #[test_case(255, "None")]
    fn test_rank_name(rank: u8, expected: &str) {
        assert_eq!(rank_name(rank), expected);
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(100, 100), READY);
        assert_eq!(format_countdown(100, 200), READY);
        assert_eq!(format_countdown(100 + 86_400 + 3_661, 100), "1d 01:01:01");
        assert_eq!(format_countdown(59, 0), "0d 00:00:59");
    }

    #[test]
    fn test_unix_timestamp_to_string() {
        assert_eq!(unix_timestamp_to_string(0), "1970-01-01T00:00:00Z");
        assert_eq!(unix_timestamp_to_string(u64::MAX), format!("UnixTimestamp {}", u64::MAX));
    }

    #[test]
    fn test_format_lock() {
        assert_eq!(format_lock(0), "none");
        assert_eq!(format_lock(30 * 86_400), "30days");
    }
}
