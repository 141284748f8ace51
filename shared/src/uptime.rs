use std::fmt::Write;
use std::time::Duration;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Render a duration in compact value+unit form, e.g. `1h2m3.5s`, `250ms`.
///
/// Durations below one second use the largest of `ms`, `µs`, `ns` that keeps
/// the integer part non-zero. From one second up the output is
/// `[<h>h][<m>m]<s>s`, where minutes are printed whenever hours are.
/// Fractional parts are exact, trailing zeros trimmed, so the rendering never
/// rounds and larger durations never print as smaller ones.
pub fn format_uptime(elapsed: Duration) -> String {
    let nanos = elapsed.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_MICRO {
        return format!("{}ns", nanos);
    }
    if nanos < NANOS_PER_MILLI {
        return format!("{}µs", decimal(nanos / NANOS_PER_MICRO, nanos % NANOS_PER_MICRO, 3));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", decimal(nanos / NANOS_PER_MILLI, nanos % NANOS_PER_MILLI, 6));
    }

    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{}h", hours);
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{}m", minutes);
    }
    out.push_str(&decimal(
        u128::from(seconds),
        u128::from(elapsed.subsec_nanos()),
        9,
    ));
    out.push('s');
    out
}

/// Parse a string produced by [`format_uptime`] back into a duration.
///
/// Accepts any sequence of `<number><unit>` pairs with units `h`, `m`, `s`,
/// `ms`, `µs` (or `us`) and `ns`. Returns `None` on anything else.
pub fn parse_uptime(s: &str) -> Option<Duration> {
    if s.is_empty() {
        return None;
    }

    let mut total = 0u128;
    let mut rest = s;

    while !rest.is_empty() {
        let split = rest.find(|c: char| !c.is_ascii_digit() && c != '.')?;
        let (number, tail) = rest.split_at(split);

        let (unit_nanos, unit_len) = if tail.starts_with("ms") {
            (NANOS_PER_MILLI, 2)
        } else if tail.starts_with("µs") {
            (NANOS_PER_MICRO, "µs".len())
        } else if tail.starts_with("us") {
            (NANOS_PER_MICRO, 2)
        } else if tail.starts_with("ns") {
            (1, 2)
        } else if tail.starts_with('h') {
            (3600 * NANOS_PER_SEC, 1)
        } else if tail.starts_with('m') {
            (60 * NANOS_PER_SEC, 1)
        } else if tail.starts_with('s') {
            (NANOS_PER_SEC, 1)
        } else {
            return None;
        };

        let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
        total += whole.parse::<u128>().ok()? * unit_nanos;
        if !frac.is_empty() {
            let scale = 10u128.checked_pow(u32::try_from(frac.len()).ok()?)?;
            total += frac.parse::<u128>().ok()? * unit_nanos / scale;
        }

        rest = &tail[unit_len..];
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).ok()?;
    Some(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

fn decimal(whole: u128, frac: u128, width: usize) -> String {
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", frac, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
