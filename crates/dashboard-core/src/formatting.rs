//! Text helpers for terminal reports.
//!
//! Hangul syllables occupy two terminal columns, so padding is computed from
//! display width rather than `char` count.

use unicode_width::UnicodeWidthStr;

use crate::statistic::Statistic;

/// Column alignment used by [`pad`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Terminal display width of `text`.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Pad `text` with spaces to `width` display columns.
///
/// Text that is already wider is returned unchanged.
pub fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = width.saturating_sub(display_width(text));
    let spaces = " ".repeat(fill);
    match align {
        Align::Left => format!("{text}{spaces}"),
        Align::Right => format!("{spaces}{text}"),
    }
}

/// Format a statistic with `decimals` places, or `-` when there is no data.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_statistic;
/// use dashboard_core::statistic::Statistic;
///
/// assert_eq!(format_statistic(Statistic::Value(21.456), 1), "21.5");
/// assert_eq!(format_statistic(Statistic::NoData, 1), "-");
/// ```
pub fn format_statistic(stat: Statistic, decimals: usize) -> String {
    match stat {
        Statistic::Value(v) => format!("{v:.decimals$}"),
        Statistic::NoData => "-".to_string(),
    }
}

/// Format an EC value the way the experiment labels them (`"2.0"`).
pub fn format_ec(ec: f64) -> String {
    format!("{ec:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_hangul() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("하늘고"), 6);
    }

    #[test]
    fn test_pad_left_hangul() {
        assert_eq!(pad("하늘고", 8, Align::Left), "하늘고  ");
    }

    #[test]
    fn test_pad_right() {
        assert_eq!(pad("2.0", 6, Align::Right), "   2.0");
    }

    #[test]
    fn test_pad_wider_than_width() {
        assert_eq!(pad("송도고등학교", 4, Align::Left), "송도고등학교");
    }

    #[test]
    fn test_format_statistic() {
        assert_eq!(format_statistic(Statistic::Value(3.0), 2), "3.00");
        assert_eq!(format_statistic(Statistic::NoData, 2), "-");
    }

    #[test]
    fn test_format_ec() {
        assert_eq!(format_ec(2.0), "2.0");
        assert_eq!(format_ec(8.0), "8.0");
    }
}
