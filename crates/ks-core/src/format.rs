//! Display formats shared by the console and CSV renderers.

/// `DD.MM.YYYY`
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// `HH:MM`, 24-hour clock.
pub const TIME_FORMAT: &str = "%H:%M";

/// `DD.MM.YYYY, HH:MM`
pub const DATE_TIME_FORMAT: &str = "%d.%m.%Y, %H:%M";

pub const CURRENCY: &str = "€";

/// Formats a number with two decimals in German notation: `.` groups
/// thousands and `,` separates decimals (`1234.5` → `1.234,50`).
pub fn german_decimal(value: f64) -> String {
    let rendered = format!("{:.2}", value.abs());
    let Some((whole, fraction)) = rendered.split_once('.') else {
        // NaN and infinities have no decimal point.
        return rendered;
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() && rendered != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped},{fraction}")
}

/// Two decimals followed by the currency symbol, e.g. `12.50 €`.
pub fn price(value: f64) -> String {
    format!("{value:.2} {CURRENCY}")
}
