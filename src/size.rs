//! Size display for report lines.
//!
//! Decimal units, always two fraction digits, `,` as thousands separator.
//! The output has to stay stable because report lines are compared verbatim.

const ONE_THOUSAND: u64 = 1_000;
const ONE_MILLION: u64 = 1_000_000;

/// Format a byte count as `"12.34 kB"` or `"1.23 MB"`.
///
/// Values of one million bytes or more are shown in MB, everything else in kB.
/// The second decimal is rounded half away from zero.
pub fn display_size(bytes: u64) -> String {
    let (divisor, unit) = if bytes >= ONE_MILLION {
        (ONE_MILLION, "MB")
    } else {
        (ONE_THOUSAND, "kB")
    };

    // Work in hundredths of the unit to avoid float rounding surprises
    let step = u128::from(divisor / 100);
    let hundredths = (u128::from(bytes) + step / 2) / step;
    let whole = hundredths / 100;
    let fraction = hundredths % 100;

    format!("{}.{:02} {}", group_thousands(whole), fraction, unit)
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
