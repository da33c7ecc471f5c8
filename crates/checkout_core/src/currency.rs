const DEFAULT_GROUP_SIZE: usize = 3;

/// Fixed-point rendering with `,` inserted every `group_size` integer digits.
/// A `group_size` of zero falls back to groups of three.
pub fn format_currency(value: f64, decimals: usize, group_size: usize) -> String {
    let group_size = if group_size == 0 {
        DEFAULT_GROUP_SIZE
    } else {
        group_size
    };

    let fixed = format!("{:.*}", decimals, value);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / group_size);
    for (idx, digit) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % group_size == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Price as shown in the order summary, e.g. `$1,234.50`.
pub fn format_price(value: f64) -> String {
    format!("${}", format_currency(value, 2, 0))
}
