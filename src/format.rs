//! Display strings for amounts, percentages and the month header.

use crate::ledger::Category;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Formats `value` as `"+ 1,234.50"` for income or `"- 1,234.50"` for expense.
///
/// The sign comes from the category only; the magnitude is always absolute.
pub fn format_number(value: f64, category: Category) -> String {
    let fixed = to_fixed_2(value.abs());
    let (int, dec) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = match category {
        Category::Income => '+',
        Category::Expense => '-',
    };
    format!("{} {}.{}", sign, group_thousands(int), dec)
}

/// Two-decimal rendering that rounds exact halves up.
///
/// A binary float sits exactly halfway between two cents only when it is an
/// odd multiple of 1/8, and then `x * 100` is exact, so `round` settles it.
fn to_fixed_2(x: f64) -> String {
    let eighths = x * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 && eighths < 2f64.powi(45) {
        let cents = (x * 100.0).round() as u64;
        return format!("{}.{:02}", cents / 100, cents % 100);
    }
    format!("{:.2}", x)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Category whose sign the budget figure is shown with.
pub fn budget_category(budget: f64) -> Category {
    if budget > 0.0 {
        Category::Income
    } else {
        Category::Expense
    }
}

pub fn format_percentage(percentage: Option<u32>) -> String {
    match percentage {
        Some(p) => format!("{}%", p),
        None => "---".to_string(),
    }
}

/// `month` is zero-based, as returned by `Date.getMonth()`.
pub fn month_label(month: u32, year: u32) -> String {
    let name = MONTHS.get(month as usize).copied().unwrap_or("?");
    format!("{} {}", name, year)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
