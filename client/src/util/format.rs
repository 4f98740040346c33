//! Display formatting for catalog values.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

/// Price with two decimals and a dollar sign.
pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

pub fn stock_label(stock: i64) -> String {
    match stock {
        i64::MIN..=0 => "Out of stock".to_owned(),
        1..=5 => format!("Only {stock} left"),
        _ => format!("{stock} in stock"),
    }
}

/// First `max_chars` characters of `text`, with an ellipsis when cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() { format!("{}…", head.trim_end()) } else { head }
}
