//! Native Dialog Helpers
//!
//! Quantity prompts and confirmations stay native dialogs, matching how the
//! staff workflows were designed on the ward floor.

/// Parse a quantity typed into a prompt; rejects zero, negatives and junk
pub fn parse_quantity(input: &str) -> Option<u32> {
    let qty: u32 = input.trim().parse().ok()?;
    (qty > 0).then_some(qty)
}

/// Ask for a quantity; None when cancelled or invalid
pub fn prompt_quantity(message: &str) -> Option<u32> {
    let window = web_sys::window()?;
    let input = window
        .prompt_with_message_and_default(message, "1")
        .ok()
        .flatten()?;
    parse_quantity(&input)
}

/// Blocking yes/no confirmation
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), Some(3));
        assert_eq!(parse_quantity(" 12 "), Some(12));
        assert_eq!(parse_quantity("0"), None);
        assert_eq!(parse_quantity("-2"), None);
        assert_eq!(parse_quantity("2.5"), None);
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity(""), None);
    }
}
