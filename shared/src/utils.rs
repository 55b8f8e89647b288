//! # Shared Utility Functions
//!
//! ## Address Formatting
//!
//! Functions for formatting EVM account addresses for display:
//! - [`format_address`] - Format address with ellipsis (first N and last M characters)
//! - [`short_account`] - `0x` plus four hex digits, then the last four
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::format_address;
//!
//! let address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
//! assert_eq!(format_address(address, 6, 4), "0xf39F...2266");
//! ```

/// Format a wallet address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// If the address is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// # Arguments
///
/// * `address` - The wallet address to format
/// * `prefix_len` - Number of characters to show at the start (6 for `0x` accounts)
/// * `suffix_len` - Number of characters to show at the end
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
/// assert_eq!(format_address(addr, 6, 4), "0xf39F...2266");
/// assert_eq!(format_address("0x1234", 6, 4), "0x1234");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    // Return early if address is too short to truncate meaningfully
    // Also guard against individual lengths exceeding address length to prevent panics
    if address_len <= prefix_len + suffix_len
        || prefix_len >= address_len
        || suffix_len >= address_len
    {
        return address.to_string();
    }

    // Hex addresses are ASCII, byte indexing is safe
    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Display form of a connected account: first 6 and last 4 characters.
///
/// # Examples
///
/// ```rust
/// use shared::utils::short_account;
///
/// assert_eq!(short_account("0x1234567890123456789012345678901234567890"), "0x1234...7890");
/// ```
pub fn short_account(address: &str) -> String {
    format_address(address, 6, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address() {
        let addr = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
        assert_eq!(format_address(addr, 6, 4), "0xf39F...2266");
        assert_eq!(format_address(addr, 4, 4), "0xf3...2266");
    }

    #[test]
    fn test_format_address_short() {
        assert_eq!(format_address("0x12", 6, 4), "0x12");
        assert_eq!(format_address("0x12345678", 6, 4), "0x12345678");
    }

    #[test]
    fn test_short_account() {
        let addr = "0x1234567890123456789012345678901234567890";
        assert_eq!(short_account(addr), "0x1234...7890");
    }
}
