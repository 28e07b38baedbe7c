//! Account address validation and display

/// The zero address, used as the native-asset sentinel
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Short form of the zero address accepted as native
pub const ZERO_ADDRESS_SHORT: &str = "0x0";

/// Number of hex digits in an account address
pub const ADDRESS_HEX_LEN: usize = 40;

/// Default number of characters kept on each side by [`shorten_address`]
pub const DEFAULT_SHORTEN_CHARS: usize = 4;

/// Minimum body length of an X-Chain address after the `X-` prefix
const X_CHAIN_MIN_BODY: usize = 20;

/// Check that `address` is `0x` followed by exactly 40 hex digits.
///
/// Hex digits are matched case-insensitively and no EIP-55 checksum is
/// verified. The prefix itself must be lowercase `0x`.
pub fn is_valid_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex) => hex.len() == ADDRESS_HEX_LEN && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

/// Check for an Avalanche X-Chain address (`X-` plus 20 or more alphanumerics).
pub fn is_x_chain_address(address: &str) -> bool {
    match address.strip_prefix("X-") {
        Some(body) => {
            body.len() >= X_CHAIN_MIN_BODY && body.bytes().all(|b| b.is_ascii_alphanumeric())
        }
        None => false,
    }
}

/// A wallet counts as connected when it reports a non-zero address.
pub fn is_connected_address(address: Option<&str>) -> bool {
    matches!(address, Some(a) if !a.is_empty() && a != ZERO_ADDRESS)
}

/// Shorten an address for display: `first(chars + 2) + "..." + last(chars)`.
///
/// Strings that are not valid addresses, or too short to shorten, are
/// returned unchanged.
pub fn shorten_address(address: &str, chars: usize) -> String {
    let shown = chars.checked_mul(2).and_then(|n| n.checked_add(2));
    if !is_valid_address(address) || shown.map_or(true, |n| n > address.len()) {
        return address.to_string();
    }
    // Valid addresses are pure ASCII so byte slicing is safe.
    format!(
        "{}...{}",
        &address[..chars + 2],
        &address[address.len() - chars..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "0x60be863b6a27d78da0b89c088a8a9f23a1d02817";

    #[test]
    fn test_valid_addresses() {
        assert!(is_valid_address(SAMPLE));
        assert!(is_valid_address("0x60Be870885C5b537AC179CfACdcc9Fad145CAC55"));
        assert!(is_valid_address(ZERO_ADDRESS));
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(!is_valid_address("0x123"));
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("60be863b6a27d78da0b89c088a8a9f23a1d02817"));
        assert!(!is_valid_address("0X60be863b6a27d78da0b89c088a8a9f23a1d02817"));
        assert!(!is_valid_address("0x60be863b6a27d78da0b89c088a8a9f23a1d0281g"));
        assert!(!is_valid_address(" 0x60be863b6a27d78da0b89c088a8a9f23a1d02817"));
        assert!(!is_valid_address("0x60be863b6a27d78da0b89c088a8a9f23a1d028170"));
    }

    #[test]
    fn test_shorten_address() {
        assert_eq!(shorten_address(SAMPLE, 4), "0x60be...2817");
        assert_eq!(shorten_address(SAMPLE, 6), "0x60be86...d02817");
        assert_eq!(shorten_address("not-an-address", 4), "not-an-address");
    }

    #[test]
    fn test_shorten_oversized_chars() {
        assert_eq!(shorten_address(SAMPLE, 21), SAMPLE);
        assert_eq!(shorten_address(SAMPLE, usize::MAX), SAMPLE);
        assert_eq!(shorten_address(SAMPLE, usize::MAX / 2), SAMPLE);
    }

    #[test]
    fn test_shorten_keeps_case() {
        let mixed = "0x60Be870885C5b537AC179CfACdcc9Fad145CAC55";
        assert_eq!(shorten_address(mixed, DEFAULT_SHORTEN_CHARS), "0x60Be...AC55");
    }

    #[test]
    fn test_x_chain_address() {
        assert!(is_x_chain_address("X-avax1qwertyuiopasdfghjklz"));
        assert!(!is_x_chain_address("X-short"));
        assert!(!is_x_chain_address("P-avax1qwertyuiopasdfghjklz"));
    }

    #[test]
    fn test_connected_address() {
        assert!(is_connected_address(Some(SAMPLE)));
        assert!(!is_connected_address(Some(ZERO_ADDRESS)));
        assert!(!is_connected_address(Some("")));
        assert!(!is_connected_address(None));
    }

    proptest! {
        #[test]
        fn prop_hex_addresses_are_valid(hex in "[0-9a-fA-F]{40}") {
            let address = format!("0x{}", hex);
            prop_assert!(is_valid_address(&address));
        }

        #[test]
        fn prop_wrong_length_is_invalid(hex in "[0-9a-f]{0,39}|[0-9a-f]{41,60}") {
            let address = format!("0x{}", hex);
            prop_assert!(!is_valid_address(&address));
        }

        #[test]
        fn prop_non_hex_is_invalid(prefix in "[0-9a-f]{0,39}", bad in "[g-zG-Z_ ]") {
            let mut hex = prefix.clone();
            hex.push_str(&bad);
            while hex.len() < ADDRESS_HEX_LEN {
                hex.push('0');
            }
            let address = format!("0x{}", hex);
            prop_assert!(!is_valid_address(&address));
        }
    }
}
