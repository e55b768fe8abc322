//! Base-10 rendering of binary payloads.
//!
//! Deployed compressed cards print the gzip stream as one big unsigned
//! integer in decimal so the symbol can use QR numeric mode. These helpers
//! convert between that text and the big-endian bytes it encodes.

/// Shortest digit run treated as a numeric rendering
pub const MIN_DIGITS: usize = 8;

/// True when `bytes` looks like a numeric rendering
pub fn is_decimal(bytes: &[u8]) -> bool {
    bytes.len() >= MIN_DIGITS && bytes.iter().all(u8::is_ascii_digit)
}

/// Parse ASCII decimal digits into big-endian bytes.
///
/// Leading zero bytes of the integer are not represented, so `"0"` becomes an
/// empty vector. Returns `None` on any non-digit.
pub fn decode_decimal(digits: &[u8]) -> Option<Vec<u8>> {
    // Little-endian accumulator; reversed at the end
    let mut acc: Vec<u8> = Vec::with_capacity(digits.len() / 2 + 1);
    for &d in digits {
        if !d.is_ascii_digit() {
            return None;
        }
        let mut carry = (d - b'0') as u32;
        for byte in acc.iter_mut() {
            let v = *byte as u32 * 10 + carry;
            *byte = (v & 0xFF) as u8;
            carry = v >> 8;
        }
        while carry > 0 {
            acc.push((carry & 0xFF) as u8);
            carry >>= 8;
        }
    }
    while acc.last() == Some(&0) {
        acc.pop();
    }
    acc.reverse();
    Some(acc)
}

/// Render big-endian bytes as a decimal integer string
pub fn encode_decimal(bytes: &[u8]) -> String {
    // Little-endian base-10^9 limbs
    const LIMB: u64 = 1_000_000_000;
    let mut limbs: Vec<u64> = Vec::with_capacity(bytes.len() / 3 + 1);
    for &b in bytes {
        let mut carry = b as u64;
        for limb in limbs.iter_mut() {
            let v = *limb * 256 + carry;
            *limb = v % LIMB;
            carry = v / LIMB;
        }
        while carry > 0 {
            limbs.push(carry % LIMB);
            carry /= LIMB;
        }
    }

    let Some((last, rest)) = limbs.split_last() else {
        return String::from("0");
    };
    let mut out = last.to_string();
    for limb in rest.iter().rev() {
        out.push_str(&format!("{:09}", limb));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_values() {
        assert_eq!(decode_decimal(b"0"), Some(Vec::new()));
        assert_eq!(decode_decimal(b"255"), Some(vec![0xFF]));
        assert_eq!(decode_decimal(b"256"), Some(vec![0x01, 0x00]));
        assert_eq!(decode_decimal(b"8075"), Some(vec![0x1F, 0x8B]));
        assert_eq!(decode_decimal(b"12a"), None);
    }

    #[test]
    fn test_encode_matches_known_values() {
        assert_eq!(encode_decimal(&[]), "0");
        assert_eq!(encode_decimal(&[0x1F, 0x8B]), "8075");
        assert_eq!(encode_decimal(&[0x01, 0x00, 0x00, 0x00, 0x00]), "4294967296");
    }

    #[test]
    fn test_long_value_survives_both_directions() {
        let bytes: Vec<u8> = (1..=200u32).map(|i| (i * 37 % 251) as u8).collect();
        let text = encode_decimal(&bytes);
        assert!(is_decimal(text.as_bytes()));
        assert_eq!(decode_decimal(text.as_bytes()), Some(bytes));
    }

    #[test]
    fn test_leading_zero_bytes_dropped() {
        let text = encode_decimal(&[0x00, 0x00, 0x1F, 0x8B]);
        assert_eq!(text, "8075");
        assert_eq!(decode_decimal(b"0008075"), Some(vec![0x1F, 0x8B]));
    }

    #[test]
    fn test_is_decimal_needs_length() {
        assert!(!is_decimal(b"1234"));
        assert!(is_decimal(b"12345678"));
        assert!(!is_decimal(b"1234567x"));
    }
}
