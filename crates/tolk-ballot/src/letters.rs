//! Bijective base-26 letters for 1-based positions: 1 → A, 26 → Z, 27 → AA.

const DISPLAY_PREFIX: &str = "Model ";

pub fn encode(position: usize) -> String {
    debug_assert!(position > 0, "positions are 1-based");
    let mut n = position;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    out.iter().rev().collect()
}

/// Inverse of [`encode`]. `None` for anything that is not uppercase ASCII letters.
pub fn decode(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    letters.bytes().try_fold(0usize, |acc, b| {
        if !b.is_ascii_uppercase() {
            return None;
        }
        acc.checked_mul(26)?.checked_add(usize::from(b - b'A') + 1)
    })
}

pub fn display_name(position: usize) -> String {
    format!("{}{}", DISPLAY_PREFIX, encode(position))
}

/// `"Model C"` → `Some(3)`.
pub fn parse_display_name(name: &str) -> Option<usize> {
    name.trim().strip_prefix(DISPLAY_PREFIX).and_then(|rest| decode(rest.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_letters() {
        assert_eq!(encode(1), "A");
        assert_eq!(encode(4), "D");
        assert_eq!(encode(26), "Z");
        assert_eq!(decode("A"), Some(1));
        assert_eq!(decode("Z"), Some(26));
    }

    #[test]
    fn test_multi_letters() {
        assert_eq!(encode(27), "AA");
        assert_eq!(encode(52), "AZ");
        assert_eq!(encode(703), "AAA");
        for n in 1..2000 {
            assert_eq!(decode(&encode(n)), Some(n));
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("a"), None);
        assert_eq!(decode("A1"), None);
        assert_eq!(decode("Ä"), None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(display_name(3), "Model C");
        assert_eq!(parse_display_name("Model C"), Some(3));
        assert_eq!(parse_display_name("  Model AB "), Some(28));
        assert_eq!(parse_display_name("Model "), None);
        assert_eq!(parse_display_name("Modell C"), None);
        assert_eq!(parse_display_name("C"), None);
    }
}
