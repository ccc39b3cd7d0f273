//! Exact substring search.
//!
//! [`index_of`] finds the leftmost occurrence of a pattern with a hybrid
//! strategy:
//!
//! 1. **Budgeted scan** ([`scan_with_budget`]): jump to the next occurrence
//!    of the pattern's first byte and verify the window. Each failed
//!    verification is counted; once the count reaches
//!    [`failure_budget`]`(cursor)` the scan gives up.
//! 2. **Rabin–Karp** ([`index_rabin_karp`]): the rest of the haystack is
//!    searched with a polynomial rolling hash modulo 2³², so pathological
//!    inputs (long runs of near-matching prefixes) stay linear.
//!
//! Hash matches are always confirmed by comparing bytes.
//!
//! All functions are pure and operate on bytes; offsets into a `&str` are
//! byte offsets.

/// Multiplier of the rolling hash.
pub const PRIME_RK: u32 = 16777619;

/// Outcome of [`scan_with_budget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    Found(usize),
    NotFound,
    /// The failure budget ran out; searching must resume at this offset.
    Exhausted(usize),
}

/// Byte offset of the first occurrence of `pattern` in `haystack`.
pub fn index_of(haystack: &str, pattern: &str) -> Option<usize> {
    index_of_bytes(haystack.as_bytes(), pattern.as_bytes())
}

/// Whether `pattern` occurs anywhere in `haystack`.
pub fn contains(haystack: &str, pattern: &str) -> bool {
    index_of(haystack, pattern).is_some()
}

/// Byte-slice form of [`index_of`].
pub fn index_of_bytes(haystack: &[u8], pattern: &[u8]) -> Option<usize> {
    let n = pattern.len();
    match n {
        0 => return Some(0),
        1 => return index_byte(haystack, pattern[0]),
        _ if n == haystack.len() => return (haystack == pattern).then_some(0),
        _ if n > haystack.len() => return None,
        _ => {}
    }

    match scan_with_budget(haystack, pattern) {
        Scan::Found(i) => Some(i),
        Scan::NotFound => None,
        Scan::Exhausted(i) => index_rabin_karp(&haystack[i..], pattern).map(|j| i + j),
    }
}

/// Number of failed verifications tolerated once the cursor reaches `cursor`.
pub fn failure_budget(cursor: usize) -> usize {
    4 + (cursor >> 4)
}

/// Naive first-byte scan with a position-scaled failure budget.
pub fn scan_with_budget(haystack: &[u8], pattern: &[u8]) -> Scan {
    let n = pattern.len();
    if n == 0 {
        return Scan::Found(0);
    }
    if n > haystack.len() {
        return Scan::NotFound;
    }

    let first = pattern[0];
    // Only offsets where a full window still fits.
    let starts = &haystack[..haystack.len() - n + 1];
    let mut i = 0;
    let mut fails = 0;

    while i < starts.len() {
        if starts[i] != first {
            match index_byte(&starts[i..], first) {
                Some(o) => i += o,
                None => return Scan::NotFound,
            }
        }
        if &haystack[i..i + n] == pattern {
            return Scan::Found(i);
        }
        i += 1;
        fails += 1;
        if fails >= failure_budget(i) && i < starts.len() {
            return Scan::Exhausted(i);
        }
    }

    Scan::NotFound
}

/// Rabin–Karp search over the whole of `haystack`.
pub fn index_rabin_karp(haystack: &[u8], pattern: &[u8]) -> Option<usize> {
    let n = pattern.len();
    if n == 0 {
        return Some(0);
    }
    if n > haystack.len() {
        return None;
    }

    let (target, pow) = hash_str(pattern);
    let mut h = hash_bytes(&haystack[..n]);
    if h == target && &haystack[..n] == pattern {
        return Some(0);
    }

    for i in n..haystack.len() {
        h = roll(h, haystack[i], haystack[i - n], pow);
        let start = i + 1 - n;
        if h == target && &haystack[start..=i] == pattern {
            return Some(start);
        }
    }

    None
}

/// Hash of `pattern` and the factor that removes a byte leaving the window.
pub fn hash_str(pattern: &[u8]) -> (u32, u32) {
    (hash_bytes(pattern), pow_for(pattern.len()))
}

/// Polynomial hash of `bytes` with base [`PRIME_RK`], wrapping.
pub fn hash_bytes(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |h, &b| h.wrapping_mul(PRIME_RK).wrapping_add(u32::from(b)))
}

/// `PRIME_RK^len mod 2³²` by binary exponentiation.
pub fn pow_for(len: usize) -> u32 {
    let mut pow = 1u32;
    let mut sq = PRIME_RK;
    let mut i = len;
    while i > 0 {
        if i & 1 != 0 {
            pow = pow.wrapping_mul(sq);
        }
        sq = sq.wrapping_mul(sq);
        i >>= 1;
    }
    pow
}

/// Slide the window one byte: add `incoming`, drop `outgoing`.
pub fn roll(h: u32, incoming: u8, outgoing: u8, pow: u32) -> u32 {
    h.wrapping_mul(PRIME_RK)
        .wrapping_add(u32::from(incoming))
        .wrapping_sub(pow.wrapping_mul(u32::from(outgoing)))
}

fn index_byte(haystack: &[u8], byte: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == byte)
}
