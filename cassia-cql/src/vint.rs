//! Variable-length integers as used by the `duration` wire format.
//!
//! An unsigned vint spends the leading bits of the first byte on a unary
//! count of continuation bytes; signed values are zigzag-mapped first so
//! that small magnitudes of either sign stay short.

pub(crate) fn unsigned_vint_encode(v: u64, buf: &mut Vec<u8>) {
    let number_of_bytes = (639 - 9 * v.leading_zeros() as i32) >> 6;
    if number_of_bytes <= 1 {
        buf.push(v as u8);
        return;
    }
    if number_of_bytes == 9 {
        // The first byte is all continuation bits; the value fills the rest.
        buf.push(0xff);
        buf.extend_from_slice(&v.to_be_bytes());
        return;
    }
    let extra_bytes = (number_of_bytes - 1) as usize;
    let first_byte_mask = !((0xffu16 >> extra_bytes) as u8);
    buf.push((v >> (8 * extra_bytes)) as u8 | first_byte_mask);
    for i in (0..extra_bytes).rev() {
        buf.push((v >> (8 * i)) as u8);
    }
}

pub(crate) fn vint_encode(v: i64, buf: &mut Vec<u8>) {
    unsigned_vint_encode(zig_zag_encode(v), buf)
}

fn zig_zag_encode(v: i64) -> u64 {
    ((v >> 63) ^ (v << 1)) as u64
}

fn zig_zag_decode(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

/// Decodes one unsigned vint from the front of `buf`, returning the value
/// and the remaining bytes, or `None` if `buf` is truncated.
pub(crate) fn unsigned_vint_decode(buf: &[u8]) -> Option<(u64, &[u8])> {
    let first = *buf.first()?;
    let extra_bytes = first.leading_ones() as usize;
    if buf.len() < 1 + extra_bytes {
        return None;
    }
    let mut v = (first & (0xffu16 >> extra_bytes) as u8) as u64;
    for byte in &buf[1..1 + extra_bytes] {
        v = (v << 8) | *byte as u64;
    }
    Some((v, &buf[1 + extra_bytes..]))
}

pub(crate) fn vint_decode(buf: &[u8]) -> Option<(i64, &[u8])> {
    let (unsigned, rest) = unsigned_vint_decode(buf)?;
    Some((zig_zag_decode(unsigned), rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(v: i64) {
        let mut buf = Vec::new();
        vint_encode(v, &mut buf);
        let (decoded, rest) = vint_decode(&buf).unwrap();
        assert_eq!(decoded, v);
        assert!(rest.is_empty());
    }

    #[test]
    fn vint_roundtrips_across_widths() {
        for v in [
            0,
            1,
            -1,
            63,
            -64,
            64,
            127,
            128,
            -12_345_678,
            i64::MAX,
            i64::MIN,
        ] {
            roundtrip(v);
        }
    }

    #[test]
    fn small_values_take_one_byte() {
        let mut buf = Vec::new();
        unsigned_vint_encode(127, &mut buf);
        assert_eq!(buf, [127]);

        buf.clear();
        unsigned_vint_encode(128, &mut buf);
        assert_eq!(buf, [0x80, 0x80]);
    }

    #[test]
    fn truncated_input_is_detected() {
        assert_eq!(unsigned_vint_decode(&[]), None);
        assert_eq!(unsigned_vint_decode(&[0x80]), None);
    }
}
