//! `Sec-WebSocket-Key1` / `Sec-WebSocket-Key2` number codec.
//!
//! A key hides a 32-bit number: the digits of the key, read in order, form
//! `number * spaces`, where `spaces` is the count of space characters in the
//! key. Everything else is noise.

use rand::Rng;

use crate::error::{ProtocolError, Result};

/// Largest number of spaces (and of noise characters) a generated key holds.
const MAX_SPACES: u32 = 12;
const MAX_NOISE: usize = 12;

/// Decodes the number hidden in a key.
///
/// A key without any space character carries no value and yields `Ok(None)`.
/// The quotient is truncated; a value that does not fit the 32-bit wire field
/// is an error.
pub fn decode_key(key: &str) -> Result<Option<u32>> {
    let spaces = key.bytes().filter(|&b| b == b' ').count() as u64;
    if spaces == 0 {
        return Ok(None);
    }

    let numeral = key
        .bytes()
        .filter(u8::is_ascii_digit)
        .try_fold(0u64, |acc, digit| {
            acc.checked_mul(10)?.checked_add(u64::from(digit - b'0'))
        })
        .ok_or(ProtocolError::KeyOutOfRange)?;

    let number = u32::try_from(numeral / spaces).map_err(|_| ProtocolError::KeyOutOfRange)?;
    Ok(Some(number))
}

/// Generates a random key, returning the number it encodes along with it.
pub fn generate_key<R: Rng + ?Sized>(rng: &mut R) -> (u32, String) {
    let spaces = rng.random_range(1..=MAX_SPACES);
    let number = rng.random_range(0..=u32::MAX / spaces);
    (number, encode_key_with(number, spaces, rng))
}

/// Encodes a caller-chosen number, picking a space count that keeps
/// `number * spaces` within 32 bits.
pub fn key_for_number<R: Rng + ?Sized>(number: u32, rng: &mut R) -> String {
    let max_spaces = u32::MAX
        .checked_div(number)
        .map_or(MAX_SPACES, |max| max.min(MAX_SPACES));
    let spaces = rng.random_range(1..=max_spaces);
    encode_key_with(number, spaces, rng)
}

/// Encodes `number` using exactly `spaces` space characters.
///
/// `spaces` must be non-zero and `number * spaces` must fit in 32 bits for the
/// result to be accepted by a strict peer; [`decode_key`] itself recovers
/// `number` for any non-zero `spaces`.
pub fn encode_key_with<R: Rng + ?Sized>(number: u32, spaces: u32, rng: &mut R) -> String {
    let product = u64::from(number) * u64::from(spaces);
    let mut key = product.to_string().into_bytes();

    for _ in 0..rng.random_range(1..=MAX_NOISE) {
        let idx = rng.random_range(0..=key.len());
        key.insert(idx, noise_char(rng));
    }

    // The noise pass leaves at least two characters, so `1..len` is never
    // empty and no space can land at either end.
    for _ in 0..spaces {
        let idx = rng.random_range(1..key.len());
        key.insert(idx, b' ');
    }

    key.into_iter().map(char::from).collect()
}

/// Picks a printable character that is neither a digit nor a space.
fn noise_char<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    if rng.random_bool(0.5) {
        rng.random_range(0x21..=0x2F)
    } else {
        rng.random_range(0x3A..=0x7E)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::error::Error;

    #[test]
    fn draft_example_keys() {
        assert_eq!(
            decode_key("18x 6]8vM;54 *(5:  {   U1]8  z [  8").unwrap(),
            Some(155712099)
        );
        assert_eq!(
            decode_key("1_ tx7X d  <  nw  334J702) 7]o}` 0").unwrap(),
            Some(173347027)
        );
    }

    #[test]
    fn no_spaces_means_no_value() {
        assert_eq!(decode_key("").unwrap(), None);
        assert_eq!(decode_key("12345").unwrap(), None);
        assert_eq!(decode_key("a1b2c3").unwrap(), None);
    }

    #[test]
    fn no_digits_decode_as_zero() {
        assert_eq!(decode_key("a b c").unwrap(), Some(0));
    }

    #[test]
    fn division_truncates() {
        // 7 / 2
        assert_eq!(decode_key("7 x ").unwrap(), Some(3));
    }

    #[test]
    fn out_of_range_is_an_error() {
        assert!(matches!(
            decode_key("4294967296 "),
            Err(Error::Protocol(ProtocolError::KeyOutOfRange))
        ));
        assert!(matches!(
            decode_key("99999999999999999999999 "),
            Err(Error::Protocol(ProtocolError::KeyOutOfRange))
        ));
        assert_eq!(decode_key("8589934590  ").unwrap(), Some(u32::MAX));
    }

    #[test]
    fn generated_keys_decode_to_their_number() {
        let mut rng = StdRng::seed_from_u64(76);
        for _ in 0..2000 {
            let (number, key) = generate_key(&mut rng);
            assert_eq!(decode_key(&key).unwrap(), Some(number), "key {key:?}");
        }
    }

    #[test]
    fn boundary_numbers_round_trip_for_every_space_count() {
        let mut rng = StdRng::seed_from_u64(75);
        for spaces in 1..=MAX_SPACES {
            let max = u32::MAX / spaces;
            for number in [0, 1, max / 2, max - 1, max] {
                let key = encode_key_with(number, spaces, &mut rng);
                assert_eq!(decode_key(&key).unwrap(), Some(number), "key {key:?}");
            }
        }
    }

    #[test]
    fn generated_key_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let (_, key) = generate_key(&mut rng);
            let spaces = key.bytes().filter(|&b| b == b' ').count() as u32;
            assert!((1..=MAX_SPACES).contains(&spaces));
            assert!(!key.starts_with(' ') && !key.ends_with(' '));

            let noise = key
                .bytes()
                .filter(|b| !b.is_ascii_digit() && *b != b' ')
                .count();
            assert!((1..=MAX_NOISE).contains(&noise));
            assert!(key.bytes().all(|b| b == b' ' || (0x21..=0x7E).contains(&b)));
        }
    }

    #[test]
    fn same_seed_same_key() {
        let a = generate_key(&mut StdRng::seed_from_u64(42));
        let b = generate_key(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn chosen_numbers_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);
        for number in [0, 1, 12345, u32::MAX / 12, u32::MAX / 2, u32::MAX] {
            let key = key_for_number(number, &mut rng);
            assert_eq!(decode_key(&key).unwrap(), Some(number), "key {key:?}");
        }
    }
}
