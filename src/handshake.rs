//! Legacy WebSocket handshake control.

pub mod client;
pub mod config;
pub mod cookie;
pub mod fields;
pub mod key;
pub mod request;
pub mod server;

use md5::{Digest, Md5};

/// Derives the 16-byte handshake checksum from the numbers hidden in both keys
/// and the 8-byte challenge.
///
/// The digest covers both numbers as big-endian 32-bit integers followed by
/// the challenge.
pub fn compute_checksum(number1: u32, number2: u32, challenge: &[u8; 8]) -> [u8; 16] {
    let mut md5 = Md5::new();
    md5.update(number1.to_be_bytes());
    md5.update(number2.to_be_bytes());
    md5.update(challenge);
    md5.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::compute_checksum;

    #[test]
    fn draft_example() {
        // example from draft-ietf-hybi-thewebsocketprotocol-00
        assert_eq!(
            &compute_checksum(155712099, 173347027, b"Tm[K T2u"),
            b"fQJ,fN/4F4!~K~MH"
        );
    }

    #[test]
    fn known_answers() {
        assert_eq!(
            compute_checksum(0, 0, &[0; 8]),
            [
                74, 231, 19, 54, 228, 75, 249, 191, 121, 210, 117, 46, 35, 72, 24, 165
            ]
        );
        assert_eq!(
            compute_checksum(1, 2, b"abcdefgh"),
            [
                77, 12, 90, 89, 39, 127, 41, 35, 147, 189, 36, 199, 121, 98, 229, 163
            ]
        );
    }

    #[test]
    fn every_input_matters() {
        let base = compute_checksum(1, 2, b"abcdefgh");
        assert_eq!(base, compute_checksum(1, 2, b"abcdefgh"));
        assert_ne!(base, compute_checksum(2, 2, b"abcdefgh"));
        assert_ne!(base, compute_checksum(1, 3, b"abcdefgh"));
        for i in 0..8 {
            let mut challenge = *b"abcdefgh";
            challenge[i] ^= 1;
            assert_ne!(base, compute_checksum(1, 2, &challenge));
        }
    }
}
