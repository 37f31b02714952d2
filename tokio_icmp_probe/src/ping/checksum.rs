//! The Internet checksum (RFC 1071) used by ICMP.

/// Calculate the 16 bit one's complement checksum of `data`.
///
/// An odd trailing byte is padded with a zero byte.  Writing the result into the checksum
/// field of the buffer it was computed over makes the checksum of that buffer zero.
#[must_use]
pub fn checksum(data: &[u8]) -> u16 {
    finalize_checksum(sum_be_words(data))
}

fn sum_be_words(data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(2);
    let mut sum = chunks.by_ref().fold(0u32, |sum, word| {
        let word = u32::from(u16::from_be_bytes([word[0], word[1]]));
        fold_carry(sum + word)
    });
    if let [last] = chunks.remainder() {
        sum = fold_carry(sum + (u32::from(*last) << 8));
    }
    sum
}

/// Fold the carry back in so the running sum never overflows.
const fn fold_carry(sum: u32) -> u32 {
    (sum >> 16) + (sum & 0xFFFF)
}

const fn finalize_checksum(mut sum: u32) -> u16 {
    while sum >> 16 != 0 {
        sum = fold_carry(sum);
    }
    !(sum as u16)
}
