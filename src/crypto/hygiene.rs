//! Best-effort wiping of sensitive buffers.
//!
//! `zeroize` uses volatile writes so the compiler cannot elide the wipe.
//! This does not protect against swap, core dumps, or copies the
//! allocator made before the buffer was wiped.

use zeroize::Zeroize;

/// Overwrite every byte of `buf` with zero.
pub fn wipe(buf: &mut [u8]) {
    buf.zeroize();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wipe_zeroes_every_byte() {
        let mut buf = *b"correct horse battery staple";
        wipe(&mut buf);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn wipe_empty_is_noop() {
        let mut buf: [u8; 0] = [];
        wipe(&mut buf);
    }
}
