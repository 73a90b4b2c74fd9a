//! Incremental UTF-8 decoding for streamed response bodies.

/// Decodes byte chunks into text, holding back a multi-byte sequence that was
/// split across transport chunks until the rest of it arrives.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Returns all text that is complete after appending `bytes`.
    /// Invalid sequences decode to U+FFFD.
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    return out;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        // Truncated sequence at the end: wait for more bytes.
                        None => {
                            self.pending.drain(..valid);
                            return out;
                        }
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                    }
                }
            }
        }
    }

    /// Flushes whatever is left at end of stream.
    pub fn finish(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ascii_passes_through() {
        let mut d = Utf8Decoder::default();
        assert_eq!(d.push(b"Hello "), "Hello ");
        assert_eq!(d.push(b"world"), "world");
        assert_eq!(d.finish(), "");
    }

    #[test]
    fn test_multibyte_split_across_chunks() {
        let bytes = "café €".as_bytes();
        // 'é' is bytes 3..5, '€' is bytes 6..9
        let mut d = Utf8Decoder::default();
        assert_eq!(d.push(&bytes[..4]), "caf");
        assert_eq!(d.push(&bytes[4..7]), "é ");
        assert_eq!(d.push(&bytes[7..]), "€");
        assert_eq!(d.finish(), "");
    }

    #[test]
    fn test_invalid_byte_becomes_replacement() {
        let mut d = Utf8Decoder::default();
        assert_eq!(d.push(b"a\xffb"), "a\u{FFFD}b");
    }

    #[test]
    fn test_truncated_tail_flushed_lossily_on_finish() {
        let mut d = Utf8Decoder::default();
        assert_eq!(d.push(&[b'x', 0xE2, 0x82]), "x");
        assert_eq!(d.finish(), "\u{FFFD}");
    }
}
