use super::Tokenizer;

/// A reversible byte-level tokenizer.
///
/// Each UTF-8 byte maps to one token ID in `0..=255`. This needs no
/// vocabulary files, which makes it the default for engines that exist only
/// to exercise the driver. IDs outside the byte range decode to the Unicode
/// replacement character rather than panicking.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteLevelTokenizer;

impl ByteLevelTokenizer {
    /// Creates the tokenizer.
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for ByteLevelTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        text.bytes().map(u32::from).collect()
    }

    fn decode(&self, token_ids: &[u32]) -> String {
        let bytes: Vec<u8> = token_ids
            .iter()
            .map(|&id| u8::try_from(id).unwrap_or(b'?'))
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}
