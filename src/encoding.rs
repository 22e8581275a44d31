use std::fmt::{self, Display};

/// Neither decode attempt produced text.
#[derive(Debug)]
pub struct EncodingError;

impl Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contents are neither UTF-8 nor ISO-8859-1 text")
    }
}

/// Decodes persisted text with an explicit two-step attempt: UTF-8 first,
/// then ISO-8859-1. Datasets written by older runs of the pipeline carry
/// the legacy encoding, so plain `read_to_string` is not enough here.
///
/// The fallback treats the C1 control range (0x80..=0x9F) as undecodable;
/// those bytes never appear in ISO-8859-1 text and accepting them would
/// silently mangle genuinely broken input.
pub fn decode_text(bytes: &[u8]) -> Result<String, EncodingError> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(String::from(text));
    }

    if bytes.iter().any(|byte| (0x80..=0x9F).contains(byte)) {
        return Err(EncodingError);
    }

    // ISO-8859-1 maps every remaining byte straight to the code point
    Ok(bytes.iter().map(|&byte| char::from(byte)).collect())
}
