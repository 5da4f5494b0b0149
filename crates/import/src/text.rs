use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use crate::ImportError;

/// 將原始位元組解碼為文字。 / Decodes raw bytes into text.
///
/// Order: byte-order mark (UTF-8 / UTF-16), then strict UTF-8, then a
/// detected legacy encoding. Data containing NUL bytes without a UTF-16 BOM
/// is treated as binary and rejected.
pub fn decode_text(path: &str, bytes: &[u8]) -> Result<String, ImportError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(path, encoding, &bytes[bom_len..]);
    }

    if bytes.contains(&0) {
        return Err(decode_error(path, "contains binary data"));
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_owned());
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guess = detector.guess(None, true);
    decode_with(path, guess, bytes)
}

fn decode_with(path: &str, encoding: &'static Encoding, bytes: &[u8]) -> Result<String, ImportError> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(decode_error(
            path,
            format!("is not valid {}", encoding.name()),
        ));
    }
    Ok(match text {
        Cow::Borrowed(slice) => slice.to_owned(),
        Cow::Owned(string) => string,
    })
}

fn decode_error(path: &str, reason: impl Into<String>) -> ImportError {
    ImportError::Decode {
        path: path.to_string(),
        reason: reason.into(),
    }
}
