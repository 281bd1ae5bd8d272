//! Content-type detection from leading bytes.
//!
//! The media type of a fetched blob is derived from its first
//! [`SNIFF_LEN`] bytes only; the stored name and its extension play no part.
//! Signatures follow the WHATWG MIME sniffing tables, trimmed to the formats a
//! file share commonly sees.

/// Number of leading bytes considered.
pub const SNIFF_LEN: usize = 512;

pub const OCTET_STREAM: &str = "application/octet-stream";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

enum Signature {
    /// Exact prefix.
    Prefix(&'static [u8], &'static str),
    /// Prefix compared under a mask (`0x00` mask bytes are wildcards).
    Masked {
        pattern: &'static [u8],
        mask: &'static [u8],
        media_type: &'static str,
    },
    /// Case-insensitive markup tag after leading whitespace, followed by a
    /// space or `>`.
    Tag(&'static [u8], &'static str),
}

const HTML: &str = "text/html; charset=utf-8";

const SIGNATURES: &[Signature] = &[
    Signature::Tag(b"<!DOCTYPE HTML", HTML),
    Signature::Tag(b"<HTML", HTML),
    Signature::Tag(b"<HEAD", HTML),
    Signature::Tag(b"<SCRIPT", HTML),
    Signature::Tag(b"<IFRAME", HTML),
    Signature::Tag(b"<H1", HTML),
    Signature::Tag(b"<DIV", HTML),
    Signature::Tag(b"<FONT", HTML),
    Signature::Tag(b"<TABLE", HTML),
    Signature::Tag(b"<A", HTML),
    Signature::Tag(b"<STYLE", HTML),
    Signature::Tag(b"<TITLE", HTML),
    Signature::Tag(b"<B", HTML),
    Signature::Tag(b"<BODY", HTML),
    Signature::Tag(b"<BR", HTML),
    Signature::Tag(b"<P", HTML),
    Signature::Tag(b"<!--", HTML),
    Signature::Prefix(b"<?xml", "text/xml; charset=utf-8"),
    Signature::Prefix(b"%PDF-", "application/pdf"),
    Signature::Prefix(b"%!PS-Adobe-", "application/postscript"),
    Signature::Prefix(b"\xFE\xFF", "text/plain; charset=utf-16be"),
    Signature::Prefix(b"\xFF\xFE", "text/plain; charset=utf-16le"),
    Signature::Prefix(b"\xEF\xBB\xBF", TEXT_PLAIN),
    Signature::Prefix(b"\x00\x00\x01\x00", "image/x-icon"),
    Signature::Prefix(b"\x00\x00\x02\x00", "image/x-icon"),
    Signature::Prefix(b"BM", "image/bmp"),
    Signature::Prefix(b"GIF87a", "image/gif"),
    Signature::Prefix(b"GIF89a", "image/gif"),
    Signature::Masked {
        pattern: b"RIFF\x00\x00\x00\x00WEBPVP",
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
        media_type: "image/webp",
    },
    Signature::Prefix(b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    Signature::Prefix(b"\xFF\xD8\xFF", "image/jpeg"),
    Signature::Prefix(b"OggS\x00", "application/ogg"),
    Signature::Prefix(b"ID3", "audio/mpeg"),
    Signature::Masked {
        pattern: b"RIFF\x00\x00\x00\x00WAVE",
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        media_type: "audio/wave",
    },
    Signature::Prefix(b"\x1A\x45\xDF\xA3", "video/webm"),
    Signature::Prefix(b"\x1F\x8B\x08", "application/x-gzip"),
    Signature::Prefix(b"PK\x03\x04", "application/zip"),
    Signature::Prefix(b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    Signature::Prefix(b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    Signature::Prefix(b"\x00asm", "application/wasm"),
];

impl Signature {
    fn matches(&self, data: &[u8]) -> Option<&'static str> {
        match self {
            Self::Prefix(prefix, media_type) => data.starts_with(prefix).then_some(*media_type),
            Self::Masked {
                pattern,
                mask,
                media_type,
            } => {
                let hit = data.len() >= pattern.len()
                    && pattern
                        .iter()
                        .zip(mask.iter())
                        .zip(data.iter())
                        .all(|((p, m), d)| d & m == *p);
                hit.then_some(*media_type)
            }
            Self::Tag(tag, media_type) => {
                let body = skip_whitespace(data);
                if body.len() <= tag.len() || !body[..tag.len()].eq_ignore_ascii_case(tag) {
                    return None;
                }
                matches!(body[tag.len()], b' ' | b'>').then_some(*media_type)
            }
        }
    }
}

fn skip_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|&b| !matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

fn is_binary(byte: u8) -> bool {
    matches!(byte, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

/// Media type for content starting with `data`.
///
/// Always returns a valid media type, falling back to
/// `application/octet-stream` for unrecognised binary content.
///
/// # Examples
/// ```
/// use warden::domain::content_type::sniff;
///
/// assert_eq!(sniff(b"%PDF-1.7 ..."), "application/pdf");
/// assert_eq!(sniff(b"hello"), "text/plain; charset=utf-8");
/// ```
pub fn sniff(data: &[u8]) -> &'static str {
    let head = &data[..data.len().min(SNIFF_LEN)];
    if let Some(media_type) = SIGNATURES.iter().find_map(|sig| sig.matches(head)) {
        return media_type;
    }
    if head.iter().copied().any(is_binary) {
        OCTET_STREAM
    } else {
        TEXT_PLAIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"%PDF-1.4\n", "application/pdf")]
    #[case(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR", "image/png")]
    #[case(b"\xFF\xD8\xFF\xE0\0\x10JFIF", "image/jpeg")]
    #[case(b"GIF89a\x01\0", "image/gif")]
    #[case(b"RIFF\x24\0\0\0WEBPVP8 ", "image/webp")]
    #[case(b"RIFF\x24\0\0\0WAVEfmt ", "audio/wave")]
    #[case(b"PK\x03\x04\x14\0", "application/zip")]
    #[case(b"\x1F\x8B\x08\0", "application/x-gzip")]
    #[case(b"<?xml version=\"1.0\"?>", "text/xml; charset=utf-8")]
    #[case(b"  \n<!doctype html><html>", "text/html; charset=utf-8")]
    #[case(b"<p>hi</p>", "text/html; charset=utf-8")]
    #[case(b"\xEF\xBB\xBFtext", "text/plain; charset=utf-8")]
    #[case(b"plain words\n", "text/plain; charset=utf-8")]
    #[case(b"", "text/plain; charset=utf-8")]
    #[case(b"\x00\x01\x02\x03", "application/octet-stream")]
    fn detects_known_signatures(#[case] data: &[u8], #[case] expected: &str) {
        assert_eq!(sniff(data), expected);
    }

    #[rstest]
    fn tag_requires_terminator() {
        assert_eq!(sniff(b"<pre>"), TEXT_PLAIN);
        assert_eq!(sniff(b"<a"), TEXT_PLAIN);
    }

    #[rstest]
    fn bytes_beyond_the_window_are_ignored() {
        let mut data = vec![b'a'; SNIFF_LEN];
        data.push(0x00);
        assert_eq!(sniff(&data), TEXT_PLAIN);
    }
}
