//! Reading the `/Title` entry of a PDF document information dictionary.
//!
//! Only what a restore needs: the title is found either in plain object
//! bytes or inside Flate-compressed object streams, and decoded from a
//! literal `( … )` or hex `< … >` string.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::{EngineError, ResultEngine};

const TITLE_KEY: &[u8] = b"/Title";

/// Title of the PDF in `bytes`.
///
/// The last readable `/Title` wins, so incremental updates override the
/// original value.
pub fn pdf_title(bytes: &[u8]) -> ResultEngine<String> {
    if !bytes.starts_with(b"%PDF") {
        return Err(EngineError::MissingMetadata("not a PDF document".to_string()));
    }

    let mut title = last_title(bytes);
    if title.is_none() {
        for stream in flate_streams(bytes) {
            if let Some(found) = last_title(&stream) {
                title = Some(found);
            }
        }
    }

    let raw = title.ok_or_else(|| EngineError::MissingMetadata("document has no title".to_string()))?;
    let text = decode_text(&raw);
    if text.trim().is_empty() {
        return Err(EngineError::MissingMetadata("document title is empty".to_string()));
    }
    Ok(text)
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

fn last_title(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut found = None;
    let mut from = 0;
    while let Some(pos) = find(bytes, TITLE_KEY, from) {
        from = pos + TITLE_KEY.len();
        if let Some(value) = string_at(bytes, from) {
            found = Some(value);
        }
    }
    found
}

/// Parse the PDF string object starting at `pos` (after optional
/// whitespace).
fn string_at(bytes: &[u8], pos: usize) -> Option<Vec<u8>> {
    let start = pos + bytes.get(pos..)?.iter().take_while(|b| b.is_ascii_whitespace()).count();
    match bytes.get(start)? {
        b'(' => literal_string(bytes, start + 1),
        b'<' if bytes.get(start + 1) != Some(&b'<') => hex_string(bytes, start + 1),
        _ => None,
    }
}

fn literal_string(bytes: &[u8], mut pos: usize) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    loop {
        let byte = *bytes.get(pos)?;
        pos += 1;
        match byte {
            b'\\' => {
                let escaped = *bytes.get(pos)?;
                pos += 1;
                match escaped {
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0c),
                    b'0'..=b'7' => {
                        let mut value = u32::from(escaped - b'0');
                        for _ in 0..2 {
                            match bytes.get(pos) {
                                Some(digit @ b'0'..=b'7') => {
                                    value = value * 8 + u32::from(digit - b'0');
                                    pos += 1;
                                }
                                _ => break,
                            }
                        }
                        out.push((value & 0xff) as u8);
                    }
                    // Line continuation.
                    b'\r' => {
                        if bytes.get(pos) == Some(&b'\n') {
                            pos += 1;
                        }
                    }
                    b'\n' => {}
                    other => out.push(other),
                }
            }
            b'(' => {
                depth += 1;
                out.push(byte);
            }
            b')' => {
                if depth == 0 {
                    return Some(out);
                }
                depth -= 1;
                out.push(byte);
            }
            _ => out.push(byte),
        }
    }
}

fn hex_string(bytes: &[u8], pos: usize) -> Option<Vec<u8>> {
    let end = pos + bytes.get(pos..)?.iter().position(|&b| b == b'>')?;
    let mut digits: Vec<u8> = bytes[pos..end]
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 == 1 {
        digits.push(b'0');
    }
    digits
        .chunks(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(text, 16).ok()
        })
        .collect()
}

/// UTF-16BE when the string starts with a byte order mark, otherwise UTF-8
/// with a Latin-1 fallback.
fn decode_text(raw: &[u8]) -> String {
    if let Some(body) = raw.strip_prefix(&[0xfe, 0xff]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(raw) {
        Ok(text) => text.to_string(),
        Err(_) => raw.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Decompressed bodies of every `FlateDecode` stream.
fn flate_streams(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut streams = Vec::new();
    let mut from = 0;
    while let Some(keyword) = find(bytes, b"stream", from) {
        from = keyword + b"stream".len();
        // Skip "endstream".
        if keyword >= 3 && &bytes[keyword - 3..keyword] == b"end" {
            continue;
        }
        let dict_start = bytes[..keyword]
            .windows(2)
            .rposition(|window| window == b"<<")
            .unwrap_or(0);
        if find(&bytes[dict_start..keyword], b"/FlateDecode", 0).is_none() {
            continue;
        }

        let mut body_start = from;
        if bytes.get(body_start) == Some(&b'\r') {
            body_start += 1;
        }
        if bytes.get(body_start) == Some(&b'\n') {
            body_start += 1;
        }
        let Some(body_end) = find(bytes, b"endstream", body_start) else {
            break;
        };

        let mut inflated = Vec::new();
        let mut decoder = ZlibDecoder::new(&bytes[body_start..body_end]);
        // Trailing EOL bytes before `endstream` make the decoder stop early
        // with an error even though the data is complete.
        match decoder.read_to_end(&mut inflated) {
            Ok(_) => streams.push(inflated),
            Err(err) if !inflated.is_empty() => {
                tracing::debug!("partial flate stream: {err}");
                streams.push(inflated);
            }
            Err(err) => tracing::debug!("skipping unreadable stream: {err}"),
        }
        from = body_end;
    }
    streams
}
