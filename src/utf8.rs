//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
//! Lenient UTF-8 codepoint decoding.
//!
//! Host buffers are raw bytes and may contain malformed sequences. Every malformed or truncated
//! sequence decodes as one placeholder codepoint (`None`) consuming exactly one byte, in both
//! directions, so byte offsets and codepoint counts never drift apart.

/// Expected length of a sequence starting with `lead`, or `0` if `lead` cannot start one.
pub fn sequence_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0,
    }
}

fn is_continuation(byte: u8) -> bool { byte & 0xc0 == 0x80 }

/// Decodes the codepoint at the start of `bytes`.
///
/// Returns the decoded char (`None` for the placeholder) and the number of bytes consumed. An
/// empty slice yields `(None, 0)`.
pub fn decode(bytes: &[u8]) -> (Option<char>, usize) {
    let lead = match bytes.first() {
        Some(lead) => *lead,
        None => return (None, 0),
    };
    let n = sequence_len(lead);
    if n == 0 || n > bytes.len() {
        return (None, 1);
    }
    match std::str::from_utf8(&bytes[..n]) {
        Ok(s) => (s.chars().next(), n),
        Err(_) => (None, 1),
    }
}

/// Decodes the codepoint that ends at the end of `bytes`.
pub fn decode_last(bytes: &[u8]) -> (Option<char>, usize) {
    let len = bytes.len();
    if len == 0 {
        return (None, 0);
    }
    for n in 1..=len.min(4) {
        let start = len - n;
        let byte = bytes[start];
        if sequence_len(byte) == n {
            if let Ok(s) = std::str::from_utf8(&bytes[start..]) {
                return (s.chars().next(), n);
            }
            break;
        }
        if !is_continuation(byte) {
            break;
        }
    }
    (None, 1)
}

/// Encodes `c` into `buf`, returning the written bytes.
pub fn encode(c: char, buf: &mut [u8; 4]) -> &[u8] { c.encode_utf8(buf).as_bytes() }

/// Number of codepoints in `bytes`, counting each malformed byte as one.
pub fn codepoint_count(bytes: &[u8]) -> usize { Codepoints::new(bytes).count() }

/// Forward iterator over `(byte_offset, char, byte_len)` with the placeholder policy applied.
pub struct Codepoints<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Codepoints<'a> {
    /// Iterates `bytes` from the start.
    pub fn new(bytes: &'a [u8]) -> Self { Self { bytes, offset: 0 } }
}

impl<'a> Iterator for Codepoints<'a> {
    type Item = (usize, Option<char>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (c, n) = decode(&self.bytes[self.offset..]);
        if n == 0 {
            return None;
        }
        let item = (self.offset, c, n);
        self.offset += n;
        Some(item)
    }
}
