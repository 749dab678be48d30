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
use std::borrow::Cow;
use std::ops::Range;

use tracing::warn;

use crate::{Error, Result};

/// Fixed-capacity, NUL-terminated text buffer borrowed from the host.
///
/// The capacity is the length of the borrowed slice and includes the terminator, so at most
/// `capacity - 1` bytes of text are stored. Every mutation rewrites the terminator and never
/// touches bytes past the slice.
pub struct TextBuffer<'a> {
    bytes: &'a mut [u8],
    len: usize,
}

impl<'a> TextBuffer<'a> {
    /// Wraps `bytes`, taking the text length from the first NUL. A slice without a NUL is truncated
    /// by terminating it at its last byte.
    pub fn new(bytes: &'a mut [u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::ZeroCapacity);
        }
        let len = match bytes.iter().position(|b| *b == 0) {
            Some(len) => len,
            None => {
                let len = bytes.len() - 1;
                warn!(capacity = bytes.len(), "text buffer is not terminated, truncating");
                bytes[len] = 0;
                len
            }
        };
        Ok(Self { bytes, len })
    }

    /// Text length in bytes, terminator excluded.
    pub fn len(&self) -> usize { self.len }

    /// Returns `true` if the buffer holds no text.
    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Total size of the borrowed slice.
    pub fn capacity(&self) -> usize { self.bytes.len() }

    /// Bytes that can still be inserted while keeping room for the terminator.
    pub fn available(&self) -> usize { self.capacity() - 1 - self.len }

    /// The text bytes, terminator excluded.
    pub fn as_bytes(&self) -> &[u8] { &self.bytes[..self.len] }

    /// The text with malformed sequences replaced.
    pub fn to_string_lossy(&self) -> Cow<'_, str> { String::from_utf8_lossy(self.as_bytes()) }

    /// Inserts `data` at byte offset `at`, shifting the tail right. Returns the number of bytes
    /// inserted, which is less than `data.len()` when capacity runs out.
    pub fn insert(&mut self, at: usize, data: &[u8]) -> usize {
        let at = at.min(self.len);
        let n = data.len().min(self.available());
        if n == 0 {
            return 0;
        }
        self.bytes.copy_within(at..self.len, at + n);
        self.bytes[at..at + n].copy_from_slice(&data[..n]);
        self.len += n;
        self.terminate();
        n
    }

    /// Removes the bytes in `range` (clamped to the text), shifting the tail left. Returns the
    /// number of bytes removed.
    pub fn remove(&mut self, range: Range<usize>) -> usize {
        let end = range.end.min(self.len);
        let start = range.start.min(end);
        let n = end - start;
        if n == 0 {
            return 0;
        }
        self.bytes.copy_within(end..self.len, start);
        self.len -= n;
        self.terminate();
        n
    }

    /// Replaces the whole text with `text`, truncated on a char boundary. Returns the bytes stored.
    pub fn set(&mut self, text: &str) -> usize {
        self.clear();
        let text = truncate_str(text, self.available());
        self.insert(0, text.as_bytes())
    }

    /// Removes all text.
    pub fn clear(&mut self) {
        self.len = 0;
        self.terminate();
    }

    fn terminate(&mut self) { self.bytes[self.len] = 0; }
}

/// Longest prefix of `s` no longer than `max` bytes that ends on a char boundary.
pub(crate) fn truncate_str(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
