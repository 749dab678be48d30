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
//! Mapping between codepoint indices, byte offsets and pixel positions.
//!
//! All routines walk the text with the same fit rule the text box uses when drawing: a glyph fits
//! only while the accumulated advance stays strictly below the rectangle width, so cursor placement
//! and the drawn substring never disagree. Text is single line; a line break ends every walk.

use crate::utf8::{self, Codepoints};
use crate::Recti;

/// Host text measurement for one font at one size.
pub trait TextMeasure {
    /// Horizontal advance of `c` in pixels, spacing excluded.
    fn glyph_advance(&self, c: char) -> i32;

    /// Advance used for bytes that do not decode to a codepoint.
    fn fallback_advance(&self) -> i32 { self.glyph_advance('?') }

    /// Height of a text line in pixels.
    fn line_height(&self) -> i32;

    /// Width of `text` when drawn with `spacing` after every glyph.
    fn text_width(&self, text: &str, spacing: i32) -> i32 { text.chars().map(|c| self.glyph_advance(c) + spacing).sum() }
}

#[derive(Copy, Clone, Debug)]
/// Fixed-advance metrics, for hosts drawing with a monospaced bitmap font.
pub struct MonospaceMetrics {
    /// Advance of every glyph.
    pub advance: i32,
    /// Height of a text line.
    pub line_height: i32,
}

impl MonospaceMetrics {
    /// Creates metrics with the given glyph advance and line height.
    pub fn new(advance: i32, line_height: i32) -> Self { Self { advance, line_height } }
}

impl TextMeasure for MonospaceMetrics {
    fn glyph_advance(&self, _c: char) -> i32 { self.advance }

    fn line_height(&self) -> i32 { self.line_height }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Stop condition for [`MeasureCtx::measure_forward`].
pub enum MeasureTarget {
    /// Consume as many codepoints as fit.
    Fit,
    /// Stop after this many codepoints (or earlier if they do not fit).
    Codepoint(usize),
    /// Stop before the first glyph whose horizontal midpoint lies right of this x.
    MouseX(i32),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Result of a measurement walk.
pub struct Measured {
    /// Codepoints walked.
    pub codepoints: usize,
    /// Forward walks: bytes consumed from the start. Reverse walks: byte offset of the first
    /// codepoint that still fits.
    pub bytes: usize,
    /// Forward walks: absolute x of the stop point. Reverse walks: width of the fitting run.
    pub x: i32,
}

/// Glyph metrics and character spacing borrowed for one measurement.
pub struct MeasureCtx<'a> {
    metrics: &'a dyn TextMeasure,
    spacing: i32,
}

fn is_line_break(c: Option<char>) -> bool { matches!(c, Some('\n') | Some('\r')) }

impl<'a> MeasureCtx<'a> {
    /// Borrows `metrics` with `spacing` pixels added after every glyph.
    pub fn new(metrics: &'a dyn TextMeasure, spacing: i32) -> Self { Self { metrics, spacing } }

    /// Line height of the underlying metrics.
    pub fn line_height(&self) -> i32 { self.metrics.line_height() }

    fn advance(&self, c: Option<char>) -> i32 {
        let w = match c {
            Some(c) => self.metrics.glyph_advance(c),
            None => self.metrics.fallback_advance(),
        };
        w + self.spacing
    }

    /// Walks `text` left to right from `bounds.x` until `target` is met, the line ends, or the next
    /// glyph would overflow `bounds.width`.
    pub fn measure_forward(&self, text: &[u8], bounds: Recti, target: MeasureTarget) -> Measured {
        let mut used = 0;
        let mut codepoints = 0;
        let mut bytes = 0;
        for (offset, c, n) in Codepoints::new(text) {
            if let MeasureTarget::Codepoint(count) = target {
                if codepoints >= count {
                    break;
                }
            }
            if is_line_break(c) {
                break;
            }
            let w = self.advance(c);
            if used + w >= bounds.width {
                break;
            }
            if let MeasureTarget::MouseX(mx) = target {
                if mx < bounds.x + used + w / 2 {
                    break;
                }
            }
            used += w;
            codepoints += 1;
            bytes = offset + n;
        }
        Measured { codepoints, bytes, x: bounds.x + used }
    }

    /// Walks `text` right to left from `end_byte` and returns where the longest run ending there
    /// that still fits inside `bounds.width` starts.
    pub fn measure_reverse(&self, text: &[u8], end_byte: usize, bounds: Recti) -> Measured {
        let end = end_byte.min(text.len());
        let mut start = end;
        let mut used = 0;
        let mut codepoints = 0;
        while start > 0 {
            let (c, n) = utf8::decode_last(&text[..start]);
            if is_line_break(c) {
                break;
            }
            let w = self.advance(c);
            if used + w >= bounds.width {
                break;
            }
            used += w;
            start -= n;
            codepoints += 1;
        }
        Measured { codepoints, bytes: start, x: used }
    }

    /// Number of codepoints from the start of `text` that can be drawn inside `bounds`.
    pub fn max_fitting(&self, text: &[u8], bounds: Recti) -> usize { self.measure_forward(text, bounds, MeasureTarget::Fit).codepoints }
}

/// Byte offset reached after skipping `count` codepoints from `start_byte`, clamped to the text end.
pub fn byte_index_from_codepoints(text: &[u8], start_byte: usize, count: usize) -> usize {
    let start = start_byte.min(text.len());
    start + Codepoints::new(&text[start..]).take(count).map(|(_, _, n)| n).sum::<usize>()
}

/// Codepoints before the first line break (or the end of `text`).
pub fn codepoints_until_line_break(text: &[u8]) -> usize { Codepoints::new(text).take_while(|(_, c, _)| !is_line_break(*c)).count() }
