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
use std::ops::Range;

use tracing::{debug, trace, warn};

use crate::buffer::truncate_str;
use crate::text_measure::{byte_index_from_codepoints, codepoints_until_line_break, MeasureCtx, MeasureTarget};
use crate::{utf8, Clipboard, Recti, TextBuffer};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Cached start of the drawn part of the text.
pub enum VisibleWindow {
    /// Must be recomputed from the cursor before the next use.
    #[default]
    Dirty,
    /// The text is drawn from codepoint `start`, found at byte offset `start_byte`.
    Valid {
        /// First drawn codepoint.
        start: usize,
        /// Byte offset of `start`.
        start_byte: usize,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Cursor, selection and scroll state of the control being edited.
///
/// Positions are codepoint indices into the first line of the text. A selection exists while the
/// anchor is set and differs from the cursor; its direction follows from comparing the two.
pub struct TextEditState {
    cursor: Option<usize>,
    anchor: Option<usize>,
    visible: VisibleWindow,
    pub(crate) dragging: bool,
}

/// Walks back `count` codepoints from `from_byte`.
fn byte_index_before(text: &[u8], from_byte: usize, count: usize) -> usize {
    let mut at = from_byte.min(text.len());
    for _ in 0..count {
        let (_, n) = utf8::decode_last(&text[..at]);
        if n == 0 {
            break;
        }
        at -= n;
    }
    at
}

impl TextEditState {
    /// Creates a state whose cursor and window are computed on first use.
    pub fn new() -> Self { Self::default() }

    /// Cursor position, `None` until it has been computed.
    pub fn cursor(&self) -> Option<usize> { self.cursor }

    /// Selection anchor, if one is set.
    pub fn anchor(&self) -> Option<usize> { self.anchor }

    /// Cached visible window.
    pub fn visible(&self) -> VisibleWindow { self.visible }

    /// Moves the cursor and drops the selection. Out-of-range values are discarded on the next frame.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = Some(cursor);
        self.anchor = None;
        self.visible = VisibleWindow::Dirty;
    }

    /// Selects `length` codepoints from `start`; the cursor ends on the far edge.
    pub fn set_selection(&mut self, start: usize, length: usize) {
        self.anchor = if length == 0 { None } else { Some(start) };
        self.cursor = Some(start + length);
        self.visible = VisibleWindow::Dirty;
    }

    fn anchor_at(&mut self, pos: usize) {
        if self.anchor.is_none() {
            self.anchor = Some(pos);
        }
    }

    /// Drops the selection anchor.
    pub fn clear_selection(&mut self) { self.anchor = None; }

    /// Selection as `(start, length)`, with `length == |cursor - anchor|`.
    pub fn selection(&self) -> Option<(usize, usize)> { self.selection_range().map(|r| (r.start, r.end - r.start)) }

    /// Selected codepoint range, ordered.
    pub fn selection_range(&self) -> Option<Range<usize>> {
        match (self.anchor, self.cursor) {
            (Some(anchor), Some(cursor)) if anchor != cursor => Some(anchor.min(cursor)..anchor.max(cursor)),
            _ => None,
        }
    }

    /// Returns `true` if a non-empty selection exists.
    pub fn has_selection(&self) -> bool { self.selection_range().is_some() }

    /// Forces the visible window to be recomputed.
    pub fn invalidate_visible(&mut self) { self.visible = VisibleWindow::Dirty; }

    fn cursor_or_end(&self, text: &[u8]) -> usize {
        let len = codepoints_until_line_break(text);
        self.cursor.unwrap_or(len).min(len)
    }

    /// Discards positions that no longer fit `text`, e.g. after the host replaced it.
    pub fn validate(&mut self, text: &[u8]) {
        let len = codepoints_until_line_break(text);
        if self.cursor.is_some_and(|c| c > len) {
            trace!(len, "cursor out of range, recomputing");
            self.cursor = None;
            self.anchor = None;
        }
        if self.anchor.is_some_and(|a| a > len) {
            self.anchor = None;
        }
        if let VisibleWindow::Valid { start, start_byte } = self.visible {
            let misaligned = text.get(start_byte).is_some_and(|b| b & 0xc0 == 0x80);
            if start > len || start_byte > text.len() || misaligned {
                self.visible = VisibleWindow::Dirty;
            }
        }
    }

    /// Validates the state and fills in whatever is undefined: an undefined cursor lands after the
    /// last codepoint that fits in `area`, and the visible window is made to contain the cursor.
    pub fn resolve(&mut self, text: &[u8], measure: &MeasureCtx<'_>, area: Recti) {
        self.validate(text);
        if self.cursor.is_none() {
            let cursor = measure.max_fitting(text, area);
            trace!(cursor, "cursor recomputed");
            self.cursor = Some(cursor);
            self.anchor = None;
            self.visible = VisibleWindow::Valid { start: 0, start_byte: 0 };
        }
        self.ensure_visible(text, measure, area);
    }

    /// Shifts the visible window so that the text between its start and the cursor fits in `area`.
    pub fn ensure_visible(&mut self, text: &[u8], measure: &MeasureCtx<'_>, area: Recti) {
        let cursor = self.cursor_or_end(text);
        match self.visible {
            VisibleWindow::Valid { start, start_byte } if cursor >= start => {
                let shown = &text[start_byte.min(text.len())..];
                let m = measure.measure_forward(shown, area, MeasureTarget::Codepoint(cursor - start));
                if m.codepoints == cursor - start {
                    return;
                }
                let cursor_byte = text.len() - shown.len() + byte_index_from_codepoints(shown, 0, cursor - start);
                self.scroll_to(text, cursor, cursor_byte, measure, area);
            }
            VisibleWindow::Valid { start, start_byte } => {
                let start_byte = byte_index_before(text, start_byte, start - cursor);
                trace!(start = cursor, start_byte, "visible window moved left");
                self.visible = VisibleWindow::Valid { start: cursor, start_byte };
            }
            VisibleWindow::Dirty => {
                let cursor_byte = byte_index_from_codepoints(text, 0, cursor);
                self.scroll_to(text, cursor, cursor_byte, measure, area);
            }
        }
    }

    /// Places the window so it ends at the cursor.
    fn scroll_to(&mut self, text: &[u8], cursor: usize, cursor_byte: usize, measure: &MeasureCtx<'_>, area: Recti) {
        let r = measure.measure_reverse(text, cursor_byte, area);
        let start = cursor - r.codepoints;
        trace!(start, start_byte = r.bytes, "visible window recomputed");
        self.visible = VisibleWindow::Valid { start, start_byte: r.bytes };
    }

    /// Left arrow. With `shift` the selection is extended, otherwise an existing selection collapses
    /// to its left edge and the cursor moves one further.
    pub fn move_left(&mut self, text: &[u8], shift: bool) {
        let cursor = self.cursor_or_end(text);
        if shift {
            self.anchor_at(cursor);
            self.cursor = Some(cursor.saturating_sub(1));
            return;
        }
        let from = self.selection_range().map_or(cursor, |r| r.start);
        self.anchor = None;
        self.cursor = Some(from.saturating_sub(1));
    }

    /// Right arrow, mirroring [`TextEditState::move_left`].
    pub fn move_right(&mut self, text: &[u8], shift: bool) {
        let len = codepoints_until_line_break(text);
        let cursor = self.cursor_or_end(text);
        if shift {
            self.anchor_at(cursor);
            self.cursor = Some((cursor + 1).min(len));
            return;
        }
        let from = self.selection_range().map_or(cursor, |r| r.end);
        self.anchor = None;
        self.cursor = Some((from + 1).min(len));
    }

    /// Home key.
    pub fn move_home(&mut self, text: &[u8], shift: bool) {
        let cursor = self.cursor_or_end(text);
        if shift {
            self.anchor_at(cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = Some(0);
    }

    /// End key.
    pub fn move_end(&mut self, text: &[u8], shift: bool) {
        let cursor = self.cursor_or_end(text);
        if shift {
            self.anchor_at(cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = Some(codepoints_until_line_break(text));
    }

    /// Moves the cursor to `cursor` and drops the selection, keeping the visible window.
    pub(crate) fn place(&mut self, cursor: usize) {
        self.cursor = Some(cursor);
        self.anchor = None;
    }

    /// Moves the cursor to `cursor` as a pointer drag would, anchoring the selection at the
    /// position the drag started from.
    pub(crate) fn drag_to(&mut self, cursor: usize) {
        if let Some(prev) = self.cursor {
            self.anchor_at(prev);
        }
        self.cursor = Some(cursor);
    }

    /// Selects the whole first line. Empty text produces no selection.
    pub fn select_all(&mut self, text: &[u8]) {
        let len = codepoints_until_line_break(text);
        if len == 0 {
            self.anchor = None;
            self.cursor = Some(0);
            return;
        }
        self.anchor = Some(0);
        self.cursor = Some(len);
    }

    fn selection_bytes(&self, text: &[u8]) -> Option<Range<usize>> {
        let r = self.selection_range()?;
        let start = byte_index_from_codepoints(text, 0, r.start);
        let end = byte_index_from_codepoints(text, start, r.end - r.start);
        Some(start..end)
    }

    /// Copies the selected text to `clipboard`. Returns `false` when nothing is selected.
    pub fn copy(&self, text: &[u8], clipboard: &mut dyn Clipboard) -> bool {
        let range = match self.selection_bytes(text) {
            Some(range) => range,
            None => return false,
        };
        debug!(bytes = range.len(), "copy");
        clipboard.set_text(&String::from_utf8_lossy(&text[range]));
        true
    }

    /// Copies the selection then deletes it. Returns the bytes removed.
    pub fn cut(&mut self, buf: &mut TextBuffer<'_>, clipboard: &mut dyn Clipboard) -> usize {
        if !self.copy(buf.as_bytes(), clipboard) {
            return 0;
        }
        let removed = self.delete(buf, true);
        debug!(removed, "cut");
        removed
    }

    /// Deletes the selection, or one codepoint before (`before`, Backspace) or after (Delete) the
    /// cursor. Returns the bytes removed.
    pub fn delete(&mut self, buf: &mut TextBuffer<'_>, before: bool) -> usize {
        if let Some(range) = self.selection_bytes(buf.as_bytes()) {
            let lower = self.selection_range().map_or(0, |r| r.start);
            let removed = buf.remove(range);
            self.anchor = None;
            self.cursor = Some(lower);
            self.invalidate_if_left_of_window(lower);
            return removed;
        }
        self.anchor = None;
        let text = buf.as_bytes();
        let cursor = self.cursor_or_end(text);
        if before {
            if cursor == 0 {
                return 0;
            }
            let start = byte_index_from_codepoints(text, 0, cursor - 1);
            let end = byte_index_from_codepoints(text, start, 1);
            let removed = buf.remove(start..end);
            self.cursor = Some(cursor - 1);
            self.invalidate_if_left_of_window(cursor - 1);
            removed
        } else {
            let start = byte_index_from_codepoints(text, 0, cursor);
            let end = byte_index_from_codepoints(text, start, 1);
            self.cursor = Some(cursor);
            buf.remove(start..end)
        }
    }

    /// Bytes an insertion may take once the selection is replaced.
    fn room(&self, buf: &TextBuffer<'_>) -> usize { buf.available() + self.selection_bytes(buf.as_bytes()).map_or(0, |r| r.len()) }

    fn invalidate_if_left_of_window(&mut self, cursor: usize) {
        if let VisibleWindow::Valid { start, .. } = self.visible {
            if cursor < start {
                self.visible = VisibleWindow::Dirty;
            }
        }
    }

    /// Inserts a typed codepoint at the cursor, replacing the selection. Returns `false` if the
    /// encoded codepoint does not fit in the remaining capacity.
    pub fn insert_char(&mut self, buf: &mut TextBuffer<'_>, c: char) -> bool {
        let mut encoded = [0u8; 4];
        let bytes = utf8::encode(c, &mut encoded);
        let room = self.room(buf);
        if bytes.len() > room {
            warn!(available = room, "text buffer full, dropping typed character");
            return false;
        }
        if self.has_selection() {
            self.delete(buf, true);
        }
        let cursor = self.cursor_or_end(buf.as_bytes());
        let at = byte_index_from_codepoints(buf.as_bytes(), 0, cursor);
        buf.insert(at, bytes);
        self.anchor = None;
        self.cursor = Some(cursor + 1);
        true
    }

    /// Replaces the selection with the first line of the clipboard text, truncated to the remaining
    /// capacity. Returns the bytes inserted. An empty clipboard leaves the text untouched.
    pub fn paste(&mut self, buf: &mut TextBuffer<'_>, clipboard: &mut dyn Clipboard) -> usize {
        let pasted = match clipboard.get_text() {
            Some(text) => text,
            None => return 0,
        };
        let line = pasted.split(['\n', '\r']).next().unwrap_or("");
        if line.is_empty() {
            return 0;
        }
        let room = self.room(buf);
        let fitted = truncate_str(line, room);
        if fitted.len() < line.len() {
            warn!(wanted = line.len(), available = room, "paste truncated to buffer capacity");
        }
        if fitted.is_empty() {
            return 0;
        }
        if self.has_selection() {
            self.delete(buf, true);
        }
        let cursor = self.cursor_or_end(buf.as_bytes());
        let at = byte_index_from_codepoints(buf.as_bytes(), 0, cursor);
        let inserted = buf.insert(at, fitted.as_bytes());
        self.anchor = None;
        self.cursor = Some(cursor + utf8::codepoint_count(&fitted.as_bytes()[..inserted]));
        self.visible = VisibleWindow::Dirty;
        debug!(inserted, "paste");
        inserted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rect, MemoryClipboard, MonospaceMetrics};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn storage(text: &str, capacity: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; capacity];
        bytes[..text.len()].copy_from_slice(text.as_bytes());
        bytes
    }

    fn state_at(cursor: usize) -> TextEditState {
        let mut state = TextEditState::new();
        state.set_cursor(cursor);
        state
    }

    #[test]
    fn backspace_at_end() {
        let mut bytes = storage("Hello", 16);
        let mut buf = TextBuffer::new(&mut bytes).unwrap();
        let mut state = state_at(5);
        assert_eq!(state.delete(&mut buf, true), 1);
        assert_eq!(buf.as_bytes(), b"Hell");
        assert_eq!(state.cursor(), Some(4));
    }

    #[test]
    fn typing_replaces_full_selection() {
        let mut bytes = storage("Hello", 16);
        let mut buf = TextBuffer::new(&mut bytes).unwrap();
        let mut state = TextEditState::new();
        state.select_all(buf.as_bytes());
        assert_eq!(state.selection(), Some((0, 5)));
        assert!(state.insert_char(&mut buf, 'X'));
        assert_eq!(buf.as_bytes(), b"X");
        assert_eq!(state.cursor(), Some(1));
        assert!(!state.has_selection());
    }

    #[test]
    fn paste_into_empty_buffer() {
        let mut bytes = vec![0u8; 10];
        let mut buf = TextBuffer::new(&mut bytes).unwrap();
        let mut clipboard = MemoryClipboard::with_text("Hi");
        let mut state = TextEditState::new();
        assert_eq!(state.paste(&mut buf, &mut clipboard), 2);
        assert_eq!(buf.as_bytes(), b"Hi");
        assert_eq!(state.cursor(), Some(2));
        assert_eq!(state.visible(), VisibleWindow::Dirty);
    }

    #[test]
    fn delete_forward_multibyte() {
        let mut bytes = storage("日本語", 16);
        let mut buf = TextBuffer::new(&mut bytes).unwrap();
        let mut state = state_at(1);
        assert_eq!(state.delete(&mut buf, false), 3);
        assert_eq!(buf.to_string_lossy(), "日語");
        assert_eq!(state.cursor(), Some(1));
    }

    #[test]
    fn delete_at_edges_is_noop() {
        let mut bytes = storage("ab", 8);
        let mut buf = TextBuffer::new(&mut bytes).unwrap();
        let mut state = state_at(0);
        assert_eq!(state.delete(&mut buf, true), 0);
        state.set_cursor(2);
        assert_eq!(state.delete(&mut buf, false), 0);
        assert_eq!(buf.as_bytes(), b"ab");
    }

    #[test]
    fn delete_removes_selection_regardless_of_direction() {
        let mut bytes = storage("héllo wörld", 32);
        let mut buf = TextBuffer::new(&mut bytes).unwrap();
        let mut state = TextEditState::new();
        state.set_cursor(9);
        state.move_left(buf.as_bytes(), true);
        state.move_left(buf.as_bytes(), true);
        state.move_left(buf.as_bytes(), true);
        assert_eq!(state.selection(), Some((6, 3)));
        assert_eq!(state.delete(&mut buf, false), 4);
        assert_eq!(buf.to_string_lossy(), "héllo ld");
        assert_eq!(state.cursor(), Some(6));
        assert_eq!(state.anchor(), None);
    }

    #[test]
    fn select_all_on_empty_text_selects_nothing() {
        let mut state = TextEditState::new();
        state.select_all(b"");
        assert_eq!(state.selection(), None);
        assert_eq!(state.cursor(), Some(0));
    }

    #[test]
    fn copy_and_cut_need_a_selection() {
        let mut bytes = storage("abc", 8);
        let mut buf = TextBuffer::new(&mut bytes).unwrap();
        let mut clipboard = MemoryClipboard::default();
        let mut state = state_at(1);
        assert!(!state.copy(buf.as_bytes(), &mut clipboard));
        assert_eq!(state.cut(&mut buf, &mut clipboard), 0);
        assert_eq!(clipboard.text(), None);
        assert_eq!(buf.as_bytes(), b"abc");
    }

    #[test]
    fn cut_copies_before_deleting() {
        let mut bytes = storage("日本語", 16);
        let mut buf = TextBuffer::new(&mut bytes).unwrap();
        let mut clipboard = MemoryClipboard::default();
        let mut state = TextEditState::new();
        state.set_selection(1, 2);
        assert_eq!(state.cut(&mut buf, &mut clipboard), 6);
        assert_eq!(clipboard.text(), Some("本語"));
        assert_eq!(buf.to_string_lossy(), "日");
        assert_eq!(state.cursor(), Some(1));
    }

    #[test]
    fn copy_then_paste_reproduces_selection() {
        let mut src = storage("añb😀c", 32);
        let src_buf = TextBuffer::new(&mut src).unwrap();
        let mut clipboard = MemoryClipboard::default();
        let mut state = TextEditState::new();
        state.set_selection(1, 3);
        assert!(state.copy(src_buf.as_bytes(), &mut clipboard));

        let mut dst = vec![0u8; 32];
        let mut dst_buf = TextBuffer::new(&mut dst).unwrap();
        let mut target = TextEditState::new();
        target.paste(&mut dst_buf, &mut clipboard);
        assert_eq!(dst_buf.as_bytes(), "ñb😀".as_bytes());
        assert_eq!(target.cursor(), Some(3));
    }

    #[test]
    fn paste_truncates_to_capacity_and_first_line() {
        let mut bytes = storage("ab", 6);
        let mut buf = TextBuffer::new(&mut bytes).unwrap();
        let mut clipboard = MemoryClipboard::with_text("日本\nzzz");
        let mut state = state_at(1);
        assert_eq!(state.paste(&mut buf, &mut clipboard), 3);
        assert_eq!(buf.to_string_lossy(), "a日b");
        assert_eq!(state.cursor(), Some(2));

        let mut clipboard = MemoryClipboard::with_text("\nnext");
        assert_eq!(state.paste(&mut buf, &mut clipboard), 0);
    }

    #[test]
    fn paste_with_empty_clipboard_keeps_selection() {
        let mut bytes = storage("abc", 8);
        let mut buf = TextBuffer::new(&mut bytes).unwrap();
        let mut clipboard = MemoryClipboard::default();
        let mut state = TextEditState::new();
        state.select_all(buf.as_bytes());
        assert_eq!(state.paste(&mut buf, &mut clipboard), 0);
        assert_eq!(buf.as_bytes(), b"abc");
        assert_eq!(state.selection(), Some((0, 3)));
    }

    #[test]
    fn insert_refuses_partial_codepoint() {
        let mut bytes = storage("abc", 6);
        let mut buf = TextBuffer::new(&mut bytes).unwrap();
        let mut state = state_at(3);
        assert!(!state.insert_char(&mut buf, '語'));
        assert!(state.insert_char(&mut buf, 'é'));
        assert_eq!(buf.to_string_lossy(), "abcé");
        assert!(!state.insert_char(&mut buf, 'x'));
    }

    #[test]
    fn oversized_replacement_leaves_selection_in_place() {
        let mut bytes = storage("abc", 4);
        let mut buf = TextBuffer::new(&mut bytes).unwrap();
        let mut state = TextEditState::new();
        state.set_selection(2, 1);
        assert!(!state.insert_char(&mut buf, '😀'));
        assert_eq!(buf.to_string_lossy(), "abc");
        assert_eq!(state.selection(), Some((2, 1)));

        let mut clipboard = MemoryClipboard::with_text("😀");
        assert_eq!(state.paste(&mut buf, &mut clipboard), 0);
        assert_eq!(buf.to_string_lossy(), "abc");
        assert_eq!(state.selection(), Some((2, 1)));
    }

    #[test]
    fn copy_replaces_malformed_bytes() {
        let text = b"a\xffb";
        let mut state = TextEditState::new();
        state.set_selection(0, 3);
        let mut clipboard = MemoryClipboard::default();
        assert!(state.copy(text, &mut clipboard));
        assert_eq!(clipboard.text(), Some("a\u{fffd}b"));
    }

    #[test]
    fn replacement_may_use_the_bytes_it_frees() {
        let mut bytes = storage("abé", 5);
        let mut buf = TextBuffer::new(&mut bytes).unwrap();
        let mut state = TextEditState::new();
        state.set_selection(1, 2);
        assert!(state.insert_char(&mut buf, '語'));
        assert_eq!(buf.to_string_lossy(), "a語");
        assert_eq!(state.cursor(), Some(2));

        state.set_selection(1, 1);
        let mut clipboard = MemoryClipboard::with_text("xyzw");
        assert_eq!(state.paste(&mut buf, &mut clipboard), 3);
        assert_eq!(buf.to_string_lossy(), "axyz");
    }

    #[test]
    fn arrows_collapse_selection_then_move() {
        let text = b"abcdef";
        let mut state = TextEditState::new();
        state.set_selection(2, 2);
        state.move_left(text, false);
        assert_eq!((state.cursor(), state.anchor()), (Some(1), None));

        state.set_selection(2, 2);
        state.move_right(text, false);
        assert_eq!((state.cursor(), state.anchor()), (Some(5), None));

        state.move_right(text, true);
        state.move_right(text, true);
        assert_eq!((state.cursor(), state.anchor()), (Some(6), Some(5)));
        state.move_left(text, true);
        state.move_left(text, true);
        assert_eq!(state.selection(), Some((4, 1)));
    }

    #[test]
    fn home_end_extend_or_clear() {
        let text = "日本語".as_bytes();
        let mut state = state_at(1);
        state.move_end(text, true);
        assert_eq!(state.selection(), Some((1, 2)));
        state.move_home(text, true);
        assert_eq!(state.selection(), Some((0, 1)));
        state.move_end(text, false);
        assert_eq!((state.cursor(), state.anchor()), (Some(3), None));
    }

    #[test]
    fn out_of_range_positions_are_discarded() {
        let mut state = TextEditState::new();
        state.set_selection(2, 8);
        state.validate(b"abc");
        assert_eq!(state.cursor(), None);
        assert_eq!(state.anchor(), None);

        let mut state = TextEditState::new();
        state.set_cursor(1);
        state.anchor = Some(9);
        state.visible = VisibleWindow::Valid { start: 1, start_byte: 1 };
        state.validate("日本".as_bytes());
        assert_eq!(state.cursor(), Some(1));
        assert_eq!(state.anchor(), None);
        assert_eq!(state.visible(), VisibleWindow::Dirty);
    }

    #[test]
    fn undefined_cursor_resolves_to_last_fitting_codepoint() {
        let m = MonospaceMetrics::new(10, 16);
        let measure = MeasureCtx::new(&m, 0);
        let mut state = TextEditState::new();
        state.resolve(b"abcdefghij", &measure, rect(0, 0, 45, 20));
        assert_eq!(state.cursor(), Some(4));
        assert_eq!(state.visible(), VisibleWindow::Valid { start: 0, start_byte: 0 });
    }

    #[test]
    fn window_follows_cursor_both_ways() {
        let m = MonospaceMetrics::new(10, 16);
        let measure = MeasureCtx::new(&m, 0);
        let area = rect(0, 0, 45, 20);
        let text = "日本語abcdef".as_bytes();
        let mut state = TextEditState::new();
        state.set_cursor(9);
        state.resolve(text, &measure, area);
        assert_eq!(state.visible(), VisibleWindow::Valid { start: 5, start_byte: 11 });

        state.move_home(text, false);
        state.ensure_visible(text, &measure, area);
        assert_eq!(state.visible(), VisibleWindow::Valid { start: 0, start_byte: 0 });

        state.set_cursor(2);
        state.visible = VisibleWindow::Valid { start: 4, start_byte: 10 };
        state.ensure_visible(text, &measure, area);
        assert_eq!(state.visible(), VisibleWindow::Valid { start: 2, start_byte: 6 });
    }

    fn random_text(rng: &mut StdRng) -> String {
        const ALPHABET: [char; 8] = ['a', 'b', 'é', 'ß', '日', '語', '😀', ' '];
        let n = rng.random_range(0..12);
        (0..n).map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())]).collect()
    }

    #[test]
    fn codepoint_byte_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let text = random_text(&mut rng);
            let count = text.chars().count();
            for i in 0..=count {
                let byte = byte_index_from_codepoints(text.as_bytes(), 0, i);
                assert_eq!(utf8::codepoint_count(&text.as_bytes()[..byte]), i);
            }
        }
    }

    #[test]
    fn insertion_is_monotonic_and_backspace_inverts_it() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let text = random_text(&mut rng);
            let count = text.chars().count();
            let cursor = rng.random_range(0..=count);
            let mut bytes = storage(&text, text.len() + 8);
            let mut buf = TextBuffer::new(&mut bytes).unwrap();
            let mut state = state_at(cursor);

            assert!(state.insert_char(&mut buf, 'ü'));
            assert_eq!(codepoints_until_line_break(buf.as_bytes()), count + 1);
            assert_eq!(state.cursor(), Some(cursor + 1));

            assert_eq!(state.delete(&mut buf, true), 'ü'.len_utf8());
            assert_eq!(buf.as_bytes(), text.as_bytes());
            assert_eq!(state.cursor(), Some(cursor));
        }
    }

    #[test]
    fn backspace_then_retype_restores_text() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..200 {
            let text = random_text(&mut rng);
            let count = text.chars().count();
            if count == 0 {
                continue;
            }
            let cursor = rng.random_range(1..=count);
            let removed = text.chars().nth(cursor - 1).unwrap();
            let mut bytes = storage(&text, text.len() + 1);
            let mut buf = TextBuffer::new(&mut bytes).unwrap();
            let mut state = state_at(cursor);
            state.delete(&mut buf, true);
            assert!(state.insert_char(&mut buf, removed));
            assert_eq!(buf.as_bytes(), text.as_bytes());
        }
    }

    #[test]
    fn shift_navigation_keeps_selection_consistent() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..200 {
            let text = random_text(&mut rng);
            let len = text.chars().count();
            let mut state = state_at(rng.random_range(0..=len));
            for _ in 0..20 {
                match rng.random_range(0..4) {
                    0 => state.move_left(text.as_bytes(), true),
                    1 => state.move_right(text.as_bytes(), true),
                    2 => state.move_home(text.as_bytes(), true),
                    _ => state.move_end(text.as_bytes(), true),
                }
                let cursor = state.cursor().unwrap();
                assert!(cursor <= len);
                if let Some((start, length)) = state.selection() {
                    let anchor = state.anchor().unwrap();
                    assert_eq!(length, cursor.abs_diff(anchor));
                    assert_eq!(start, cursor.min(anchor));
                }
            }
        }
    }

    fn assert_cursor_visible(state: &TextEditState, text: &[u8], measure: &MeasureCtx<'_>, area: Recti) {
        let cursor = state.cursor().unwrap();
        let (start, start_byte) = match state.visible() {
            VisibleWindow::Valid { start, start_byte } => (start, start_byte),
            VisibleWindow::Dirty => panic!("window left dirty"),
        };
        assert!(start <= cursor);
        assert_eq!(start_byte, byte_index_from_codepoints(text, 0, start));
        let m = measure.measure_forward(&text[start_byte..], area, MeasureTarget::Codepoint(cursor - start));
        assert_eq!(m.codepoints, cursor - start);
        assert!(m.x - area.x < area.width);
    }

    #[test]
    fn visible_window_always_contains_cursor() {
        const TYPED: [char; 5] = ['x', 'é', '日', '😀', ' '];
        let m = MonospaceMetrics::new(7, 12);
        let measure = MeasureCtx::new(&m, 1);
        let area = rect(3, 0, 40, 20);
        let mut rng = StdRng::seed_from_u64(19);
        for _ in 0..100 {
            let text = random_text(&mut rng);
            let mut bytes = storage(&text, 32);
            let mut buf = TextBuffer::new(&mut bytes).unwrap();
            let mut clipboard = MemoryClipboard::with_text(random_text(&mut rng));
            let mut state = TextEditState::new();
            for _ in 0..40 {
                let shift = rng.random_bool(0.3);
                match rng.random_range(0..11) {
                    0 => state.move_left(buf.as_bytes(), shift),
                    1 => state.move_right(buf.as_bytes(), shift),
                    2 => state.move_home(buf.as_bytes(), shift),
                    3 => state.move_end(buf.as_bytes(), shift),
                    4 => {
                        state.insert_char(&mut buf, TYPED[rng.random_range(0..TYPED.len())]);
                    }
                    5 => {
                        state.delete(&mut buf, true);
                    }
                    6 => {
                        state.delete(&mut buf, false);
                    }
                    7 => {
                        state.paste(&mut buf, &mut clipboard);
                    }
                    8 => {
                        state.cut(&mut buf, &mut clipboard);
                    }
                    9 => {
                        state.copy(buf.as_bytes(), &mut clipboard);
                    }
                    _ => state.select_all(buf.as_bytes()),
                }
                state.resolve(buf.as_bytes(), &measure, area);
                assert_cursor_visible(&state, buf.as_bytes(), &measure, area);
                assert!(buf.len() < buf.capacity());
            }
        }
    }
}
