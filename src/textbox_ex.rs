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

use tracing::debug;

use crate::buffer::truncate_str;
use crate::draw_context::DrawCtx;
use crate::text_measure::{MeasureCtx, MeasureTarget};
use crate::utf8::Codepoints;
use crate::*;

/// Host collaborators borrowed for one call of the text box.
pub struct FrameCtx<'a> {
    /// Input collected this frame.
    pub input: &'a InputSnapshot,
    /// Glyph metrics of the font the host draws with.
    pub metrics: &'a dyn TextMeasure,
    /// Clipboard used by the copy, cut and paste shortcuts.
    pub clipboard: &'a mut dyn Clipboard,
    /// Style the control is drawn with.
    pub style: &'a Style,
    /// Draw list the control appends to.
    pub commands: &'a mut Vec<Command>,
}

impl<'a> FrameCtx<'a> {
    /// Bundles the collaborators for one call.
    pub fn new(
        input: &'a InputSnapshot,
        metrics: &'a dyn TextMeasure,
        clipboard: &'a mut dyn Clipboard,
        style: &'a Style,
        commands: &'a mut Vec<Command>,
    ) -> Self {
        Self { input, metrics, clipboard, style, commands }
    }
}

#[derive(Clone, Debug, Default)]
/// The edit session shared by every text box of a UI.
///
/// At most one control is active at a time: activating a control resets the session, so whichever
/// control claimed it last owns the cursor, selection and scroll position.
pub struct TextEditContext {
    active: Option<Id>,
    state: TextEditState,
    frames: u32,
}

impl TextEditContext {
    /// Creates a session with no active control.
    pub fn new() -> Self { Self::default() }

    /// The control currently being edited.
    pub fn active(&self) -> Option<Id> { self.active }

    /// Returns `true` if `id` owns the session.
    pub fn is_active(&self, id: Id) -> bool { self.active == Some(id) }

    /// Hands the session to `id`, discarding the previous control's cursor and selection.
    pub fn set_active(&mut self, id: Id) {
        if let Some(prev) = self.active {
            if prev != id {
                debug!(prev = prev.raw(), "text box lost the edit session");
            }
        }
        debug!(id = id.raw(), "text box activated");
        self.active = Some(id);
        self.state = TextEditState::new();
        self.frames = 0;
    }

    /// Ends the session.
    pub fn deactivate(&mut self) {
        if let Some(id) = self.active.take() {
            debug!(id = id.raw(), "text box deactivated");
        }
        self.state = TextEditState::new();
        self.frames = 0;
    }

    /// Cursor and selection state of the active control.
    pub fn state(&self) -> &TextEditState { &self.state }

    /// Replaces the session state, e.g. to restore a saved one.
    pub fn set_state(&mut self, state: TextEditState) { self.state = state; }

    /// Cursor of the active control.
    pub fn cursor(&self) -> Option<usize> { self.state.cursor() }

    /// Moves the cursor of the active control.
    pub fn set_cursor(&mut self, cursor: usize) { self.state.set_cursor(cursor); }

    /// Selection of the active control as `(start, length)`.
    pub fn selection(&self) -> Option<(usize, usize)> { self.state.selection() }

    /// Selects `length` codepoints from `start` in the active control.
    pub fn set_selection(&mut self, start: usize, length: usize) { self.state.set_selection(start, length); }

    /// Selects the first line of `text`.
    pub fn select_all(&mut self, text: &[u8]) { self.state.select_all(text); }

    /// Copies the selection of `text` to `clipboard`.
    pub fn copy(&self, text: &[u8], clipboard: &mut dyn Clipboard) -> bool { self.state.copy(text, clipboard) }

    /// Moves the selection of `buf` to `clipboard`. Returns the bytes removed.
    pub fn cut(&mut self, buf: &mut TextBuffer<'_>, clipboard: &mut dyn Clipboard) -> usize { self.state.cut(buf, clipboard) }

    /// Inserts the clipboard text at the cursor. Returns the bytes inserted.
    pub fn paste(&mut self, buf: &mut TextBuffer<'_>, clipboard: &mut dyn Clipboard) -> usize { self.state.paste(buf, clipboard) }

    /// Deletes the selection or one codepoint around the cursor. Returns the bytes removed.
    pub fn delete(&mut self, buf: &mut TextBuffer<'_>, before: bool) -> usize { self.state.delete(buf, before) }

    /// Runs one frame of the text box identified by `id` and returns `true` when the user finished
    /// editing (Enter, or a click outside the control). The caller is expected to leave edit mode
    /// then.
    pub fn text_box_ex(&mut self, frame: &mut FrameCtx<'_>, id: Id, bounds: Recti, bytes: &mut [u8], edit_mode: bool) -> bool {
        self.text_box_ex_opt(frame, id, bounds, bytes, edit_mode, WidgetOption::NONE).is_submitted()
    }

    /// [`TextEditContext::text_box_ex`] with widget options, reporting the full interaction state.
    pub fn text_box_ex_opt(
        &mut self,
        frame: &mut FrameCtx<'_>,
        id: Id,
        bounds: Recti,
        bytes: &mut [u8],
        edit_mode: bool,
        opt: WidgetOption,
    ) -> ResourceState {
        let mut buf = match TextBuffer::new(bytes) {
            Ok(buf) => buf,
            Err(_) => return ResourceState::NONE,
        };
        let input = frame.input;
        let measure = MeasureCtx::new(frame.metrics, frame.style.text_spacing);
        let area = expand_rect(bounds, -(frame.style.border_width + frame.style.inner_padding));
        let mouse_in = rect_contains(bounds, input.mouse_pos);

        if opt.is_not_interactive() || !edit_mode {
            if self.is_active(id) {
                self.deactivate();
            }
        } else if !self.is_active(id) {
            if mouse_in && (input.mouse_pressed.is_left() || input.mouse_pressed.is_right()) {
                self.set_active(id);
                self.state.set_cursor(0);
                self.state.ensure_visible(buf.as_bytes(), &measure, area);
            }
        } else if input.mouse_pressed.is_right() && !mouse_in {
            self.deactivate();
        }

        let mut res = ResourceState::NONE;
        if self.is_active(id) {
            res = self.update(frame, &mut buf, &measure, area, mouse_in);
            if self.is_active(id) {
                res |= ResourceState::ACTIVE;
            }
        }

        let state = if opt.is_not_interactive() {
            GuiState::Disabled
        } else if self.is_active(id) {
            GuiState::Pressed
        } else if mouse_in {
            GuiState::Focused
        } else {
            GuiState::Normal
        };
        self.draw(frame, &buf, &measure, bounds, area, state, opt);
        res
    }

    /// Applies this frame's input to the active control.
    fn update(&mut self, frame: &mut FrameCtx<'_>, buf: &mut TextBuffer<'_>, measure: &MeasureCtx<'_>, area: Recti, mouse_in: bool) -> ResourceState {
        let input = frame.input;
        self.frames = self.frames.wrapping_add(1);
        self.state.resolve(buf.as_bytes(), measure, area);
        let before = (self.state.cursor(), self.state.anchor());
        let mut changed = false;
        let mut submit = false;

        let shift = input.key_mods.is_shift();
        if input.mouse_pressed.is_left() {
            if mouse_in {
                let pos = self.cursor_at_x(buf.as_bytes(), measure, area, input.mouse_pos.x);
                if shift {
                    self.state.drag_to(pos);
                } else {
                    self.state.place(pos);
                }
                self.state.dragging = true;
            } else {
                submit = true;
            }
        } else if input.mouse_down.is_left() && self.state.dragging {
            let x = input.mouse_pos.x;
            if x < area.x {
                self.state.move_left(buf.as_bytes(), true);
            } else if x >= area.x + area.width {
                self.state.move_right(buf.as_bytes(), true);
            } else {
                let pos = self.cursor_at_x(buf.as_bytes(), measure, area, x);
                if Some(pos) != self.state.cursor() {
                    self.state.drag_to(pos);
                }
            }
        }
        if !input.mouse_down.is_left() {
            self.state.dragging = false;
        }

        let keys = input.key_code_pressed;
        let ctrl = input.key_mods.is_ctrl();
        if ctrl {
            if keys.contains(KeyCode::A) {
                self.state.select_all(buf.as_bytes());
            }
            if keys.contains(KeyCode::C) {
                self.state.copy(buf.as_bytes(), &mut *frame.clipboard);
            }
            if keys.contains(KeyCode::X) && self.state.cut(buf, &mut *frame.clipboard) > 0 {
                changed = true;
            }
            if keys.contains(KeyCode::V) && self.state.paste(buf, &mut *frame.clipboard) > 0 {
                changed = true;
            }
        }

        if keys.is_left() {
            self.state.move_left(buf.as_bytes(), shift);
        }
        if keys.is_right() {
            self.state.move_right(buf.as_bytes(), shift);
        }
        if keys.is_home() {
            self.state.move_home(buf.as_bytes(), shift);
        }
        if keys.is_end() {
            self.state.move_end(buf.as_bytes(), shift);
        }
        if keys.is_backspace() && self.state.delete(buf, true) > 0 {
            changed = true;
        }
        if keys.is_delete() && self.state.delete(buf, false) > 0 {
            changed = true;
        }

        if !ctrl {
            for c in input.text_input.chars() {
                if c < ' ' || c == '\u{7f}' {
                    continue;
                }
                if self.state.insert_char(buf, c) {
                    changed = true;
                }
            }
        }

        if keys.is_return() {
            submit = true;
        }

        self.state.ensure_visible(buf.as_bytes(), measure, area);

        if changed || before != (self.state.cursor(), self.state.anchor()) {
            self.frames = 0;
        }
        let mut res = ResourceState::NONE;
        if changed {
            res |= ResourceState::CHANGE;
        }
        if submit {
            debug!(len = buf.len(), "text box submitted");
            self.frames = 0;
            res |= ResourceState::SUBMIT;
        }
        res
    }

    /// Codepoint index under pixel column `x`, relative to the visible window.
    fn cursor_at_x(&self, text: &[u8], measure: &MeasureCtx<'_>, area: Recti, x: i32) -> usize {
        let (start, start_byte) = self.window();
        let shown = &text[start_byte.min(text.len())..];
        start + measure.measure_forward(shown, area, MeasureTarget::MouseX(x)).codepoints
    }

    fn window(&self) -> (usize, usize) {
        match self.state.visible() {
            VisibleWindow::Valid { start, start_byte } => (start, start_byte),
            VisibleWindow::Dirty => (0, 0),
        }
    }

    fn cursor_visible(&self, style: &Style) -> bool { style.blink_frames == 0 || (self.frames / style.blink_frames) % 2 == 0 }

    fn draw(&self, frame: &mut FrameCtx<'_>, buf: &TextBuffer<'_>, measure: &MeasureCtx<'_>, bounds: Recti, area: Recti, state: GuiState, opt: WidgetOption) {
        let style = frame.style;
        let active = state == GuiState::Pressed;
        let mut draw = DrawCtx::new(&mut *frame.commands, style);
        if !opt.has_no_frame() {
            draw.draw_frame(bounds, state);
        }

        let text = buf.as_bytes();
        let (start, start_byte) = if active { self.window() } else { (0, 0) };
        let shown = &text[start_byte.min(text.len())..];
        let fit = measure.measure_forward(shown, area, MeasureTarget::Fit);
        let drawn: String = Codepoints::new(&shown[..fit.bytes]).map(|(_, c, _)| c.unwrap_or(char::REPLACEMENT_CHARACTER)).collect();

        let line_height = measure.line_height();
        let y = area.y + (area.height - line_height) / 2;
        let selection = if active { self.state.selection_range() } else { None };
        let highlight = selection.as_ref().and_then(|r| {
            let lo = r.start.max(start);
            let hi = r.end.min(start + fit.codepoints);
            (hi > lo).then(|| TextSelection {
                start: lo - start,
                len: hi - lo,
                fg: style.color(ControlColor::SelectedText),
                bg: style.color(ControlColor::SelectedBase),
            })
        });

        draw.push_clip_rect(area);
        draw.draw_text(&drawn, vec2(area.x, y), area, style.color(state.text()), highlight);
        if active && selection.is_none() && self.cursor_visible(style) {
            let cursor = self.state.cursor().unwrap_or(start);
            let x = measure.measure_forward(shown, area, MeasureTarget::Codepoint(cursor.saturating_sub(start))).x;
            draw.draw_rect(rect(x, y, 1, line_height), style.color(state.border()));
        }
        draw.pop_clip_rect();
    }
}

#[derive(Clone, Debug)]
/// Persistent text box owning its fixed-capacity buffer and edit mode.
pub struct TextBoxEx {
    /// Widget options applied to the text box.
    pub opt: WidgetOption,
    /// Whether the text box currently wants to be edited.
    pub edit_mode: bool,
    id: Id,
    buf: Vec<u8>,
}

impl TextBoxEx {
    /// Creates a text box holding at most `capacity - 1` bytes of `text`.
    pub fn new(id: Id, text: &str, capacity: usize) -> Self {
        let mut buf = vec![0u8; capacity.max(1)];
        let text = truncate_str(text, buf.len() - 1);
        buf[..text.len()].copy_from_slice(text.as_bytes());
        Self { opt: WidgetOption::NONE, edit_mode: false, id, buf }
    }

    /// Returns a copy of the text box with widget options applied.
    pub fn with_opt(mut self, opt: WidgetOption) -> Self {
        self.opt = opt;
        self
    }

    /// Identifier of the text box.
    pub fn id(&self) -> Id { self.id }

    /// Size of the buffer, terminator included.
    pub fn capacity(&self) -> usize { self.buf.len() }

    /// Current text.
    pub fn text(&self) -> Cow<'_, str> {
        let len = self.buf.iter().position(|b| *b == 0).unwrap_or(self.buf.len());
        String::from_utf8_lossy(&self.buf[..len])
    }

    /// Replaces the text, truncated to the capacity.
    pub fn set_text(&mut self, text: &str) {
        if let Ok(mut buf) = TextBuffer::new(&mut self.buf) {
            buf.set(text);
        }
    }

    /// Runs one frame: a click inside enters edit mode, submitting leaves it.
    pub fn update(&mut self, ctx: &mut TextEditContext, frame: &mut FrameCtx<'_>, bounds: Recti) -> ResourceState {
        let input = frame.input;
        if !self.edit_mode && !self.opt.is_not_interactive() && input.mouse_pressed.is_left() && rect_contains(bounds, input.mouse_pos) {
            self.edit_mode = true;
        }
        let res = ctx.text_box_ex_opt(frame, self.id, bounds, &mut self.buf, self.edit_mode, self.opt);
        if res.is_submitted() {
            self.edit_mode = false;
        } else if !ctx.is_active(self.id) && self.edit_mode && input.mouse_pressed.is_right() && !rect_contains(bounds, input.mouse_pos) {
            self.edit_mode = false;
        }
        res
    }
}
