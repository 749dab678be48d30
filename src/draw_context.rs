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
use crate::*;

const UNCLIPPED_RECT: Recti = Recti {
    x: 0,
    y: 0,
    width: i32::MAX,
    height: i32::MAX,
};

#[derive(PartialEq, Copy, Clone, Debug)]
/// Describes whether a rectangle is clipped by the current clip rectangle.
pub(crate) enum Clip {
    /// Rectangle is fully visible.
    None,
    /// Rectangle is partially visible.
    Part,
    /// Rectangle is fully clipped away.
    All,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Highlighted range of a [`Command::Text`], in codepoints relative to the drawn text.
pub struct TextSelection {
    /// First highlighted codepoint.
    pub start: usize,
    /// Number of highlighted codepoints.
    pub len: usize,
    /// Foreground of highlighted glyphs.
    pub fg: Color,
    /// Background behind highlighted glyphs.
    pub bg: Color,
}

#[derive(Clone)]
/// Draw primitive emitted by the text box for the host renderer.
pub enum Command {
    /// Restricts subsequent commands to `rect`.
    Clip {
        /// Rect to clip against.
        rect: Recti,
    },
    /// Draws a solid rectangle.
    Rect {
        /// Target rectangle.
        rect: Recti,
        /// Fill color.
        color: Color,
    },
    /// Draws a run of text, optionally with a highlighted range.
    Text {
        /// Area the text is laid out in.
        rect: Recti,
        /// Top-left position of the first glyph.
        pos: Vec2i,
        /// UTF-8 string to render.
        text: String,
        /// Text color.
        color: Color,
        /// Highlighted sub-range, if any.
        selection: Option<TextSelection>,
    },
}

/// Command recorder with a clip stack, borrowed for one control.
pub(crate) struct DrawCtx<'a> {
    commands: &'a mut Vec<Command>,
    clip_stack: Vec<Recti>,
    style: &'a Style,
}

impl<'a> DrawCtx<'a> {
    pub(crate) fn new(commands: &'a mut Vec<Command>, style: &'a Style) -> Self { Self { commands, clip_stack: Vec::new(), style } }

    pub(crate) fn current_clip_rect(&self) -> Recti { self.clip_stack.last().copied().unwrap_or(UNCLIPPED_RECT) }

    pub(crate) fn push_clip_rect(&mut self, rect: Recti) {
        let last = self.current_clip_rect();
        self.clip_stack.push(rect.intersect(&last).unwrap_or_default());
    }

    pub(crate) fn pop_clip_rect(&mut self) { self.clip_stack.pop(); }

    fn push_command(&mut self, cmd: Command) { self.commands.push(cmd); }

    pub(crate) fn check_clip(&self, r: Recti) -> Clip {
        let cr = self.current_clip_rect();
        if r.x >= cr.x.saturating_add(cr.width) || r.x + r.width <= cr.x || r.y >= cr.y.saturating_add(cr.height) || r.y + r.height <= cr.y {
            return Clip::All;
        }
        if r.x >= cr.x && r.x + r.width <= cr.x.saturating_add(cr.width) && r.y >= cr.y && r.y + r.height <= cr.y.saturating_add(cr.height) {
            return Clip::None;
        }
        Clip::Part
    }

    pub(crate) fn draw_rect(&mut self, rect: Recti, color: Color) {
        if rect.width <= 0 || rect.height <= 0 {
            return;
        }
        let rect = rect.intersect(&self.current_clip_rect()).unwrap_or_default();
        if rect.width > 0 && rect.height > 0 {
            self.push_command(Command::Rect { rect, color });
        }
    }

    /// Outline of `width` pixels drawn inside `r`.
    pub(crate) fn draw_box(&mut self, r: Recti, width: i32, color: Color) {
        if width <= 0 {
            return;
        }
        self.draw_rect(rect(r.x, r.y, r.width, width), color);
        self.draw_rect(rect(r.x, r.y + r.height - width, r.width, width), color);
        self.draw_rect(rect(r.x, r.y + width, width, r.height - width * 2), color);
        self.draw_rect(rect(r.x + r.width - width, r.y + width, width, r.height - width * 2), color);
    }

    /// Border plus background in the palette of `state`.
    pub(crate) fn draw_frame(&mut self, r: Recti, state: GuiState) {
        let border = self.style.border_width;
        self.draw_box(r, border, self.style.color(state.border()));
        self.draw_rect(expand_rect(r, -border), self.style.color(state.base()));
    }

    pub(crate) fn draw_text(&mut self, text: &str, pos: Vec2i, area: Recti, color: Color, selection: Option<TextSelection>) {
        if text.is_empty() {
            return;
        }
        let clipped = self.check_clip(area);
        match clipped {
            Clip::All => return,
            Clip::Part => {
                let clip = self.current_clip_rect();
                self.push_command(Command::Clip { rect: clip })
            }
            Clip::None => (),
        }
        self.push_command(Command::Text {
            rect: area,
            pos,
            text: String::from(text),
            color,
            selection,
        });
        if clipped != Clip::None {
            self.push_command(Command::Clip { rect: UNCLIPPED_RECT });
        }
    }
}
