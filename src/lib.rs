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
#![deny(missing_docs)]
//! `textbox-redux` provides an immediate-mode, single-line "extended" text box: UTF-8 aware cursor
//! navigation, mouse and keyboard selection, cut/copy/paste and a scrolling visible window, editing a
//! fixed-capacity NUL-terminated byte buffer owned by the host.
//!
//! The crate does not render or poll input by itself. Each frame the host fills an [`InputSnapshot`],
//! provides glyph metrics through [`TextMeasure`] and a [`Clipboard`], calls
//! [`TextEditContext::text_box_ex`] and then draws the produced [`Command`] list with its own backend.

mod buffer;
mod clipboard;
mod draw_context;
mod error;
#[cfg(feature = "builder")]
mod font;
mod text_edit;
pub mod text_measure;
mod textbox_ex;
pub mod utf8;

pub use buffer::*;
pub use clipboard::*;
pub use draw_context::*;
pub use error::*;
#[cfg(feature = "builder")]
pub use font::*;
pub use rs_math3d::{Recti, Vec2i};
pub use text_edit::*;
pub use text_measure::{MeasureCtx, MeasureTarget, Measured, MonospaceMetrics, TextMeasure};
pub use textbox_ex::*;

use bitflags::*;

#[derive(Default, Copy, Clone, Eq, PartialEq, Hash, Debug)]
/// Identifier of a text control, supplied by the host on every call.
pub struct Id(usize);

impl Id {
    /// Creates an ID from a caller-supplied numeric value.
    /// On 32-bit platforms the value is truncated to fit in a `usize`.
    pub fn new(value: u64) -> Self { Self(value as usize) }

    /// Creates a stable ID from a string label using FNV-1a hashing.
    pub fn from_str(label: &str) -> Self {
        const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
        const FNV_PRIME: u64 = 0x100000001b3;
        let mut hash = FNV_OFFSET_BASIS;
        for byte in label.as_bytes() {
            hash ^= *byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        Self::new(hash)
    }

    /// Returns the raw numeric value wrapped by this ID.
    pub fn raw(self) -> usize { self.0 }
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[repr(u32)]
/// Identifiers for each of the built-in style colors.
pub enum ControlColor {
    /// Number of color entries in [`Style::colors`].
    Max = 14,
    /// Background of the selected text range.
    SelectedBase = 13,
    /// Foreground of the selected text range.
    SelectedText = 12,
    /// Text color while disabled.
    TextDisabled = 11,
    /// Background color while disabled.
    BaseDisabled = 10,
    /// Border color while disabled.
    BorderDisabled = 9,
    /// Text color while the control is being edited.
    TextPressed = 8,
    /// Background color while the control is being edited.
    BasePressed = 7,
    /// Border color while the control is being edited.
    BorderPressed = 6,
    /// Text color while hovered.
    TextFocused = 5,
    /// Background color while hovered.
    BaseFocused = 4,
    /// Border color while hovered.
    BorderFocused = 3,
    /// Default text color.
    TextNormal = 2,
    /// Default background color.
    BaseNormal = 1,
    /// Default border color.
    BorderNormal = 0,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
/// Visual interaction state of a control, used to pick its palette entries.
pub enum GuiState {
    /// Idle.
    Normal,
    /// Hovered by the pointer.
    Focused,
    /// Active (being edited).
    Pressed,
    /// Not interactive.
    Disabled,
}

impl GuiState {
    /// Border color for this state.
    pub fn border(self) -> ControlColor {
        match self {
            Self::Normal => ControlColor::BorderNormal,
            Self::Focused => ControlColor::BorderFocused,
            Self::Pressed => ControlColor::BorderPressed,
            Self::Disabled => ControlColor::BorderDisabled,
        }
    }

    /// Background color for this state.
    pub fn base(self) -> ControlColor {
        match self {
            Self::Normal => ControlColor::BaseNormal,
            Self::Focused => ControlColor::BaseFocused,
            Self::Pressed => ControlColor::BasePressed,
            Self::Disabled => ControlColor::BaseDisabled,
        }
    }

    /// Text color for this state.
    pub fn text(self) -> ControlColor {
        match self {
            Self::Normal => ControlColor::TextNormal,
            Self::Focused => ControlColor::TextFocused,
            Self::Pressed => ControlColor::TextPressed,
            Self::Disabled => ControlColor::TextDisabled,
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// State bits returned by widgets to describe their interaction outcome.
    pub struct ResourceState : u32 {
        /// Indicates that the widget's data changed.
        const CHANGE = 4;
        /// Indicates that the widget was submitted (Enter or click-away).
        const SUBMIT = 2;
        /// Indicates that the widget is currently active.
        const ACTIVE = 1;
        /// Indicates no interaction.
        const NONE = 0;
    }
}

impl ResourceState {
    /// Returns `true` if the widget changed its bound value.
    pub fn is_changed(&self) -> bool { self.intersects(Self::CHANGE) }
    /// Returns `true` if the widget signaled submission.
    pub fn is_submitted(&self) -> bool { self.intersects(Self::SUBMIT) }
    /// Returns `true` if the widget is active.
    pub fn is_active(&self) -> bool { self.intersects(Self::ACTIVE) }
    /// Returns `true` if the state contains no flags.
    pub fn is_none(&self) -> bool { self.bits() == 0 }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Options that influence how a text box is drawn and whether it reacts to input.
    pub struct WidgetOption : u32 {
        /// Draws the text box without its border and background.
        const NO_FRAME = 128;
        /// Disables interaction; the control draws with the disabled palette.
        const NO_INTERACT = 4;
        /// No special options.
        const NONE = 0;
    }
}

impl WidgetOption {
    /// Returns `true` if the border and background should be skipped.
    pub fn has_no_frame(&self) -> bool { self.intersects(Self::NO_FRAME) }
    /// Returns `true` if the widget is non-interactive.
    pub fn is_not_interactive(&self) -> bool { self.intersects(Self::NO_INTERACT) }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Mouse button state as reported by the input system.
    pub struct MouseButton : u32 {
        /// Middle mouse button.
        const MIDDLE = 4;
        /// Right mouse button.
        const RIGHT = 2;
        /// Left mouse button.
        const LEFT = 1;
        /// No buttons pressed.
        const NONE = 0;
    }
}

impl MouseButton {
    /// Returns `true` if the middle mouse button is set.
    pub fn is_middle(&self) -> bool { self.intersects(Self::MIDDLE) }
    /// Returns `true` if the right mouse button is set.
    pub fn is_right(&self) -> bool { self.intersects(Self::RIGHT) }
    /// Returns `true` if the left mouse button is set.
    pub fn is_left(&self) -> bool { self.intersects(Self::LEFT) }
    /// Returns `true` if no mouse buttons are set.
    pub fn is_none(&self) -> bool { self.bits() == 0 }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Modifier key state tracked by the input system.
    pub struct KeyMode : u32 {
        /// Alt key held.
        const ALT = 4;
        /// Control key held.
        const CTRL = 2;
        /// Shift key held.
        const SHIFT = 1;
        /// No modifiers active.
        const NONE = 0;
    }
}

impl KeyMode {
    /// Returns `true` if no modifiers are active.
    pub fn is_none(&self) -> bool { self.bits() == 0 }
    /// Returns `true` if Alt is held.
    pub fn is_alt(&self) -> bool { self.intersects(Self::ALT) }
    /// Returns `true` if Control is held.
    pub fn is_ctrl(&self) -> bool { self.intersects(Self::CTRL) }
    /// Returns `true` if Shift is held.
    pub fn is_shift(&self) -> bool { self.intersects(Self::SHIFT) }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Navigation, editing and shortcut keys handled by the text box.
    pub struct KeyCode : u32 {
        /// `V` key, paste when combined with Control.
        const V = 1024;
        /// `X` key, cut when combined with Control.
        const X = 512;
        /// `C` key, copy when combined with Control.
        const C = 256;
        /// `A` key, select all when combined with Control.
        const A = 128;
        /// Return/Enter key.
        const RETURN = 64;
        /// Delete key.
        const DELETE = 32;
        /// Backspace key.
        const BACKSPACE = 16;
        /// End key.
        const END = 8;
        /// Home key.
        const HOME = 4;
        /// Right arrow key.
        const RIGHT = 2;
        /// Left arrow key.
        const LEFT = 1;
        /// No keys pressed.
        const NONE = 0;
    }
}

impl KeyCode {
    /// Returns `true` if no key is set.
    pub fn is_none(&self) -> bool { self.bits() == 0 }
    /// Returns `true` if left is set.
    pub fn is_left(&self) -> bool { self.intersects(Self::LEFT) }
    /// Returns `true` if right is set.
    pub fn is_right(&self) -> bool { self.intersects(Self::RIGHT) }
    /// Returns `true` if Home is set.
    pub fn is_home(&self) -> bool { self.intersects(Self::HOME) }
    /// Returns `true` if End is set.
    pub fn is_end(&self) -> bool { self.intersects(Self::END) }
    /// Returns `true` if Backspace is set.
    pub fn is_backspace(&self) -> bool { self.intersects(Self::BACKSPACE) }
    /// Returns `true` if Delete is set.
    pub fn is_delete(&self) -> bool { self.intersects(Self::DELETE) }
    /// Returns `true` if Return/Enter is set.
    pub fn is_return(&self) -> bool { self.intersects(Self::RETURN) }
}

#[derive(Clone, Debug)]
/// Snapshot of the per-frame input state consumed by the text box.
pub struct InputSnapshot {
    /// Absolute mouse position in screen coordinates.
    pub mouse_pos: Vec2i,
    /// Mouse movement delta since the previous frame.
    pub mouse_delta: Vec2i,
    /// Currently held mouse buttons.
    pub mouse_down: MouseButton,
    /// Mouse buttons pressed this frame.
    pub mouse_pressed: MouseButton,
    /// Mouse buttons released this frame.
    pub mouse_released: MouseButton,
    /// Active modifier keys.
    pub key_mods: KeyMode,
    /// Keys pressed this frame (hosts report auto-repeat as repeated presses).
    pub key_code_pressed: KeyCode,
    /// UTF-8 text input collected this frame.
    pub text_input: String,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            mouse_pos: Vec2i::default(),
            mouse_delta: Vec2i::default(),
            mouse_down: MouseButton::NONE,
            mouse_pressed: MouseButton::NONE,
            mouse_released: MouseButton::NONE,
            key_mods: KeyMode::NONE,
            key_code_pressed: KeyCode::NONE,
            text_input: String::new(),
        }
    }
}

#[derive(Clone, Debug)]
/// Aggregates raw input events collected during the current frame.
pub struct Input {
    mouse_pos: Vec2i,
    last_mouse_pos: Vec2i,
    mouse_down: MouseButton,
    mouse_pressed: MouseButton,
    mouse_released: MouseButton,
    key_down: KeyMode,
    key_code_pressed: KeyCode,
    input_text: String,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            mouse_pos: Vec2i::default(),
            last_mouse_pos: Vec2i::default(),
            mouse_down: MouseButton::NONE,
            mouse_pressed: MouseButton::NONE,
            mouse_released: MouseButton::NONE,
            key_down: KeyMode::NONE,
            key_code_pressed: KeyCode::NONE,
            input_text: String::default(),
        }
    }
}

impl Input {
    /// Updates the current mouse pointer position.
    pub fn mousemove(&mut self, x: i32, y: i32) { self.mouse_pos = vec2(x, y); }

    /// Records that the specified mouse button was pressed.
    pub fn mousedown(&mut self, x: i32, y: i32, btn: MouseButton) {
        self.mousemove(x, y);
        self.mouse_down |= btn;
        self.mouse_pressed |= btn;
    }

    /// Records that the specified mouse button was released.
    pub fn mouseup(&mut self, x: i32, y: i32, btn: MouseButton) {
        self.mousemove(x, y);
        self.mouse_down &= !btn;
        self.mouse_released |= btn;
    }

    /// Records that a modifier key was pressed.
    pub fn keydown(&mut self, key: KeyMode) { self.key_down |= key; }

    /// Records that a modifier key was released.
    pub fn keyup(&mut self, key: KeyMode) { self.key_down &= !key; }

    /// Records that a navigation, editing or shortcut key was pressed.
    pub fn keydown_code(&mut self, code: KeyCode) { self.key_code_pressed |= code; }

    /// Appends UTF-8 text to the input buffer.
    pub fn text(&mut self, text: &str) { self.input_text.push_str(text); }

    /// Returns the input collected so far as a frame snapshot.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            mouse_pos: self.mouse_pos,
            mouse_delta: vec2(self.mouse_pos.x - self.last_mouse_pos.x, self.mouse_pos.y - self.last_mouse_pos.y),
            mouse_down: self.mouse_down,
            mouse_pressed: self.mouse_pressed,
            mouse_released: self.mouse_released,
            key_mods: self.key_down,
            key_code_pressed: self.key_code_pressed,
            text_input: self.input_text.clone(),
        }
    }

    /// Clears the per-frame transitions. Held buttons and modifiers persist.
    pub fn end_frame(&mut self) {
        self.key_code_pressed = KeyCode::NONE;
        self.input_text.clear();
        self.mouse_pressed = MouseButton::NONE;
        self.mouse_released = MouseButton::NONE;
        self.last_mouse_pos = self.mouse_pos;
    }
}

#[derive(Default, Copy, Clone, PartialEq, Eq, Debug)]
#[repr(C)]
/// Simple RGBA color stored with 8-bit components.
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

#[derive(Copy, Clone, Debug)]
/// Collection of visual constants that drive the text box appearance.
pub struct Style {
    /// Width of the control border in pixels.
    pub border_width: i32,
    /// Padding between the border and the text area.
    pub inner_padding: i32,
    /// Extra horizontal spacing added after every glyph.
    pub text_spacing: i32,
    /// Number of frames per cursor blink phase. Zero disables blinking.
    pub blink_frames: u32,
    /// Palette of [`ControlColor`] entries.
    pub colors: [Color; ControlColor::Max as usize],
}

impl Style {
    /// Returns the color stored for `id`.
    pub fn color(&self, id: ControlColor) -> Color { self.colors[id as usize] }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            border_width: 1,
            inner_padding: 4,
            text_spacing: 1,
            blink_frames: 20,
            colors: [
                color(0x83, 0x83, 0x83, 0xff),
                color(0xc9, 0xc9, 0xc9, 0xff),
                color(0x68, 0x68, 0x68, 0xff),
                color(0x5b, 0xb2, 0xd9, 0xff),
                color(0xc9, 0xef, 0xfe, 0xff),
                color(0x6c, 0x9b, 0xbc, 0xff),
                color(0x04, 0x92, 0xc7, 0xff),
                color(0x97, 0xe8, 0xff, 0xff),
                color(0x36, 0x8b, 0xaf, 0xff),
                color(0xb5, 0xc1, 0xc2, 0xff),
                color(0xe6, 0xe9, 0xe9, 0xff),
                color(0xae, 0xb7, 0xb8, 0xff),
                color(0xf0, 0xff, 0xfe, 0xff),
                color(0x83, 0x9a, 0xff, 0xe0),
            ],
        }
    }
}

/// Convenience constructor for [`Vec2i`].
pub fn vec2(x: i32, y: i32) -> Vec2i { Vec2i { x, y } }

/// Convenience constructor for [`Recti`].
pub fn rect(x: i32, y: i32, w: i32, h: i32) -> Recti { Recti { x, y, width: w, height: h } }

/// Convenience constructor for [`Color`].
pub fn color(r: u8, g: u8, b: u8, a: u8) -> Color { Color { r, g, b, a } }

/// Expands (or shrinks, for negative `n`) a rectangle uniformly on all sides.
pub fn expand_rect(r: Recti, n: i32) -> Recti { rect(r.x - n, r.y - n, r.width + n * 2, r.height + n * 2) }

/// Hit test with exclusive right and bottom edges, so adjacent controls never both claim a pixel.
pub(crate) fn rect_contains(r: Recti, p: Vec2i) -> bool { r.contains(&p) && p.x < r.x + r.width && p.y < r.y + r.height }
