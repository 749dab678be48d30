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
use std::fs::File;
use std::io::Read;

use fontdue::{Font, FontSettings};
use tracing::debug;

use crate::*;

/// [`TextMeasure`] backed by a rasterizer font at a fixed pixel size.
pub struct FontMetrics {
    font: Font,
    px: f32,
}

impl FontMetrics {
    /// Parses a TrueType/OpenType font and measures it at `px` pixels.
    pub fn from_bytes(data: &[u8], px: f32) -> Result<Self> {
        let font = Font::from_bytes(data, FontSettings { scale: px, ..FontSettings::default() }).map_err(|error| Error::Font(error.to_string()))?;
        debug!(px, glyphs = font.glyph_count(), "font loaded");
        Ok(Self { font, px })
    }

    /// Reads and parses the font at `path`.
    pub fn from_file(path: &str, px: f32) -> Result<Self> {
        let mut data = Vec::new();
        File::open(path)
            .and_then(|mut f| f.read_to_end(&mut data))
            .map_err(|source| Error::Io { path: path.to_string(), source })?;
        Self::from_bytes(&data, px)
    }

    /// Pixel size the font is measured at.
    pub fn px(&self) -> f32 { self.px }
}

impl TextMeasure for FontMetrics {
    fn glyph_advance(&self, c: char) -> i32 { self.font.metrics(c, self.px).advance_width.round() as i32 }

    fn line_height(&self) -> i32 {
        match self.font.horizontal_line_metrics(self.px) {
            Some(m) => m.new_line_size.ceil() as i32,
            None => self.px.ceil() as i32,
        }
    }
}
