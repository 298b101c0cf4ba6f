//! A [`Surface`] that rasterizes into terminal cells.
//!
//! Every cell covers `cell_width x cell_height` virtual pixels. Fills and
//! strokes put a glyph in the cell they land on, colored by compositing the
//! paint over whatever the cell already shows. Glow tints cell backgrounds.

use std::collections::HashMap;

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use starfall_core::{Rgba, Size, Stroke, Surface, Vec2};

use crate::chars::{STAR_CHARS, TRAIL_FALLING, TRAIL_HORIZONTAL, TRAIL_RISING, TRAIL_VERTICAL};
use crate::color::{backdrop_at, blend, to_color};
use crate::star::STAR_RADIUS;

/// Paint weaker than this leaves no glyph behind.
const MIN_GLYPH_ALPHA: f32 = 0.02;

/// Radius mapped to the largest point glyph.
const MAX_GLYPH_RADIUS: f32 = 1.8;

/// Glow strength in the cells next to the stroke, relative to the stroke's own cell.
const GLOW_FALLOFF: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Texel {
    glyph: Option<char>,
    /// Strongest paint that set the glyph.
    weight: f32,
    ink: [f32; 3],
    paper: [f32; 3],
    tinted: bool,
}

/// Terminal cell grid the animator draws on.
#[derive(Debug, Clone)]
pub struct CellCanvas {
    columns: u16,
    rows: u16,
    cell_width: u16,
    cell_height: u16,
    opacity: f32,
    backdrop: bool,
    texels: Vec<Texel>,
}

impl CellCanvas {
    /// Create a canvas of `columns x rows` cells.
    pub fn new(columns: u16, rows: u16, cell_width: u16, cell_height: u16) -> Self {
        let mut canvas = Self {
            columns: 0,
            rows: 0,
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
            opacity: 1.0,
            backdrop: false,
            texels: Vec::new(),
        };
        canvas.resize(columns, rows);
        canvas
    }

    /// Scale every paint operation by `opacity`.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Paint the violet page gradient behind everything.
    pub fn with_backdrop(mut self, backdrop: bool) -> Self {
        self.backdrop = backdrop;
        self.clear();
        self
    }

    /// Change the grid dimensions. Clears the canvas.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
        self.clear();
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Size of the canvas in virtual pixels.
    pub fn pixel_size(&self) -> Size {
        Size::new(
            u32::from(self.columns) * u32::from(self.cell_width),
            u32::from(self.rows) * u32::from(self.cell_height),
        )
    }

    /// Cell containing the pixel `point`, if it is on the canvas.
    pub fn cell_at(&self, point: Vec2) -> Option<(u16, u16)> {
        if !(point.x.is_finite() && point.y.is_finite()) || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let column = (point.x / f32::from(self.cell_width)) as u32;
        let row = (point.y / f32::from(self.cell_height)) as u32;
        (column < u32::from(self.columns) && row < u32::from(self.rows))
            .then_some((column as u16, row as u16))
    }

    /// Glyph currently shown in a cell.
    pub fn glyph(&self, column: u16, row: u16) -> Option<char> {
        self.texel(column, row).and_then(|texel| texel.glyph)
    }

    /// Whether any glow has reached this cell since the last clear.
    pub fn is_tinted(&self, column: u16, row: u16) -> bool {
        self.texel(column, row).is_some_and(|texel| texel.tinted)
    }

    fn index(&self, column: u16, row: u16) -> Option<usize> {
        (column < self.columns && row < self.rows)
            .then(|| usize::from(row) * usize::from(self.columns) + usize::from(column))
    }

    fn texel(&self, column: u16, row: u16) -> Option<&Texel> {
        self.index(column, row).map(|i| &self.texels[i])
    }

    fn blank_texel(&self, row: u16) -> Texel {
        let paper = if self.backdrop {
            backdrop_at(f32::from(row) / f32::from(self.rows.max(2) - 1))
        } else {
            [0.0, 0.0, 0.0]
        };
        Texel {
            glyph: None,
            weight: 0.0,
            ink: paper,
            paper,
            tinted: false,
        }
    }

    /// Composite `color` into one cell and offer it `glyph`.
    fn plot(&mut self, column: u16, row: u16, glyph: char, color: Rgba) {
        let alpha = color.a * self.opacity;
        if alpha < MIN_GLYPH_ALPHA {
            return;
        }
        let Some(i) = self.index(column, row) else {
            return;
        };
        let texel = &mut self.texels[i];
        texel.ink = blend(texel.ink, color.channels(), alpha);
        if alpha >= texel.weight {
            texel.glyph = Some(glyph);
            texel.weight = alpha;
        }
    }

    /// Tint the background of one cell.
    fn tint(&mut self, column: u16, row: u16, color: Rgba, strength: f32) {
        let alpha = color.a * strength * self.opacity;
        if alpha <= 0.0 {
            return;
        }
        let Some(i) = self.index(column, row) else {
            return;
        };
        let texel = &mut self.texels[i];
        texel.paper = blend(texel.paper, color.channels(), alpha);
        if texel.glyph.is_none() {
            texel.ink = texel.paper;
        }
        texel.tinted = true;
    }

    /// Trail glyph for a segment heading along `direction` in pixel space.
    fn trail_glyph(&self, direction: Vec2) -> char {
        let dx = direction.x / f32::from(self.cell_width);
        let dy = direction.y / f32::from(self.cell_height);
        if dx.abs() >= 2.0 * dy.abs() {
            TRAIL_HORIZONTAL
        } else if dy.abs() >= 2.0 * dx.abs() {
            TRAIL_VERTICAL
        } else if dx * dy > 0.0 {
            TRAIL_FALLING
        } else {
            TRAIL_RISING
        }
    }
}

/// Point glyph for a circle of `radius` pixels.
fn star_glyph(radius: f32) -> char {
    let min = *STAR_RADIUS.start();
    let t = ((radius - min) / (MAX_GLYPH_RADIUS - min)).clamp(0.0, 1.0);
    let index = (t * (STAR_CHARS.len() - 1) as f32).round() as usize;
    STAR_CHARS[index]
}

impl Surface for CellCanvas {
    fn clear(&mut self) {
        let mut texels = Vec::with_capacity(usize::from(self.columns) * usize::from(self.rows));
        for row in 0..self.rows {
            let blank = self.blank_texel(row);
            texels.extend(std::iter::repeat_n(blank, usize::from(self.columns)));
        }
        self.texels = texels;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if let Some((column, row)) = self.cell_at(center) {
            self.plot(column, row, star_glyph(radius), color);
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        let delta = to - from;
        let step = f32::from(self.cell_width.min(self.cell_height)) * 0.5;
        let samples = (delta.length() / step).ceil().max(1.0) as usize;
        let glyph = self.trail_glyph(delta);

        // Both edges of the line, so a stroke lying close to a cell border
        // also marks the cell on the other side.
        let normal = Vec2::new(-delta.y, delta.x).normalize();
        let half_width = normal * (stroke.width.max(0.0) * 0.5);
        let edges = [Vec2::ZERO, half_width, half_width * -1.0];

        // Strongest paint per cell, so cells crossed by several samples are
        // composited once.
        let mut coverage: Vec<((u16, u16), Rgba)> = Vec::new();
        for i in 0..=samples {
            let center = from + delta * (i as f32 / samples as f32);
            let color = stroke.paint.color_at(center);
            for edge in edges {
                let Some(cell) = self.cell_at(center + edge) else {
                    continue;
                };
                match coverage.iter_mut().find(|(c, _)| *c == cell) {
                    Some((_, best)) if best.a < color.a => *best = color,
                    Some(_) => {}
                    None => coverage.push((cell, color)),
                }
            }
        }

        if let Some(glow) = stroke.glow {
            let reach_x = (glow.blur / f32::from(self.cell_width)).ceil() as i32;
            let reach_y = (glow.blur / f32::from(self.cell_height)).ceil() as i32;
            let mut halo: HashMap<(u16, u16), f32> = HashMap::new();
            for &((column, row), color) in &coverage {
                for dy in -reach_y..=reach_y {
                    for dx in -reach_x..=reach_x {
                        let (x, y) = (i32::from(column) + dx, i32::from(row) + dy);
                        if x < 0 || y < 0 {
                            continue;
                        }
                        let strength = if dx == 0 && dy == 0 { 1.0 } else { GLOW_FALLOFF };
                        let entry = halo.entry((x as u16, y as u16)).or_insert(0.0);
                        *entry = entry.max(color.a * strength);
                    }
                }
            }
            for ((column, row), strength) in halo {
                self.tint(column, row, glow.color, strength);
            }
        }

        for ((column, row), color) in coverage {
            self.plot(column, row, glyph, color);
        }
    }
}

impl Widget for &CellCanvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        for row in 0..self.rows.min(area.height) {
            for column in 0..self.columns.min(area.width) {
                let Some(texel) = self.texel(column, row) else {
                    continue;
                };
                let Some(cell) = buf.cell_mut((area.x + column, area.y + row)) else {
                    continue;
                };
                match texel.glyph {
                    Some(glyph) => {
                        cell.set_char(glyph).set_fg(to_color(texel.ink));
                    }
                    None => {
                        cell.set_char(' ');
                    }
                }
                if self.backdrop || texel.tinted {
                    cell.set_bg(to_color(texel.paper));
                }
            }
        }
    }
}
