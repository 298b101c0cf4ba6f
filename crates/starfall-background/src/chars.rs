//! Glyphs used to draw the starfield in terminal cells.

/// Point glyphs from the smallest to the largest radius.
pub const STAR_CHARS: &[char] = &['·', '.', '+', '*', '✦'];

/// Trail glyph for mostly horizontal motion.
pub const TRAIL_HORIZONTAL: char = '─';

/// Trail glyph for mostly vertical motion.
pub const TRAIL_VERTICAL: char = '│';

/// Trail glyph running from top-left to bottom-right.
pub const TRAIL_FALLING: char = '╲';

/// Trail glyph running from bottom-left to top-right.
pub const TRAIL_RISING: char = '╱';
