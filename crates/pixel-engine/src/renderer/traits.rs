//! Drawing surface consumed by entities during the draw pass.
//!
//! The engine never rasterizes anything itself. A display driver (SPI panel,
//! desktop software framebuffer, ...) implements [`Renderer`]; entities issue
//! primitive calls against it in scene-local pixel coordinates.

/// Fixed retro palette. The numeric value is the palette index a driver
/// maps to its native pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Color {
    #[default]
    Black = 0,
    White = 1,
    Red = 2,
    Green = 3,
    Blue = 4,
    Yellow = 5,
    Cyan = 6,
    Magenta = 7,
    Orange = 8,
    Gray = 9,
    DarkGray = 10,
}

impl Color {
    /// Number of palette entries.
    pub const COUNT: usize = 11;

    /// Convert from a palette index. Returns None if out of range.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Black),
            1 => Some(Self::White),
            2 => Some(Self::Red),
            3 => Some(Self::Green),
            4 => Some(Self::Blue),
            5 => Some(Self::Yellow),
            6 => Some(Self::Cyan),
            7 => Some(Self::Magenta),
            8 => Some(Self::Orange),
            9 => Some(Self::Gray),
            10 => Some(Self::DarkGray),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// 8-bit RGB for software framebuffers.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Color::Black => [0, 0, 0],
            Color::White => [255, 255, 255],
            Color::Red => [220, 40, 40],
            Color::Green => [40, 200, 60],
            Color::Blue => [40, 80, 220],
            Color::Yellow => [240, 220, 40],
            Color::Cyan => [40, 220, 220],
            Color::Magenta => [220, 40, 220],
            Color::Orange => [240, 140, 30],
            Color::Gray => [150, 150, 150],
            Color::DarkGray => [70, 70, 70],
        }
    }
}

/// Opaque handle to a sprite owned by the display backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpriteId(pub u32);

/// Opaque handle to a tile map owned by the display backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileMapId(pub u32);

/// Primitive drawing operations a display backend must provide.
///
/// Coordinates are integer pixels; entities truncate their float positions
/// when drawing. Backends clip; callers may pass off-screen shapes.
pub trait Renderer {
    /// Logical width of the surface in pixels.
    fn width(&self) -> u32;

    /// Logical height of the surface in pixels.
    fn height(&self) -> u32;

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color);

    /// One-pixel outline of a rectangle.
    fn stroke_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color);

    fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color);

    fn stroke_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color);

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color);

    /// Bitmap-font text with its top-left corner at `(x, y)`. `scale` is an
    /// integer magnification of the backend's built-in font.
    fn text(&mut self, text: &str, x: i32, y: i32, color: Color, scale: u8);

    /// One-bit sprite tinted with `color`, top-left at `(x, y)`.
    fn sprite(&mut self, sprite: SpriteId, x: i32, y: i32, color: Color, flip_x: bool);

    /// Whole tile map with its origin at `(x, y)`, tinted with `color`.
    fn tilemap(&mut self, map: TileMapId, x: i32, y: i32, color: Color);
}
