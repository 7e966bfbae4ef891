use bytemuck::{Pod, Zeroable};

use super::traits::{Color, Renderer, SpriteId, TileMapId};

/// Kind of primitive stored in a [`DrawCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum DrawOp {
    FillRect = 0,
    StrokeRect = 1,
    FillCircle = 2,
    StrokeCircle = 3,
    Line = 4,
    Text = 5,
    Sprite = 6,
    TileMap = 7,
}

impl DrawOp {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::FillRect),
            1 => Some(Self::StrokeRect),
            2 => Some(Self::FillCircle),
            3 => Some(Self::StrokeCircle),
            4 => Some(Self::Line),
            5 => Some(Self::Text),
            6 => Some(Self::Sprite),
            7 => Some(Self::TileMap),
            _ => None,
        }
    }
}

/// One recorded draw call, laid out for a display driver to consume directly.
/// 7 words = 28 bytes stride.
///
/// Field meaning depends on `op`:
/// - rects: `a, b` = top-left, `c, d` = size
/// - circles: `a, b` = center, `c` = radius
/// - line: `a, b` → `c, d`
/// - text: `a, b` = top-left, `c` = byte offset into the text arena,
///   `d` = byte length, `extra` = scale
/// - sprite: `a, b` = top-left, `c` = sprite id, `d` = 1 if flipped
/// - tile map: `a, b` = origin, `c` = map id
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawCommand {
    pub op: u32,
    pub color: u32,
    pub a: i32,
    pub b: i32,
    pub c: i32,
    pub d: i32,
    pub extra: i32,
}

impl DrawCommand {
    pub const WORDS: usize = 7;
    pub const STRIDE_BYTES: usize = Self::WORDS * 4;

    fn new(op: DrawOp, color: Color, a: i32, b: i32, c: i32, d: i32) -> Self {
        Self {
            op: op as u32,
            color: color.as_u8() as u32,
            a,
            b,
            c,
            d,
            extra: 0,
        }
    }

    pub fn draw_op(&self) -> Option<DrawOp> {
        DrawOp::from_u32(self.op)
    }

    pub fn color(&self) -> Option<Color> {
        u8::try_from(self.color).ok().and_then(Color::from_u8)
    }
}

/// Renderer that records every call instead of rasterizing.
///
/// The desktop fallback replays the buffer into a software framebuffer;
/// microcontroller drivers stream `as_bytes()` to the panel task. Storage
/// is retained across frames so steady-state frames do not allocate.
pub struct CommandBuffer {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    text: String,
}

impl CommandBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_capacity(width, height, 256)
    }

    pub fn with_capacity(width: u32, height: u32, commands: usize) -> Self {
        Self {
            width,
            height,
            commands: Vec::with_capacity(commands),
            text: String::with_capacity(256),
        }
    }

    /// Drop all recorded commands, keeping the allocations.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.text.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Raw command bytes for the display driver.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.commands)
    }

    /// The string recorded by a text command.
    pub fn text_of(&self, command: &DrawCommand) -> Option<&str> {
        if command.draw_op() != Some(DrawOp::Text) {
            return None;
        }
        let start = usize::try_from(command.c).ok()?;
        let len = usize::try_from(command.d).ok()?;
        self.text.get(start..start.checked_add(len)?)
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl Renderer for CommandBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        self.push(DrawCommand::new(DrawOp::FillRect, color, x, y, width, height));
    }

    fn stroke_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        self.push(DrawCommand::new(DrawOp::StrokeRect, color, x, y, width, height));
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        self.push(DrawCommand::new(DrawOp::FillCircle, color, cx, cy, radius, 0));
    }

    fn stroke_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        self.push(DrawCommand::new(DrawOp::StrokeCircle, color, cx, cy, radius, 0));
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        self.push(DrawCommand::new(DrawOp::Line, color, x0, y0, x1, y1));
    }

    fn text(&mut self, text: &str, x: i32, y: i32, color: Color, scale: u8) {
        // Offsets are stored as i32; skip text that would not be addressable.
        let (Ok(start), Ok(len)) = (i32::try_from(self.text.len()), i32::try_from(text.len())) else {
            return;
        };
        self.text.push_str(text);
        let mut command = DrawCommand::new(DrawOp::Text, color, x, y, start, len);
        command.extra = scale as i32;
        self.push(command);
    }

    fn sprite(&mut self, sprite: SpriteId, x: i32, y: i32, color: Color, flip_x: bool) {
        // Ids travel as raw bits; the driver reads them back as u32.
        let id = bytemuck::cast::<u32, i32>(sprite.0);
        self.push(DrawCommand::new(DrawOp::Sprite, color, x, y, id, flip_x as i32));
    }

    fn tilemap(&mut self, map: TileMapId, x: i32, y: i32, color: Color) {
        let id = bytemuck::cast::<u32, i32>(map.0);
        self.push(DrawCommand::new(DrawOp::TileMap, color, x, y, id, 0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_command_is_7_words() {
        assert_eq!(std::mem::size_of::<DrawCommand>(), DrawCommand::STRIDE_BYTES);
    }

    #[test]
    fn records_calls_in_order() {
        let mut buf = CommandBuffer::new(240, 240);
        buf.fill_rect(1, 2, 3, 4, Color::White);
        buf.fill_circle(10, 10, 3, Color::Red);
        buf.line(0, 0, 5, 5, Color::Green);

        let ops: Vec<_> = buf.commands().iter().filter_map(|c| c.draw_op()).collect();
        assert_eq!(ops, vec![DrawOp::FillRect, DrawOp::FillCircle, DrawOp::Line]);
        assert_eq!(buf.commands()[1].color(), Some(Color::Red));
        assert_eq!(buf.as_bytes().len(), 3 * DrawCommand::STRIDE_BYTES);
    }

    #[test]
    fn text_is_stored_in_arena() {
        let mut buf = CommandBuffer::new(240, 240);
        buf.text("SCORE 10", 4, 4, Color::White, 1);
        buf.text("LVL 2", 4, 14, Color::Yellow, 2);

        let second = buf.commands()[1];
        assert_eq!(buf.text_of(&buf.commands()[0]), Some("SCORE 10"));
        assert_eq!(buf.text_of(&second), Some("LVL 2"));
        assert_eq!(second.extra, 2);
    }

    #[test]
    fn sprites_and_tilemaps_carry_handles() {
        let mut buf = CommandBuffer::new(240, 240);
        buf.tilemap(TileMapId(3), 0, -8, Color::Orange);
        buf.sprite(SpriteId(7), 20, 30, Color::Green, true);
        buf.sprite(SpriteId(u32::MAX), 0, 0, Color::Green, false);

        let cmds = buf.commands();
        assert_eq!(cmds[0].draw_op(), Some(DrawOp::TileMap));
        assert_eq!((cmds[0].a, cmds[0].b, cmds[0].c), (0, -8, 3));
        assert_eq!(cmds[1].draw_op(), Some(DrawOp::Sprite));
        assert_eq!((cmds[1].a, cmds[1].b, cmds[1].c, cmds[1].d), (20, 30, 7, 1));
        assert_eq!(cmds[2].c as u32, u32::MAX);
        assert_eq!(cmds[2].d, 0);
        assert!(buf.text_of(&cmds[1]).is_none());
    }

    #[test]
    fn clear_keeps_dimensions() {
        let mut buf = CommandBuffer::new(128, 64);
        buf.stroke_rect(0, 0, 8, 8, Color::Gray);
        buf.clear();
        assert_eq!(buf.command_count(), 0);
        assert_eq!((buf.width(), buf.height()), (128, 64));
    }
}
