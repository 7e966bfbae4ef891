/// Render layer: controls draw order for entities.
///
/// Layers are drawn in ascending order: `BACKGROUND` first, `UI` last.
/// Within a layer, entities draw in the order they were added to the scene.
/// Games are free to use any value; the named constants are conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RenderLayer(pub u8);

impl RenderLayer {
    pub const BACKGROUND: RenderLayer = RenderLayer(0);
    pub const TERRAIN: RenderLayer = RenderLayer(1);
    pub const OBJECTS: RenderLayer = RenderLayer(2);
    pub const FOREGROUND: RenderLayer = RenderLayer(3);
    pub const UI: RenderLayer = RenderLayer(4);

    pub fn as_u8(self) -> u8 {
        self.0
    }
}

impl From<u8> for RenderLayer {
    fn from(value: u8) -> Self {
        RenderLayer(value)
    }
}
