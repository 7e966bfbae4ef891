/// Unique identifier for an entity in the scene.
///
/// Ids are handed out by the owning [`Scene`](crate::Scene) and are never
/// reused until the scene is reset, so an id held by another actor either
/// resolves to the same entity or to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Broad classification of an entity, mostly useful for debugging and
/// for games that branch on what they are looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityKind {
    #[default]
    Generic,
    Actor,
    PhysicsActor,
    Ui,
}

impl EntityKind {
    /// Whether this kind takes part in the collision pass.
    pub fn is_actor(self) -> bool {
        matches!(self, EntityKind::Actor | EntityKind::PhysicsActor)
    }
}
