use log::{debug, info, trace, warn};

use crate::api::types::EntityId;
use crate::components::actor::Actor;
use crate::components::entity::Entity;
use crate::core::collision::{detect_pairs, CollisionPair, CollisionProxy};
use crate::renderer::traits::Renderer;

/// Default number of entities a scene holds when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 64;

struct Slot {
    id: EntityId,
    /// `None` only while the entity is lent out to one of its own hooks.
    entity: Option<Box<dyn Entity>>,
    /// Set when removed mid-tick; the slot is compacted away at end of tick.
    removed: bool,
}

/// Work queued by entities during a pass, applied by the scene afterwards.
struct SceneQueue {
    next_id: u32,
    capacity: usize,
    removals: Vec<EntityId>,
    spawns: Vec<Box<dyn Entity>>,
}

impl SceneQueue {
    fn new(capacity: usize) -> Self {
        Self {
            next_id: 1,
            capacity,
            removals: Vec::with_capacity(8),
            spawns: Vec::with_capacity(8),
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn is_pending_removal(&self, id: EntityId) -> bool {
        self.removals.contains(&id)
    }
}

/// Slots are kept in insertion order and ids only grow, so they are sorted.
fn find_slot(slots: &[Slot], id: EntityId) -> Option<usize> {
    slots.binary_search_by_key(&id, |s| s.id).ok()
}

fn live_count(slots: &[Slot], queue: &SceneQueue) -> usize {
    slots.iter().filter(|s| !s.removed).count() + queue.spawns.len()
}

// ---------------------------------------------------------------------------
// TickContext
// ---------------------------------------------------------------------------

/// Handed to [`Entity::update`] and [`Actor::on_collision`].
///
/// Gives read access to the other live entities by id and queues structural
/// changes. Removals take effect as soon as the hook returns: a removed entity
/// gets no further update, collision or draw call. Spawns get their id
/// immediately but join the scene at the end of the tick.
pub struct TickContext<'a> {
    current: EntityId,
    slots: &'a [Slot],
    queue: &'a mut SceneQueue,
}

impl<'a> TickContext<'a> {
    fn new(current: EntityId, slots: &'a [Slot], queue: &'a mut SceneQueue) -> Self {
        Self {
            current,
            slots,
            queue,
        }
    }

    /// Id of the entity whose hook is running.
    pub fn id(&self) -> EntityId {
        self.current
    }

    /// Look up a live entity. Returns `None` for removed ids, for the calling
    /// entity itself and for the other member of the pair being notified.
    pub fn get(&self, id: EntityId) -> Option<&dyn Entity> {
        if self.queue.is_pending_removal(id) {
            return None;
        }
        let slot = &self.slots[find_slot(self.slots, id)?];
        if slot.removed {
            return None;
        }
        slot.entity.as_deref()
    }

    pub fn get_as<T: Entity>(&self, id: EntityId) -> Option<&T> {
        self.get(id)?.downcast_ref::<T>()
    }

    pub fn actor(&self, id: EntityId) -> Option<&dyn Actor> {
        self.get(id)?.as_actor()
    }

    /// First live entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&dyn Entity> {
        self.slots
            .iter()
            .filter(|s| !s.removed && !self.queue.is_pending_removal(s.id))
            .filter_map(|s| s.entity.as_deref())
            .find(|e| e.base().tag == tag)
    }

    /// Queue removal of any entity, including the caller.
    pub fn remove(&mut self, id: EntityId) {
        if !self.queue.is_pending_removal(id) {
            self.queue.removals.push(id);
        }
    }

    pub fn remove_self(&mut self) {
        self.remove(self.current);
    }

    pub fn is_removed(&self, id: EntityId) -> bool {
        self.queue.is_pending_removal(id)
            || find_slot(self.slots, id).map_or(true, |i| self.slots[i].removed)
    }

    /// Queue a new entity. Returns `None` when the scene is full; the caller
    /// is expected to try again on a later tick.
    pub fn spawn<E: Entity>(&mut self, entity: E) -> Option<EntityId> {
        if live_count(self.slots, self.queue) >= self.queue.capacity {
            warn!("Scene full ({} entities) - spawn skipped", self.queue.capacity);
            return None;
        }
        let mut entity: Box<dyn Entity> = Box::new(entity);
        let id = self.queue.allocate_id();
        entity.base_mut().id = id;
        self.queue.spawns.push(entity);
        Some(id)
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Entity storage plus the per-tick pipeline.
///
/// Entities live in a flat Vec in insertion order, bounded by a fixed
/// capacity. Designed for small entity counts (tens, not thousands): lookups
/// are binary searches and the collision pass is brute force.
pub struct Scene {
    slots: Vec<Slot>,
    queue: SceneQueue,
    // Scratch buffers reused every tick.
    proxies: Vec<CollisionProxy>,
    pairs: Vec<(usize, usize)>,
    draw_order: Vec<usize>,
    collisions: Vec<CollisionPair>,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a scene that holds at most `capacity` entities.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            queue: SceneQueue::new(capacity),
            proxies: Vec::with_capacity(capacity),
            pairs: Vec::with_capacity(capacity),
            draw_order: Vec::with_capacity(capacity),
            collisions: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity
    }

    /// Change the capacity. Entities already in the scene are kept even if
    /// there are more of them than the new limit.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.queue.capacity = capacity;
        self.slots.reserve(capacity.saturating_sub(self.slots.len()));
    }

    // -- Ownership --

    /// Add an entity. Returns its id, or `None` if the scene is full.
    pub fn add_entity<E: Entity>(&mut self, entity: E) -> Option<EntityId> {
        self.add_boxed(Box::new(entity))
    }

    pub fn add_boxed(&mut self, mut entity: Box<dyn Entity>) -> Option<EntityId> {
        if live_count(&self.slots, &self.queue) >= self.queue.capacity {
            warn!("Scene full ({} entities) - add skipped", self.queue.capacity);
            return None;
        }
        let id = self.queue.allocate_id();
        entity.base_mut().id = id;
        debug!("Added entity {:?} '{}'", id, entity.base().tag);
        self.slots.push(Slot {
            id,
            entity: Some(entity),
            removed: false,
        });
        Some(id)
    }

    /// Remove an entity by id, returning it. Order of the remaining entities
    /// is preserved.
    ///
    /// Entities removing themselves or others from inside a tick go through
    /// [`TickContext::remove`] instead, which defers the drop to end of tick.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Box<dyn Entity>> {
        let idx = find_slot(&self.slots, id)?;
        let slot = self.slots.remove(idx);
        debug!("Removed entity {:?}", id);
        if slot.removed {
            None
        } else {
            slot.entity
        }
    }

    /// Drop every entity. Ids keep counting up, so stale ids held by game
    /// code stay dead.
    pub fn clear_entities(&mut self) {
        info!("Clearing {} entities", self.slots.len());
        self.slots.clear();
        self.queue.removals.clear();
        self.queue.spawns.clear();
        self.collisions.clear();
    }

    /// Clear everything and restart id assignment. Used between games or
    /// levels; any id held from before the reset must be re-acquired.
    pub fn reset(&mut self) {
        self.clear_entities();
        self.queue.next_id = 1;
    }

    // -- Queries --

    pub fn get(&self, id: EntityId) -> Option<&dyn Entity> {
        let slot = &self.slots[find_slot(&self.slots, id)?];
        if slot.removed {
            return None;
        }
        slot.entity.as_deref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut dyn Entity> {
        let idx = find_slot(&self.slots, id)?;
        let slot = &mut self.slots[idx];
        if slot.removed {
            return None;
        }
        slot.entity.as_deref_mut()
    }

    pub fn get_as<T: Entity>(&self, id: EntityId) -> Option<&T> {
        self.get(id)?.downcast_ref::<T>()
    }

    pub fn get_as_mut<T: Entity>(&mut self, id: EntityId) -> Option<&mut T> {
        self.get_mut(id)?.downcast_mut::<T>()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&dyn Entity> {
        self.iter().find(|e| e.base().tag == tag)
    }

    /// Iterate over live entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Entity> + '_ {
        self.slots
            .iter()
            .filter(|s| !s.removed)
            .filter_map(|s| s.entity.as_deref())
    }

    /// Iterate over the live entities that are actors.
    pub fn actors(&self) -> impl Iterator<Item = &dyn Actor> + '_ {
        self.iter().filter_map(|e| e.as_actor())
    }

    /// Number of entities in the scene.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| !s.removed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pairs notified during the most recent [`update`](Self::update).
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collisions
    }

    // -- Tick pipeline --

    /// Update every enabled entity in insertion order, then run the
    /// collision pass once over the surviving actors, then apply queued
    /// removals and spawns.
    pub fn update(&mut self, dt_ms: u32) {
        self.collisions.clear();

        for idx in 0..self.slots.len() {
            let slot = &mut self.slots[idx];
            if slot.removed {
                continue;
            }
            let id = slot.id;
            let Some(mut entity) = slot.entity.take() else {
                continue;
            };
            if entity.base().enabled {
                let mut ctx = TickContext::new(id, &self.slots, &mut self.queue);
                entity.update(dt_ms, &mut ctx);
            }
            self.slots[idx].entity = Some(entity);
            self.apply_removals();
        }

        self.collide();
        self.finish_tick();
    }

    /// Draw every visible entity, lowest render layer first. Entities that
    /// share a layer draw in insertion order.
    pub fn draw(&mut self, renderer: &mut dyn Renderer) {
        self.draw_order.clear();
        self.draw_order.extend(
            self.slots
                .iter()
                .enumerate()
                .filter(|(_, s)| !s.removed)
                .filter(|(_, s)| s.entity.as_ref().is_some_and(|e| e.base().visible))
                .map(|(i, _)| i),
        );

        let slots = &self.slots;
        // Stable sort keeps insertion order within a layer.
        self.draw_order
            .sort_by_key(|&i| slots[i].entity.as_ref().map(|e| e.base().render_layer));

        for &i in &self.draw_order {
            if let Some(entity) = self.slots[i].entity.as_deref() {
                entity.draw(renderer);
            }
        }
    }

    // -- Internals --

    /// Detect overlapping pairs on the post-update state, then notify each
    /// pair. A pair is skipped if either side was removed or disabled by an
    /// earlier notification in the same pass.
    fn collide(&mut self) {
        self.proxies.clear();
        for (idx, slot) in self.slots.iter().enumerate() {
            if slot.removed {
                continue;
            }
            let Some(entity) = slot.entity.as_deref() else {
                continue;
            };
            if !entity.base().enabled {
                continue;
            }
            if let Some(actor) = entity.as_actor() {
                self.proxies.push(CollisionProxy {
                    index: idx,
                    hit_box: actor.hit_box(),
                    collider: actor.collider(),
                });
            }
        }

        detect_pairs(&self.proxies, &mut self.pairs);
        trace!("Collision pass: {} actors, {} pairs", self.proxies.len(), self.pairs.len());

        for k in 0..self.pairs.len() {
            let (a, b) = self.pairs[k];
            self.dispatch_pair(a, b);
        }
    }

    fn dispatch_pair(&mut self, ia: usize, ib: usize) {
        if self.slots[ia].removed || self.slots[ib].removed {
            return;
        }
        let (id_a, id_b) = (self.slots[ia].id, self.slots[ib].id);
        let Some(mut a) = self.slots[ia].entity.take() else {
            return;
        };
        let Some(mut b) = self.slots[ib].entity.take() else {
            self.slots[ia].entity = Some(a);
            return;
        };

        if a.base().enabled && b.base().enabled {
            if let (Some(actor_a), Some(actor_b)) = (a.as_actor_mut(), b.as_actor()) {
                let mut ctx = TickContext::new(id_a, &self.slots, &mut self.queue);
                actor_a.on_collision(actor_b, &mut ctx);
            }
            // `a` may have removed `b` in its handler.
            if !self.queue.is_pending_removal(id_b) {
                if let (Some(actor_b), Some(actor_a)) = (b.as_actor_mut(), a.as_actor()) {
                    let mut ctx = TickContext::new(id_b, &self.slots, &mut self.queue);
                    actor_b.on_collision(actor_a, &mut ctx);
                }
            }
            self.collisions.push(CollisionPair {
                entity_a: id_a,
                entity_b: id_b,
            });
        }

        self.slots[ia].entity = Some(a);
        self.slots[ib].entity = Some(b);
        self.apply_removals();
    }

    /// Flag queued removals so the rest of the tick skips them.
    fn apply_removals(&mut self) {
        if self.queue.removals.is_empty() {
            return;
        }
        for id in self.queue.removals.drain(..) {
            if let Some(idx) = find_slot(&self.slots, id) {
                self.slots[idx].removed = true;
            } else {
                // Spawned and removed within the same tick.
                self.queue.spawns.retain(|e| e.base().id != id);
            }
        }
    }

    fn finish_tick(&mut self) {
        let before = self.slots.len();
        self.slots.retain(|s| !s.removed);
        if self.slots.len() != before {
            debug!("Dropped {} removed entities", before - self.slots.len());
        }
        for entity in self.queue.spawns.drain(..) {
            debug!("Spawned entity {:?} '{}'", entity.base().id, entity.base().tag);
            self.slots.push(Slot {
                id: entity.base().id,
                entity: Some(entity),
                removed: false,
            });
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
