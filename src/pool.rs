//! Fixed-capacity entity pools.
//!
//! A pool allocates slots lazily, one per spawn, until it reaches its
//! capacity.  After that a spawn only succeeds if some slot has gone
//! inactive; otherwise it is dropped.  Slots are never freed.

use tracing::trace;

use crate::entities::{CollectibleKind, Entity, EntityKind, ObstacleKind, PowerUpKind};

/// Shared capacity for all collectible kinds.
pub const COLLECTIBLE_CAPACITY: usize = 30;
/// Shared capacity for all power-up kinds.
pub const POWER_UP_CAPACITY: usize = 10;

#[derive(Clone, Debug)]
pub struct Pool<K> {
    slots: Vec<Entity<K>>,
    capacity: usize,
}

impl<K: EntityKind> Pool<K> {
    pub fn new(capacity: usize) -> Self {
        Pool {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots allocated so far (active or not).
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|e| e.active).count()
    }

    /// Spawn into an inactive slot, or a fresh one while under capacity.
    /// Returns `None` and leaves the pool untouched when full.
    pub fn try_spawn(&mut self, kind: K, x: f32, y: f32, velocity_x: f32) -> Option<&Entity<K>> {
        if let Some(i) = self.slots.iter().position(|e| !e.active) {
            self.slots[i].spawn(kind, x, y, velocity_x);
            return Some(&self.slots[i]);
        }
        if self.slots.len() < self.capacity {
            self.slots.push(Entity::spawned(kind, x, y, velocity_x));
            return self.slots.last();
        }
        trace!(?kind, capacity = self.capacity, "pool full, spawn dropped");
        None
    }

    /// Advance every slot by one frame.
    pub fn update(&mut self, dt_ms: f32) {
        for e in &mut self.slots {
            e.update(dt_ms);
        }
    }

    pub fn get(&self, index: usize) -> Option<&Entity<K>> {
        self.slots.get(index)
    }

    /// Collect the entity at `index`.  `false` if it was not active.
    pub fn collect(&mut self, index: usize) -> bool {
        self.slots.get_mut(index).map_or(false, |e| e.collect())
    }

    /// Despawn the entity at `index`.  `false` if it was not active.
    pub fn despawn(&mut self, index: usize) -> bool {
        self.slots.get_mut(index).map_or(false, |e| e.despawn())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity<K>> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity<K>> {
        self.slots.iter_mut()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Entity<K>> {
        self.slots.iter().filter(|e| e.active)
    }

    /// Despawn everything, keeping the allocated slots.
    pub fn clear(&mut self) {
        for e in &mut self.slots {
            e.despawn();
            e.fade_ms = 0.0;
        }
    }
}

/// One pool per obstacle kind plus the shared collectible and power-up pools.
#[derive(Clone, Debug)]
pub struct Pools {
    pub cloud_monsters: Pool<ObstacleKind>,
    pub flying_kittens: Pool<ObstacleKind>,
    pub boulders: Pool<ObstacleKind>,
    pub collectibles: Pool<CollectibleKind>,
    pub power_ups: Pool<PowerUpKind>,
}

impl Default for Pools {
    fn default() -> Self {
        Self::new()
    }
}

impl Pools {
    pub fn new() -> Self {
        Pools {
            cloud_monsters: Pool::new(ObstacleKind::CloudMonster.pool_capacity()),
            flying_kittens: Pool::new(ObstacleKind::FlyingKitten.pool_capacity()),
            boulders: Pool::new(ObstacleKind::Boulder.pool_capacity()),
            collectibles: Pool::new(COLLECTIBLE_CAPACITY),
            power_ups: Pool::new(POWER_UP_CAPACITY),
        }
    }

    pub fn obstacle_pool(&self, kind: ObstacleKind) -> &Pool<ObstacleKind> {
        match kind {
            ObstacleKind::CloudMonster => &self.cloud_monsters,
            ObstacleKind::FlyingKitten => &self.flying_kittens,
            ObstacleKind::Boulder => &self.boulders,
        }
    }

    pub fn obstacle_pool_mut(&mut self, kind: ObstacleKind) -> &mut Pool<ObstacleKind> {
        match kind {
            ObstacleKind::CloudMonster => &mut self.cloud_monsters,
            ObstacleKind::FlyingKitten => &mut self.flying_kittens,
            ObstacleKind::Boulder => &mut self.boulders,
        }
    }

    /// Every obstacle slot across the three obstacle pools.
    pub fn obstacles(&self) -> impl Iterator<Item = &Entity<ObstacleKind>> {
        ObstacleKind::ALL
            .into_iter()
            .flat_map(move |kind| self.obstacle_pool(kind).iter())
    }

    pub fn obstacles_mut(&mut self) -> impl Iterator<Item = &mut Entity<ObstacleKind>> {
        self.cloud_monsters
            .iter_mut()
            .chain(self.flying_kittens.iter_mut())
            .chain(self.boulders.iter_mut())
    }

    pub fn spawn_obstacle(
        &mut self,
        kind: ObstacleKind,
        x: f32,
        y: f32,
        velocity_x: f32,
    ) -> Option<&Entity<ObstacleKind>> {
        self.obstacle_pool_mut(kind).try_spawn(kind, x, y, velocity_x)
    }

    pub fn update(&mut self, dt_ms: f32) {
        self.cloud_monsters.update(dt_ms);
        self.flying_kittens.update(dt_ms);
        self.boulders.update(dt_ms);
        self.collectibles.update(dt_ms);
        self.power_ups.update(dt_ms);
    }

    pub fn clear(&mut self) {
        self.cloud_monsters.clear();
        self.flying_kittens.clear();
        self.boulders.clear();
        self.collectibles.clear();
        self.power_ups.clear();
    }
}
