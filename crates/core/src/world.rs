//! Entity store - generational handles over dense component columns
//!
//! Each component type owns one column indexed by the entity slot. Handles
//! carry a generation so a destroyed entity's handle never resolves to the
//! slot's next occupant.
//!
//! ```
//! use blockfall_core::components::{Block, Position};
//! use blockfall_core::World;
//!
//! let mut world = World::new();
//! let e = world.create();
//! world.add(e, Position::at_cell(2, 3));
//! world.add(e, Block { color: 1 });
//! assert!(world.has::<Block>(e));
//!
//! world.destroy(e);
//! assert!(world.get::<Position>(e).is_none());
//! ```

use crate::components::{Block, Particle, Position, Shape, Velocity};

/// Stable handle to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Storage for one component type
#[derive(Debug, Clone)]
pub struct Column<T> {
    slots: Vec<Option<T>>,
    len: usize,
}

impl<T> Column<T> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    fn insert(&mut self, index: usize, value: T) -> Option<T> {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        let old = self.slots[index].replace(value);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    fn remove(&mut self, index: usize) -> Option<T> {
        let old = self.slots.get_mut(index).and_then(Option::take);
        if old.is_some() {
            self.len -= 1;
        }
        old
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.len = 0;
    }

    /// Number of entities carrying this component
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }

    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Move a value out without changing `len`; pair with [`put_back`](Self::put_back)
    fn lend(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    fn put_back(&mut self, index: usize, value: T) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(value);
        }
    }
}

/// Types that have a column in the [`World`]
pub trait Component: Sized {
    fn column(world: &World) -> &Column<Self>;
    fn column_mut(world: &mut World) -> &mut Column<Self>;
}

macro_rules! component {
    ($ty:ty, $field:ident) => {
        impl Component for $ty {
            fn column(world: &World) -> &Column<Self> {
                &world.$field
            }

            fn column_mut(world: &mut World) -> &mut Column<Self> {
                &mut world.$field
            }
        }
    };
}

component!(Position, positions);
component!(Velocity, velocities);
component!(Shape, shapes);
component!(Block, blocks);
component!(Particle, particles);

/// The entity-component container shared by the board core and its host
#[derive(Debug, Clone)]
pub struct World {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free: Vec<u32>,
    live: usize,
    pub(crate) positions: Column<Position>,
    pub(crate) velocities: Column<Velocity>,
    pub(crate) shapes: Column<Shape>,
    pub(crate) blocks: Column<Block>,
    pub(crate) particles: Column<Particle>,
}

impl World {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            alive: Vec::new(),
            free: Vec::new(),
            live: 0,
            positions: Column::new(),
            velocities: Column::new(),
            shapes: Column::new(),
            blocks: Column::new(),
            particles: Column::new(),
        }
    }

    /// Create an entity with no components
    pub fn create(&mut self) -> Entity {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            self.alive[index as usize] = true;
            return Entity {
                index,
                generation: self.generations[index as usize],
            };
        }

        let index = self.generations.len() as u32;
        self.generations.push(0);
        self.alive.push(true);
        Entity {
            index,
            generation: 0,
        }
    }

    /// Destroy an entity and drop all of its components.
    /// Returns false if the handle was already dead.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let index = entity.index();
        self.positions.remove(index);
        self.velocities.remove(index);
        self.shapes.remove(index);
        self.blocks.remove(index);
        self.particles.remove(index);

        self.alive[index] = false;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free.push(entity.index);
        self.live -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        let index = entity.index();
        index < self.alive.len()
            && self.alive[index]
            && self.generations[index] == entity.generation
    }

    /// Attach (or replace) a component. Returns false for a dead handle.
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        T::column_mut(self).insert(entity.index(), value);
        true
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.is_alive(entity) {
            return None;
        }
        T::column(self).get(entity.index())
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.is_alive(entity) {
            return None;
        }
        T::column_mut(self).get_mut(entity.index())
    }

    /// Visit every entity that has a `T`
    pub fn for_each<T: Component>(&self, mut f: impl FnMut(Entity, &T)) {
        for (index, value) in T::column(self).iter() {
            f(self.handle(index), value);
        }
    }

    /// Visit every entity that has both an `A` and a `B`
    pub fn for_each2<A: Component, B: Component>(&self, mut f: impl FnMut(Entity, &A, &B)) {
        let others = B::column(self);
        for (index, a) in A::column(self).iter() {
            if let Some(b) = others.get(index) {
                f(self.handle(index), a, b);
            }
        }
    }

    /// Visit every entity that has an `A`, a `B` and a `C`, mutably.
    ///
    /// The `B` and `C` values are moved out of their columns for the duration
    /// of the call, so naming one type twice visits nothing.
    pub fn for_each3_mut<A, B, C>(&mut self, mut f: impl FnMut(Entity, &mut A, &mut B, &mut C))
    where
        A: Component,
        B: Component,
        C: Component,
    {
        for index in 0..A::column(self).slot_count() {
            let Some(mut b) = B::column_mut(self).lend(index) else {
                continue;
            };
            let Some(mut c) = C::column_mut(self).lend(index) else {
                B::column_mut(self).put_back(index, b);
                continue;
            };
            let entity = self.handle(index);
            if let Some(a) = A::column_mut(self).get_mut(index) {
                f(entity, a, &mut b, &mut c);
            }
            C::column_mut(self).put_back(index, c);
            B::column_mut(self).put_back(index, b);
        }
    }

    /// Number of entities carrying a `T`
    pub fn count<T: Component>(&self) -> usize {
        T::column(self).len()
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Destroy every entity. Outstanding handles stay invalid.
    pub fn clear(&mut self) {
        for index in 0..self.alive.len() {
            if self.alive[index] {
                self.alive[index] = false;
                self.generations[index] = self.generations[index].wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.positions.clear();
        self.velocities.clear();
        self.shapes.clear();
        self.blocks.clear();
        self.particles.clear();
        self.live = 0;
    }

    /// Number of entity slots ever handed out, live or free
    pub(crate) fn slot_count(&self) -> usize {
        self.generations.len()
    }

    /// Live handle for a slot, if the slot is occupied
    pub(crate) fn entity_at(&self, index: usize) -> Option<Entity> {
        (index < self.alive.len() && self.alive[index]).then(|| self.handle(index))
    }

    fn handle(&self, index: usize) -> Entity {
        Entity {
            index: index as u32,
            generation: self.generations[index],
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
