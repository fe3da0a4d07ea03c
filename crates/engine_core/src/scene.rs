//! Scene graph: the render-target entity store the simulation adds to and removes from.
//!
//! Backed by a `hecs::World`. Entities carry a `Transform`, a `Renderable`, and
//! optionally a `Name`, `Parent`, `Visible` and `Opacity`.

use hecs::{Component, Entity, World};

use crate::components::{Name, Opacity, Parent, Renderable, Visible};
use crate::transform::Transform;

/// One visible entity as a renderer sees it: world transform, what to draw and how opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub entity: Entity,
    pub transform: Transform,
    pub renderable: Renderable,
    pub opacity: f32,
}

#[derive(Default)]
pub struct Scene {
    world: World,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level entity.
    pub fn add(&mut self, transform: Transform, renderable: Renderable) -> Entity {
        self.world
            .spawn((transform, renderable, Visible::default(), Opacity::default()))
    }

    /// Add a top-level entity that can later be found by name.
    pub fn add_named(&mut self, name: &str, transform: Transform, renderable: Renderable) -> Entity {
        let entity = self.add(transform, renderable);
        // Freshly spawned; insert cannot fail.
        let _ = self.world.insert_one(entity, Name::new(name));
        entity
    }

    /// Attach a named child whose transform is relative to `parent`.
    pub fn add_child(
        &mut self,
        parent: Entity,
        name: &str,
        local: Transform,
        renderable: Renderable,
    ) -> Entity {
        self.world.spawn((
            local,
            renderable,
            Visible::default(),
            Opacity::default(),
            Name::new(name),
            Parent(parent),
        ))
    }

    /// Remove an entity and, recursively, its children. Returns false if it was already gone.
    pub fn remove(&mut self, entity: Entity) -> bool {
        for child in self.children(entity) {
            self.remove(child);
        }
        self.world.despawn(entity).is_ok()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    /// Find the first entity with the given name anywhere in the scene.
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.world
            .query::<&Name>()
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(e, _)| e)
    }

    /// Find a named descendant of `root`, searching recursively.
    pub fn find_descendant(&self, root: Entity, name: &str) -> Option<Entity> {
        for child in self.children(root) {
            let matches = self
                .world
                .get::<&Name>(child)
                .map(|n| n.as_str() == name)
                .unwrap_or(false);
            if matches {
                return Some(child);
            }
            if let Some(found) = self.find_descendant(child, name) {
                return Some(found);
            }
        }
        None
    }

    /// Direct children of `parent`.
    pub fn children(&self, parent: Entity) -> Vec<Entity> {
        self.world
            .query::<&Parent>()
            .iter()
            .filter(|(_, p)| p.0 == parent)
            .map(|(e, _)| e)
            .collect()
    }

    pub fn transform(&self, entity: Entity) -> Option<Transform> {
        self.world.get::<&Transform>(entity).ok().map(|t| *t)
    }

    pub fn set_transform(&mut self, entity: Entity, transform: Transform) {
        if let Ok(mut t) = self.world.get::<&mut Transform>(entity) {
            *t = transform;
        }
    }

    /// Set only the position of an entity, keeping rotation and scale.
    pub fn set_position(&mut self, entity: Entity, position: glam::Vec3) {
        if let Ok(mut t) = self.world.get::<&mut Transform>(entity) {
            t.position = position;
        }
    }

    /// World-space transform, composing parent transforms.
    pub fn world_transform(&self, entity: Entity) -> Option<Transform> {
        let local = self.transform(entity)?;
        let parent = self.world.get::<&Parent>(entity).ok().map(|p| p.0);
        match parent.and_then(|p| self.world_transform(p)) {
            Some(parent) => Some(Transform {
                position: parent.local_to_world(local.position * parent.scale),
                rotation: parent.rotation * local.rotation,
                scale: parent.scale * local.scale,
            }),
            None => Some(local),
        }
    }

    pub fn is_visible(&self, entity: Entity) -> bool {
        self.world
            .get::<&Visible>(entity)
            .map(|v| v.0)
            .unwrap_or(false)
    }

    pub fn set_visible(&mut self, entity: Entity, visible: bool) {
        if let Ok(mut v) = self.world.get::<&mut Visible>(entity) {
            v.0 = visible;
        }
    }

    pub fn opacity(&self, entity: Entity) -> Option<f32> {
        self.world.get::<&Opacity>(entity).ok().map(|o| o.0)
    }

    pub fn set_opacity(&mut self, entity: Entity, opacity: f32) {
        if let Ok(mut o) = self.world.get::<&mut Opacity>(entity) {
            o.0 = opacity.clamp(0.0, 1.0);
        }
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    /// Attach an extra component (e.g. a per-instance texture) to an existing entity.
    /// Returns false if the entity is gone.
    pub fn attach<C: Component>(&mut self, entity: Entity, component: C) -> bool {
        self.world.insert_one(entity, component).is_ok()
    }

    /// Copy of an attached component, if the entity has one.
    pub fn component<C: Component + Clone>(&self, entity: Entity) -> Option<C> {
        self.world.get::<&C>(entity).ok().map(|c| (*c).clone())
    }

    /// Snapshot of every visible top-level or child entity for a renderer.
    pub fn drawables(&self) -> Vec<Drawable> {
        let entities: Vec<Entity> = self
            .world
            .query::<(&Renderable, &Visible)>()
            .iter()
            .filter(|(_, (_, v))| v.0)
            .map(|(e, _)| e)
            .collect();
        entities
            .into_iter()
            .filter_map(|entity| {
                let transform = self.world_transform(entity)?;
                let renderable = (*self.world.get::<&Renderable>(entity).ok()?).clone();
                let opacity = self.opacity(entity).unwrap_or(1.0);
                Some(Drawable {
                    entity,
                    transform,
                    renderable,
                    opacity,
                })
            })
            .collect()
    }
}
