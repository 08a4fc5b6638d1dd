//! The live shape set and the slash and merge protocols that rewrite it.

mod slash;

pub use slash::{cut_outline, expand_line, Slash, SlashReport};

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slotmap::SlotMap;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::geometry::{Line, PaintStyle, Polygon};
use crate::math::{Point2, Vector2};
use crate::operations::GroupByContainment;
use crate::physics::{BodyHandle, ContactEvent, PhysicsWorld};
use crate::shape::{slash_force, CreateShape, MergeShapes, Shape, ShapeSource, ShapeView};

slotmap::new_key_type! {
    /// Unique identifier for a shape in the live set.
    pub struct ShapeId;
}

/// Owns the live shapes and keeps them in step with their physics bodies.
///
/// Every method that changes the set takes the world by `&mut`, so a body
/// removal and the insertion of its replacements happen in one call.
#[derive(Debug)]
pub struct ShapeLifecycle {
    config: EngineConfig,
    shapes: SlotMap<ShapeId, Shape>,
    by_body: HashMap<BodyHandle, ShapeId>,
    slashes: Vec<Slash>,
    rng: StdRng,
}

impl ShapeLifecycle {
    /// Creates an empty lifecycle.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `config` fails validation.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            shapes: SlotMap::with_key(),
            by_body: HashMap::new(),
            slashes: Vec::new(),
            rng,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of live shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    #[must_use]
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Iterates over the live shapes.
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape)> + '_ {
        self.shapes.iter()
    }

    /// Shape owning `body`, if any.
    #[must_use]
    pub fn shape_for_body(&self, body: BodyHandle) -> Option<ShapeId> {
        self.by_body.get(&body).copied()
    }

    /// Transient cut lines, oldest first.
    #[must_use]
    pub fn slashes(&self) -> &[Slash] {
        &self.slashes
    }

    /// World-space outlines of every live shape.
    pub fn views<W: PhysicsWorld>(&self, world: &W) -> Vec<ShapeView> {
        self.shapes
            .values()
            .filter_map(|s| world.body_state(s.body).map(|state| s.view(&state)))
            .collect()
    }

    /// Creates shapes from importer output. Sources that are degenerate,
    /// below the minimum area, or rejected by the world are skipped.
    pub fn import<W: PhysicsWorld>(
        &mut self,
        world: &mut W,
        sources: Vec<ShapeSource>,
    ) -> Vec<ShapeId> {
        let mut created = Vec::with_capacity(sources.len());
        for source in sources {
            let net = source.outer.area() - source.holes.iter().map(Polygon::area).sum::<f64>();
            if net < self.config.min_area {
                debug!(net, "import below minimum area, skipped");
                continue;
            }
            let shape = match CreateShape::new(source.outer, source.holes, source.style).execute(world)
            {
                Ok(shape) => shape,
                Err(e) => {
                    debug!(error = %e, "import skipped");
                    continue;
                }
            };
            if let Some(id) = self.spawn(world, shape, None) {
                created.push(id);
            }
        }
        created
    }

    /// Groups flat outlines (e.g. glyph contours) by containment and imports
    /// each group with `style`.
    pub fn import_outlines<W: PhysicsWorld>(
        &mut self,
        world: &mut W,
        outlines: Vec<Polygon>,
        style: &PaintStyle,
    ) -> Vec<ShapeId> {
        let sources = GroupByContainment::new(outlines)
            .execute()
            .into_iter()
            .map(|g| ShapeSource {
                outer: g.outer,
                holes: g.holes,
                style: style.clone(),
            })
            .collect();
        self.import(world, sources)
    }

    /// Cuts every shape along the drag `a -> b`, extended to
    /// [`EngineConfig::slash_extent`]. A click (`a == b`) does nothing.
    pub fn slash<W: PhysicsWorld>(&mut self, world: &mut W, a: &Point2, b: &Point2) -> SlashReport {
        match expand_line(a, b, self.config.slash_extent) {
            Some(line) => self.slash_line(world, line),
            None => SlashReport::default(),
        }
    }

    /// Cuts every shape along an already extended line.
    ///
    /// A split shape is replaced by the fragments that could be built; its
    /// body is removed even when some (or all) fragments were dropped.
    pub fn slash_line<W: PhysicsWorld>(&mut self, world: &mut W, line: [Point2; 2]) -> SlashReport {
        let mut report = SlashReport::default();
        let Ok(cut) = Line::through(&line[0], &line[1]) else {
            return report;
        };
        self.slashes.push(Slash { line, age: 0 });

        let ids: Vec<ShapeId> = self.shapes.keys().collect();
        for id in ids {
            let Some(shape) = self.shapes.get(id) else {
                continue;
            };
            let Some(state) = world.body_state(shape.body) else {
                debug!("shape without body skipped");
                continue;
            };
            let outer = shape.world_vertices(&state);
            let holes = shape.world_holes(&state);
            let Some(groups) = cut_outline(&outer, &holes, &cut) else {
                continue;
            };
            report.split += 1;
            let style = shape.style.clone();

            let mut fragments = Vec::with_capacity(groups.len());
            for group in groups {
                if group.net_area() < self.config.min_area {
                    debug!(area = group.net_area(), "fragment below minimum area");
                    continue;
                }
                match CreateShape::new(group.outer, group.holes, style.clone()).execute(world) {
                    Ok(fragment) => fragments.push(fragment),
                    Err(e) => {
                        debug!(error = %e, "fragment dropped");
                        report.dropped += 1;
                    }
                }
            }

            self.despawn(world, id);
            for fragment in fragments {
                let kick = world.body_state(fragment.body).map_or_else(Vector2::zeros, |s| {
                    slash_force(
                        &s,
                        &line,
                        self.config.slash_along_ratio,
                        self.config.slash_power,
                    )
                });
                if let Some(new_id) = self.spawn(world, fragment, Some(state.velocity + kick)) {
                    report.created.push(new_id);
                }
            }
        }

        if report.dropped > 0 {
            warn!(
                dropped = report.dropped,
                created = report.created.len(),
                "slash replaced shapes partially"
            );
        }
        report
    }

    /// Per-tick hook: ages slashes and fuses shapes in persistent contact.
    ///
    /// Returns the merged shapes created this tick.
    pub fn after_update<W: PhysicsWorld>(
        &mut self,
        world: &mut W,
        contacts: &[ContactEvent],
    ) -> Vec<ShapeId> {
        for slash in &mut self.slashes {
            slash.age += 1;
        }
        let lifetime = self.config.slash_lifetime;
        self.slashes.retain(|s| s.age < lifetime);

        let mut consumed: HashSet<ShapeId> = HashSet::new();
        let mut merged = Vec::new();
        for contact in contacts {
            if contact.duration < self.config.merge_min_contact_duration {
                continue;
            }
            let (Some(ia), Some(ib)) = (
                self.shape_for_body(contact.a),
                self.shape_for_body(contact.b),
            ) else {
                continue;
            };
            if ia == ib || consumed.contains(&ia) || consumed.contains(&ib) {
                continue;
            }
            let (Some(first), Some(second)) = (self.shapes.get(ia), self.shapes.get(ib)) else {
                continue;
            };

            let op = MergeShapes::new(first, second);
            if !op.is_eligible(world, &self.config) {
                continue;
            }
            if !self.rng.gen_bool(self.config.merge_probability) {
                continue;
            }
            let shape = match op.execute(world, &self.config, &mut self.rng) {
                Ok(shape) => shape,
                Err(e) => {
                    debug!(error = %e, "merge failed, originals kept");
                    continue;
                }
            };

            self.despawn(world, ia);
            self.despawn(world, ib);
            consumed.insert(ia);
            consumed.insert(ib);
            if let Some(id) = self.spawn(world, shape, None) {
                info!(vertices = self.shapes[id].vertices.len(), "shapes merged");
                merged.push(id);
            }
        }
        merged
    }

    /// Removes every shape and forgets all slashes.
    pub fn clear<W: PhysicsWorld>(&mut self, world: &mut W) {
        let ids: Vec<ShapeId> = self.shapes.keys().collect();
        for id in ids {
            self.despawn(world, id);
        }
        self.slashes.clear();
    }

    /// Recolours every live shape.
    pub fn set_style(&mut self, fill_style: &str, stroke_style: &str) {
        for shape in self.shapes.values_mut() {
            fill_style.clone_into(&mut shape.style.fill_style);
            stroke_style.clone_into(&mut shape.style.stroke_style);
        }
    }

    /// Adds a created shape's body to the world and registers the shape.
    fn spawn<W: PhysicsWorld>(
        &mut self,
        world: &mut W,
        shape: Shape,
        velocity: Option<Vector2>,
    ) -> Option<ShapeId> {
        let body = shape.body;
        let added = world.add_body(body).and_then(|()| match velocity {
            Some(v) => world.set_velocity(body, v),
            None => Ok(()),
        });
        if let Err(e) = added {
            debug!(error = %e, "body could not be added");
            if let Err(e) = world.remove_body(body) {
                debug!(error = %e, "orphan body not removed");
            }
            return None;
        }
        let id = self.shapes.insert(shape);
        self.by_body.insert(body, id);
        Some(id)
    }

    /// Unregisters a shape and frees its body.
    fn despawn<W: PhysicsWorld>(&mut self, world: &mut W, id: ShapeId) {
        let Some(shape) = self.shapes.remove(id) else {
            return;
        };
        self.by_body.remove(&shape.body);
        if let Err(e) = world.remove_body(shape.body) {
            debug!(error = %e, "body already gone");
        }
    }
}
