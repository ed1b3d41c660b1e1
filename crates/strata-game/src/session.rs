//! One player in one world, advanced a tick at a time.

use glam::{IVec3, Vec2, Vec3};
use strata_config::{Config, InteractionConfig};
use strata_physics::{
    MoveIntent, MovingBody, PhysicsConfig, RaycastHit, StepReport, apply_move_intent, raycast,
    step_collision,
};
use strata_storage::StorageBackend;
use strata_visibility::{CullStats, DrawableFace, RenderConfig, ViewFrustum, cull_and_light};
use strata_voxel::{ChunkCoord, VoxelKind, VoxelRead, chunk_origin};
use strata_world::{SaveSummary, StreamingReport, World, WorldError};

use crate::interaction::{InteractionOutcome, break_block, place_block};
use crate::look::Look;

/// Input for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickInput {
    /// Seconds since the previous tick.
    pub dt: f32,
    pub intent: MoveIntent,
    /// `(yaw, pitch)` change in radians.
    pub look_delta: Vec2,
    /// Break the looked-at block.
    pub break_block: bool,
    /// Place the selected kind against the looked-at block.
    pub place_block: bool,
    /// New kind for placing.
    pub select: Option<VoxelKind>,
    pub toggle_flight: bool,
    pub toggle_noclip: bool,
    /// Move the body here before anything else happens.
    pub teleport: Option<Vec3>,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            intent: MoveIntent::default(),
            look_delta: Vec2::ZERO,
            break_block: false,
            place_block: false,
            select: None,
            toggle_flight: false,
            toggle_noclip: false,
            teleport: None,
        }
    }
}

/// What one tick did. Drawable faces are in [`Session::faces`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickOutput {
    pub streaming: StreamingReport,
    pub interaction: InteractionOutcome,
    /// The block under the crosshair after this tick's edits.
    pub highlight: Option<RaycastHit>,
    pub step: StepReport,
    pub cull: CullStats,
}

/// A body, its view and the world it moves through.
pub struct Session {
    world: World,
    body: MovingBody,
    look: Look,
    physics: PhysicsConfig,
    render: RenderConfig,
    interaction: InteractionConfig,
    faces: Vec<DrawableFace>,
    ticks: u64,
}

impl Session {
    /// Starts a session in `world` with the body's feet at `spawn`.
    pub fn new(world: World, config: &Config, spawn: Vec3) -> Self {
        Self {
            world,
            body: MovingBody::new(spawn),
            look: Look::default(),
            physics: config.physics.clone(),
            render: config.render.clone(),
            interaction: config.interaction.clone(),
            faces: Vec::new(),
            ticks: 0,
        }
    }

    /// Opens the configured world on `backend` and starts a session in it.
    pub fn open(
        config: &Config,
        backend: Box<dyn StorageBackend>,
        spawn: Vec3,
    ) -> Result<Self, WorldError> {
        let world = World::open(&config.world, config.streaming.clone(), backend)?;
        Ok(Self::new(world, config, spawn))
    }

    /// Opens the configured world under its save root on disk.
    pub fn open_on_disk(config: &Config, spawn: Vec3) -> Result<Self, WorldError> {
        let world = World::open_on_disk(&config.world, config.streaming.clone())?;
        Ok(Self::new(world, config, spawn))
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn body(&self) -> &MovingBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut MovingBody {
        &mut self.body
    }

    pub fn look(&self) -> &Look {
        &self.look
    }

    pub fn set_look(&mut self, look: Look) {
        self.look = look;
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    /// Faces produced by the last tick.
    pub fn faces(&self) -> &[DrawableFace] {
        &self.faces
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn eye(&self) -> Vec3 {
        self.body.eye(&self.physics)
    }

    /// View frustum at the body's eye.
    pub fn frustum(&self) -> ViewFrustum {
        ViewFrustum::new(self.eye(), self.look.forward(), &self.render)
    }

    /// Block under the crosshair, if any is within reach.
    pub fn target(&self) -> Option<RaycastHit> {
        raycast(
            &self.world,
            self.eye(),
            self.look.forward(),
            self.interaction.reach,
            self.interaction.ray_step,
        )
    }

    /// Streams around the body, then moves it onto the highest solid cell of
    /// its column among resident chunks.
    ///
    /// Returns `false` (and leaves the body where it is) if the column is
    /// empty.
    pub fn drop_to_surface(&mut self) -> Result<bool, WorldError> {
        self.world
            .update_streaming(self.eye(), self.look.forward())?;
        let extent = self.world.extent();
        let column = self.body.position.floor().as_ivec3();
        let mut layers: Vec<i32> = self
            .world
            .store()
            .coords()
            .filter(|c| {
                let o = chunk_origin(*c, extent);
                (o.x..o.x + extent.width()).contains(&column.x)
                    && (o.z..o.z + extent.depth()).contains(&column.z)
            })
            .map(|c| c.y)
            .collect();
        layers.sort_unstable_by(|a, b| b.cmp(a));

        for cy in layers {
            let base = chunk_origin(ChunkCoord::new(0, cy, 0), extent).y;
            for y in (base..base + extent.height()).rev() {
                if self.world.is_solid(IVec3::new(column.x, y, column.z)) {
                    let feet = Vec3::new(self.body.position.x, (y + 1) as f32, self.body.position.z);
                    self.body.teleport(feet);
                    tracing::info!("Spawned on surface at {feet}");
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Advances one tick: stream, interact, move, cull, in that order.
    ///
    /// Streaming runs first so interaction and collision see every chunk
    /// around the body; culling runs last so it draws this tick's edits at
    /// the body's new position.
    pub fn tick(&mut self, input: TickInput) -> Result<TickOutput, WorldError> {
        self.ticks += 1;
        let mut out = TickOutput::default();

        if let Some(pos) = input.teleport {
            self.body.teleport(pos);
            tracing::info!("Teleported to {pos}");
        }
        if input.toggle_flight {
            self.body.toggle_flight();
        }
        if input.toggle_noclip {
            self.body.toggle_noclip();
        }
        match input.select {
            Some(VoxelKind::Empty) => tracing::warn!("Cannot select Empty for placing"),
            Some(kind) => self.body.selected = kind,
            None => {}
        }
        self.look.turn(input.look_delta.x, input.look_delta.y);

        // Stream
        out.streaming = self
            .world
            .update_streaming(self.eye(), self.look.forward())?;

        // Interact
        if (input.break_block || input.place_block)
            && let Some(hit) = self.target()
        {
            if input.break_block {
                out.interaction.broken = Some(break_block(&mut self.world, &hit)?);
            } else {
                out.interaction.placed =
                    place_block(&mut self.world, &hit, &self.body, &self.physics)?;
            }
        }
        out.highlight = self.target();

        // Move
        let right = self.frustum().right;
        apply_move_intent(&mut self.body, &input.intent, right, &self.physics);
        out.step = step_collision(&mut self.body, &self.world, &self.physics, input.dt);

        // Cull
        let frustum = self.frustum();
        let regions = self.world.regions();
        self.faces.clear();
        out.cull = cull_and_light(
            &self.world,
            &regions,
            &frustum,
            self.world.colors(),
            &self.render,
            &mut self.faces,
        );

        Ok(out)
    }

    /// Writes every resident chunk and the world metadata.
    pub fn save(&mut self) -> Result<SaveSummary, WorldError> {
        self.world.world_save()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
