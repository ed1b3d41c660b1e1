//! Body movement against the voxel field: collision, input and ray marching.
//!
//! Everything here reads the world through [`strata_voxel::VoxelRead`], so the
//! same code runs against the streamed world, a bounded grid or a bare
//! chunk store in tests.

mod body;
mod collision;
mod movement;
mod raycast;

pub use body::{CollisionShape, MovingBody, PhysicsConfig, bounds_at};
pub use collision::{StepReport, collides, step_collision};
pub use movement::{MoveIntent, apply_move_intent, walk_basis};
pub use raycast::{DEFAULT_RAY_STEP, DEFAULT_REACH, MAX_RAY_SAMPLES, RaycastHit, raycast};
