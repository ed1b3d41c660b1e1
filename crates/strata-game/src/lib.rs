//! A playable session over a streamed voxel world.
//!
//! [`Session::tick`] runs the per-tick pipeline in a fixed order: streaming
//! around the body, break/place interaction, movement with collision, then
//! visibility culling. Later stages read the chunk store that earlier stages
//! just updated, so the order is part of the contract.

mod interaction;
mod look;
mod session;

pub use interaction::{InteractionOutcome, break_block, cell_overlaps_body, place_block};
pub use look::Look;
pub use session::{Session, TickInput, TickOutput};
