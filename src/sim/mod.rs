//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Explicit state passed in, no globals
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod level;
pub mod pool;
pub mod state;
pub mod tank;
pub mod tick;

pub use collision::{Aabb, Contact, aabb_contact, circle_overlaps_aabb};
pub use level::{DestructibleGrid, Level, LevelError, SpawnKind, SpawnPoint, TileAdvance};
pub use pool::{Handle, Pool};
pub use state::{Camera, Explosion, GameEvent, GamePhase, GameState, Owner, Projectile};
pub use tank::{DamageOutcome, DriveInput, Tank, TankKind, TankParams};
pub use tick::{TickInput, tick, try_fire};
