#[macro_use]
extern crate log;

mod export;
mod geo;
mod player;
mod segment;

pub use self::export::{segments_to_geojson, snapshot_to_geojson};
pub use self::geo::{haversine_distance_m, initial_bearing, interpolate_position, path_distance_m};
pub use self::player::{player_for, Player, ReplaySnapshot, DEFAULT_BASE_DURATION_MS};
pub use self::segment::{full_route_segments, visible_segments, Segment};
