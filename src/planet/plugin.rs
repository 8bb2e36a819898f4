use super::map::TileMap;
use crate::tiles::WrapBehavior;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Plugin that owns the planet [`TileMap`] resource
pub struct TileMapPlugin;

impl Plugin for TileMapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TileMapConfig>()
            .add_systems(Startup, setup_tile_map)
            .add_systems(
                Update,
                (
                    sort_chunks_by_usage.run_if(resource_exists::<SortTimer>),
                    log_tile_map_stats.after(sort_chunks_by_usage),
                ),
            );
    }
}

/// Configuration for the planet tile map
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMapConfig {
    /// Map width in tiles (multiple of 16)
    pub width: u32,
    /// Map height in tiles (multiple of 16)
    pub height: u32,
    pub wrap: WrapBehavior,
    /// Seconds between automatic usage sorts. `None` leaves sorting to the caller.
    pub sort_interval: Option<f32>,
    /// Clear chunk usage after each automatic sort, so ranking reflects recent access
    pub decay_usage: bool,
    /// Log map statistics every frame at debug level
    pub log_stats: bool,
}

impl Default for TileMapConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 256,
            wrap: WrapBehavior::NoWrap,
            sort_interval: None,
            decay_usage: false,
            log_stats: false,
        }
    }
}

/// Timer driving automatic chunk reordering
#[derive(Resource, Deref, DerefMut)]
pub struct SortTimer(pub Timer);

/// Startup system that builds the tile map from its config
pub fn setup_tile_map(mut commands: Commands, config: Res<TileMapConfig>) {
    let map = match TileMap::new(config.width, config.height) {
        Ok(map) => map.with_wrap(config.wrap),
        Err(e) => {
            error!("Failed to create tile map: {}", e);
            return;
        }
    };

    info!(
        "Created {}x{} tile map ({}x{} chunks, {:?})",
        map.width(),
        map.height(),
        map.chunk_columns(),
        map.chunk_rows(),
        map.wrap()
    );
    commands.insert_resource(map);

    if let Some(interval) = config.sort_interval {
        commands.insert_resource(SortTimer(Timer::from_seconds(
            interval,
            TimerMode::Repeating,
        )));
    }
}

/// System to periodically reorder chunk storage by usage
pub fn sort_chunks_by_usage(
    time: Res<Time>,
    config: Res<TileMapConfig>,
    mut timer: ResMut<SortTimer>,
    map: Option<ResMut<TileMap>>,
) {
    timer.tick(time.delta());
    if !timer.just_finished() {
        return;
    }
    if let Some(mut map) = map {
        map.sort_by_usage();
        if config.decay_usage {
            map.reset_usage();
        }
    }
}

/// System to log tile map statistics for debugging
pub fn log_tile_map_stats(config: Res<TileMapConfig>, map: Option<Res<TileMap>>) {
    if !config.log_stats {
        return;
    }
    if let Some(map) = map {
        debug!("Tile map stats: {}", map.stats());
    }
}
