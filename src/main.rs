use bevy::{log::LogPlugin, prelude::*};
use planet_tiles::{
    planet::plugin::setup_tile_map, Tile, TileMap, TileMapConfig, TileMapPlugin, WrapBehavior,
};

// Demo surface
const SURFACE_HEIGHT: i32 = 10;
const TILE_GROUND: Tile = Tile::new(1);
const TILE_STONE: Tile = Tile::new(2);

/// Frames to run before exiting
const DEMO_FRAMES: u32 = 120;

fn main() {
    App::new()
        .add_plugins((MinimalPlugins, LogPlugin::default()))
        .insert_resource(TileMapConfig {
            width: 256,
            height: 64,
            wrap: WrapBehavior::WrapAround,
            sort_interval: Some(0.25),
            decay_usage: true,
            log_stats: false,
        })
        .add_plugins(TileMapPlugin)
        .add_systems(Startup, paint_surface.after(setup_tile_map))
        .add_systems(Update, (wander_probe, exit_after_frames))
        .run();
}

/// Lay a flat strip of ground across the whole planet, stone underneath
fn paint_surface(map: Option<ResMut<TileMap>>) {
    let Some(mut map) = map else {
        return;
    };

    let width = map.width() as i32;
    for x in 0..width {
        for y in 0..SURFACE_HEIGHT {
            let tile = if y == SURFACE_HEIGHT - 1 {
                TILE_GROUND
            } else {
                TILE_STONE
            };
            if let Err(e) = map.set_tile(x, y, tile) {
                warn!("Failed to paint tile ({}, {}): {}", x, y, e);
            }
        }
    }

    info!("Painted surface: {}", map.stats());
}

/// Walk a probe around the planet, reading the chunks it passes over
fn wander_probe(mut frame: Local<i32>, map: Option<ResMut<TileMap>>) {
    let Some(mut map) = map else {
        return;
    };

    *frame += 1;
    // Moves faster than the map is wide so it laps the wrap-around seam
    let x = *frame * 7;
    let chunk_usage = map.get_chunk(x, 0).usage();
    let tile = map.get_tile(x, SURFACE_HEIGHT - 1);
    trace!("Probe at x={} sees {:?} (chunk usage {})", x, tile, chunk_usage);
}

fn exit_after_frames(
    mut frames: Local<u32>,
    map: Option<Res<TileMap>>,
    mut exit: MessageWriter<AppExit>,
) {
    *frames += 1;
    if *frames < DEMO_FRAMES {
        return;
    }

    if let Some(map) = map {
        let hottest: Vec<u32> = map.chunks().iter().take(4).map(|c| c.usage()).collect();
        info!("Final stats: {}, hottest chunks: {:?}", map.stats(), hottest);
    }
    exit.write(AppExit::Success);
}
