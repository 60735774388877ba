//! Deterministic city generation and chunk streaming.
//!
//! The city is an unbounded grid of square chunks. Each chunk's contents
//! are a pure function of its coordinates, so revisiting an evicted chunk
//! reproduces it exactly. The `ChunkMap` resource tracks which chunks are
//! resident around the player and records per-tick build/evict deltas for
//! the rendering collaborator to drain.

use bevy::prelude::*;
use std::collections::HashMap;

/// Side length of one chunk in world units.
pub const CHUNK_SIZE: f32 = 100.0;

/// Chebyshev radius of resident chunks around the player's chunk.
pub const RENDER_CHUNKS: i32 = 5;

/// Hash values below this leave the quadrant as an empty lot.
pub const EMPTY_LOT_THRESHOLD: f32 = 0.15;

/// Seed folded into every chunk hash.
pub const WORLD_SEED: f64 = 42.0;

// Road layout inside a chunk, in chunk-local units. Two road strips cross
// at the chunk center; sidewalks run alongside; dashed center lines repeat
// along each strip.
pub const ROAD_WIDTH: f32 = 12.0;
pub const SIDEWALK_WIDTH: f32 = 2.0;
pub const SIDEWALK_OFFSET: f32 = 7.0;
pub const LANE_DASH_LENGTH: f32 = 6.0;
pub const LANE_DASH_WIDTH: f32 = 0.25;
pub const LANE_DASH_SPACING: f32 = 10.0;

/// Chunk-local centers of the four buildable quadrants.
pub const QUADRANT_CENTERS: [Vec2; 4] = [
    Vec2::new(25.0, 25.0),
    Vec2::new(25.0, -25.0),
    Vec2::new(-25.0, 25.0),
    Vec2::new(-25.0, -25.0),
];

/// Facade palette a building's `palette` index selects into.
pub fn palette_color(index: usize) -> Color {
    match index {
        0 => Color::srgb(0.53, 0.60, 0.67),
        1 => Color::srgb(0.40, 0.47, 0.53),
        2 => Color::srgb(0.60, 0.67, 0.73),
        3 => Color::srgb(0.33, 0.40, 0.47),
        4 => Color::srgb(0.67, 0.73, 0.80),
        5 => Color::srgb(0.48, 0.55, 0.44),
        6 => Color::srgb(0.77, 0.66, 0.51),
        _ => Color::srgb(0.61, 0.48, 0.37),
    }
}

/// Chunk-local dash center offsets along a road strip.
pub fn lane_dash_offsets() -> impl Iterator<Item = f32> {
    (0..10).map(|i| -45.0 + i as f32 * LANE_DASH_SPACING)
}

/// Integer chunk coordinate.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing a world position. Chunks are centered on the grid,
    /// so this rounds rather than floors.
    pub fn from_world_pos(x: f32, z: f32) -> Self {
        Self {
            x: (x / CHUNK_SIZE).round() as i32,
            z: (z / CHUNK_SIZE).round() as i32,
        }
    }

    /// World-space center of this chunk.
    pub fn world_pos(&self) -> Vec3 {
        Vec3::new(self.x as f32 * CHUNK_SIZE, 0.0, self.z as f32 * CHUNK_SIZE)
    }

    pub fn chebyshev_distance(&self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

/// Stateless hash in [0, 1) for slot `index` of chunk `(cx, cz)`.
/// Fract-of-scaled-sine over a linear mix of the inputs; cheap, stable,
/// and good enough for lot layout.
pub fn chunk_hash(cx: i32, cz: i32, index: i32) -> f32 {
    let mixed =
        cx as f64 * 9301.0 + cz as f64 * 49297.0 + index as f64 * 233.0 + WORLD_SEED;
    let s = mixed.sin() * 43758.5453123;
    (s - s.floor()) as f32
}

/// One procedurally placed building. `offset` is relative to the quadrant
/// center, `palette` indexes [`palette_color`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildingDescriptor {
    pub height: f32,
    pub width: f32,
    pub depth: f32,
    pub palette: usize,
    pub offset: Vec2,
}

/// Generated contents of one chunk. Quadrants below the empty-lot
/// threshold hold `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub buildings: [Option<BuildingDescriptor>; 4],
}

pub fn generate_chunk(coord: ChunkCoord) -> Chunk {
    let mut buildings = [None; 4];
    for (quadrant, slot) in buildings.iter_mut().enumerate() {
        let base = quadrant as i32 * 10;
        if chunk_hash(coord.x, coord.z, base) < EMPTY_LOT_THRESHOLD {
            continue;
        }
        let height = 8.0 + chunk_hash(coord.x, coord.z, base + 1) * 50.0;
        let width = 14.0 + chunk_hash(coord.x, coord.z, base + 2) * 22.0;
        let depth = 14.0 + chunk_hash(coord.x, coord.z, base + 3) * 22.0;
        let palette = ((chunk_hash(coord.x, coord.z, base + 4) * 8.0) as usize).min(7);
        let offset = Vec2::new(
            (chunk_hash(coord.x, coord.z, base + 5) - 0.5) * 12.0,
            (chunk_hash(coord.x, coord.z, base + 6) - 0.5) * 12.0,
        );
        *slot = Some(BuildingDescriptor {
            height,
            width,
            depth,
            palette,
            offset,
        });
    }
    Chunk { coord, buildings }
}

/// Resident chunk cache keyed by coordinate.
///
/// `update_residency` is called once per tick with the authoritative player
/// position; it fills the Chebyshev ball of radius [`RENDER_CHUNKS`] and
/// evicts everything outside it. The `built`/`evicted` delta lists
/// accumulate until the renderer drains them.
#[derive(Resource, Default)]
pub struct ChunkMap {
    chunks: HashMap<ChunkCoord, Chunk>,
    built: Vec<ChunkCoord>,
    evicted: Vec<ChunkCoord>,
    generated_total: u64,
}

impl ChunkMap {
    pub fn update_residency(&mut self, focus_x: f32, focus_z: f32) {
        self.update_residency_with_radius(focus_x, focus_z, RENDER_CHUNKS);
    }

    pub fn update_residency_with_radius(&mut self, focus_x: f32, focus_z: f32, radius: i32) {
        let focus = ChunkCoord::from_world_pos(focus_x, focus_z);

        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let coord = ChunkCoord::new(focus.x + dx, focus.z + dz);
                if !self.chunks.contains_key(&coord) {
                    self.chunks.insert(coord, generate_chunk(coord));
                    self.generated_total += 1;
                    self.built.push(coord);
                }
            }
        }

        let out_of_range: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|coord| coord.chebyshev_distance(focus) > radius)
            .copied()
            .collect();
        for coord in out_of_range {
            self.chunks.remove(&coord);
            self.evicted.push(coord);
        }
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn is_resident(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn resident_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total chunks ever generated; stays flat while the focus is still.
    pub fn generated_total(&self) -> u64 {
        self.generated_total
    }

    /// Chunks built since the last drain, for the renderer to attach.
    pub fn drain_built(&mut self) -> Vec<ChunkCoord> {
        std::mem::take(&mut self.built)
    }

    /// Chunks evicted since the last drain, for the renderer to detach.
    pub fn drain_evicted(&mut self) -> Vec<ChunkCoord> {
        std::mem::take(&mut self.evicted)
    }

    pub fn clear(&mut self) {
        let resident: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        self.evicted.extend(resident);
        self.chunks.clear();
        self.built.clear();
    }
}
