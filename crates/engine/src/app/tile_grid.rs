use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::math::{Rect, Vec2};

pub const TILE_WIDTH: f32 = 2.0;
pub const TILE_HEIGHT: f32 = 2.0;

/// One cell of a level grid. Marker tiles are consumed at load time and
/// never collide; only `Solid` participates in collision queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TileCode {
    #[default]
    Blank,
    Solid,
    SpawnMarker,
    GoalMarker,
}

fn tile_code_from_token(token: &str) -> TileCode {
    match token.trim() {
        "0" => TileCode::Solid,
        "1" => TileCode::SpawnMarker,
        "2" => TileCode::GoalMarker,
        _ => TileCode::Blank,
    }
}

#[derive(Debug, Error)]
pub enum TileGridError {
    #[error("failed to read level file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("level source contains no rows")]
    Empty,
}

/// Uniform tile grid addressed by (column, row) indices, row 0 being the
/// topmost world row. World coordinates grow upward, so row indices and
/// world Y run in opposite directions.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<TileCode>,
}

impl TileGrid {
    pub fn from_csv_str(source: &str) -> Result<Self, TileGridError> {
        let rows: Vec<&str> = source
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();
        if rows.is_empty() {
            return Err(TileGridError::Empty);
        }

        let width = rows
            .iter()
            .map(|line| line.split(',').count())
            .max()
            .unwrap_or(0) as u32;
        let height = rows.len() as u32;

        let mut tiles = Vec::with_capacity(width as usize * height as usize);
        for line in rows {
            let mut columns = 0u32;
            for token in line.split(',') {
                tiles.push(tile_code_from_token(token));
                columns += 1;
            }
            // Short rows pad out with blanks so every row spans the full width.
            for _ in columns..width {
                tiles.push(TileCode::Blank);
            }
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, TileGridError> {
        let source = fs::read_to_string(path).map_err(|source| TileGridError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_str(&source)
    }

    /// Built-in 5x5 grid: a solid ring around a spawn marker, open on the
    /// outermost border. Used as the fallback when a level file is missing.
    pub fn test_level() -> Self {
        use TileCode::{Blank as B, SpawnMarker as P, Solid as S};
        let tiles = vec![
            B, B, B, B, B, //
            B, S, S, S, B, //
            B, S, P, S, B, //
            B, S, S, S, B, //
            B, B, B, B, B, //
        ];
        Self {
            width: 5,
            height: 5,
            tiles,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Out-of-range indices read as `Blank` rather than erroring, so
    /// callers can probe freely around the grid edges.
    pub fn tile_at(&self, x: i32, y: i32) -> TileCode {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return TileCode::Blank;
        }
        self.tiles[y as usize * self.width as usize + x as usize]
    }

    /// World position of the center of tile (x, y).
    pub fn world_position_of(&self, x: u32, y: u32) -> Vec2 {
        Vec2 {
            x: x as f32 * TILE_WIDTH + TILE_WIDTH * 0.5,
            y: (self.height as f32 - 1.0 - y as f32) * TILE_HEIGHT + TILE_HEIGHT * 0.5,
        }
    }

    /// Inverse of `world_position_of` for arbitrary world positions. The
    /// result can land outside the grid; `tile_at` treats that as blank.
    pub fn index_of(&self, position: Vec2) -> (i32, i32) {
        let x = (position.x / TILE_WIDTH).floor() as i32;
        let y = self.height as i32 - 1 - (position.y / TILE_HEIGHT).floor() as i32;
        (x, y)
    }

    pub fn tile_rect(&self, x: u32, y: u32) -> Rect {
        Rect::from_center_size(self.world_position_of(x, y), TILE_WIDTH, TILE_HEIGHT)
    }

    pub fn overlaps(&self, query: &Rect, tile_scale: f32) -> bool {
        !self.colliding_tiles(query, tile_scale).is_empty()
    }

    /// Solid tiles whose (optionally scaled) rects overlap the query,
    /// ordered by ascending row then ascending column.
    pub fn colliding_tiles(&self, query: &Rect, tile_scale: f32) -> Vec<(u32, u32)> {
        let (min_x, max_y) = self.index_of(Vec2 {
            x: query.left,
            y: query.bottom,
        });
        let (max_x, min_y) = self.index_of(Vec2 {
            x: query.right,
            y: query.top,
        });

        let start_x = min_x.max(0);
        let end_x = max_x.min(self.width as i32 - 1);
        let start_y = min_y.max(0);
        let end_y = max_y.min(self.height as i32 - 1);

        let mut hits = Vec::new();
        for y in start_y..=end_y {
            for x in start_x..=end_x {
                if self.tile_at(x, y) != TileCode::Solid {
                    continue;
                }
                let tile = self
                    .tile_rect(x as u32, y as u32)
                    .scaled_about_center(tile_scale);
                if tile.overlaps(query) {
                    hits.push((x as u32, y as u32));
                }
            }
        }
        hits
    }

    pub fn spawn_index(&self) -> Option<(u32, u32)> {
        self.find_first(TileCode::SpawnMarker)
    }

    pub fn goal_indices(&self) -> Vec<(u32, u32)> {
        let mut found = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.tile_at(x as i32, y as i32) == TileCode::GoalMarker {
                    found.push((x, y));
                }
            }
        }
        found
    }

    pub fn solid_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|tile| **tile == TileCode::Solid)
            .count()
    }

    pub fn world_bounds(&self) -> Rect {
        Rect {
            left: 0.0,
            right: self.width as f32 * TILE_WIDTH,
            bottom: 0.0,
            top: self.height as f32 * TILE_HEIGHT,
        }
    }

    fn find_first(&self, wanted: TileCode) -> Option<(u32, u32)> {
        for y in 0..self.height {
            for x in 0..self.width {
                if self.tile_at(x as i32, y as i32) == wanted {
                    return Some((x, y));
                }
            }
        }
        None
    }
}
