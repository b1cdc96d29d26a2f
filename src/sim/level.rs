//! Level descriptions and destructible terrain
//!
//! Levels arrive as Tiled-style JSON: a static `ground` tile layer, a
//! dynamic `destructable` layer whose cells walk an ordered damage-state
//! sequence, and an `objects` layer of typed spawn points. Object custom
//! properties come in two encodings (array-of-{name,value} from Tiled
//! >= 1.3, plain map from older exports) and are flattened before use.
//!
//! Loading is the crate's only fallible path.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::collision::Aabb;

/// Layer and object names the loader expects
const LAYER_GROUND: &str = "ground";
const LAYER_DESTRUCTIBLE: &str = "destructable";
const LAYER_OBJECTS: &str = "objects";

/// Errors surfaced while loading a level
#[derive(Debug)]
pub enum LevelError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// A required layer is absent from the map
    MissingLayer(&'static str),
    /// The object layer carries no `playerSpawn`
    NoPlayerSpawn,
    /// The map declares no tileset
    NoTileset,
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io(e) => write!(f, "level io error: {e}"),
            LevelError::Parse(e) => write!(f, "level parse error: {e}"),
            LevelError::MissingLayer(name) => write!(f, "level is missing layer '{name}'"),
            LevelError::NoPlayerSpawn => write!(f, "level has no playerSpawn object"),
            LevelError::NoTileset => write!(f, "level declares no tileset"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io(e) => Some(e),
            LevelError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::Io(e)
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Parse(e)
    }
}

// --- Raw JSON shapes ---

#[derive(Debug, Deserialize)]
struct RawMap {
    width: u32,
    height: u32,
    tilewidth: u32,
    layers: Vec<RawLayer>,
    #[serde(default)]
    tilesets: Vec<RawTileset>,
}

#[derive(Debug, Deserialize)]
struct RawLayer {
    name: String,
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    objects: Vec<RawObject>,
}

#[derive(Debug, Deserialize)]
struct RawObject {
    #[serde(rename = "type", default)]
    kind: String,
    x: f32,
    y: f32,
    #[serde(default)]
    properties: Option<PropertyBag>,
}

#[derive(Debug, Deserialize)]
struct RawTileset {
    firstgid: u32,
    #[serde(default)]
    tilecount: u32,
    /// Per-tile custom properties keyed by local tile id
    #[serde(default)]
    tileproperties: BTreeMap<String, BTreeMap<String, Value>>,
}

/// Either encoding of Tiled custom properties
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PropertyBag {
    /// Tiled >= 1.3: `[{ "name": ..., "value": ... }]`
    List(Vec<NamedProperty>),
    /// Tiled <= 1.2.5: `{ name: value }`
    Map(BTreeMap<String, Value>),
}

#[derive(Debug, Deserialize)]
struct NamedProperty {
    name: String,
    value: Value,
}

impl PropertyBag {
    /// Collapse either encoding into plain key/value pairs
    fn flatten(self) -> BTreeMap<String, Value> {
        match self {
            PropertyBag::Map(map) => map,
            PropertyBag::List(list) => {
                list.into_iter().map(|p| (p.name, p.value)).collect()
            }
        }
    }
}

// --- Processed level ---

/// Spawn point variant, selected by the object's type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Player,
    Enemy,
    Boss,
    Fast,
}

impl SpawnKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "playerSpawn" => Some(SpawnKind::Player),
            "enemySpawn" => Some(SpawnKind::Enemy),
            "bossSpawn" => Some(SpawnKind::Boss),
            "fastSpawn" => Some(SpawnKind::Fast),
            _ => None,
        }
    }
}

/// A typed spawn point with flattened custom properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub kind: SpawnKind,
    pub pos: Vec2,
    pub props: BTreeMap<String, Value>,
}

/// A parsed level, ready to build a game state from
#[derive(Debug, Clone)]
pub struct Level {
    /// Map size in tiles
    pub width: u32,
    pub height: u32,
    /// Square tile edge length in world units
    pub tile_size: f32,
    /// Static background layer (global tile ids, 0 = empty)
    pub ground: Vec<u32>,
    /// Initial destructible layer (global tile ids, 0 = empty)
    pub destructible: Vec<u32>,
    /// Tileset metadata for the destructible layer
    pub first_gid: u32,
    pub tile_count: u32,
    /// `collides` flag per local tile id, where declared
    pub tile_collides: BTreeMap<u32, bool>,
    pub spawns: Vec<SpawnPoint>,
}

impl Level {
    /// Parse a level from Tiled-style JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let raw: RawMap = serde_json::from_str(json)?;

        let tileset = raw.tilesets.first().ok_or(LevelError::NoTileset)?;
        let first_gid = tileset.firstgid;
        let tile_count = tileset.tilecount;

        let mut tile_collides = BTreeMap::new();
        for (local_id, props) in &tileset.tileproperties {
            let Ok(local_id) = local_id.parse::<u32>() else {
                log::warn!("ignoring non-numeric tile id '{local_id}' in tileset");
                continue;
            };
            if let Some(Value::Bool(collides)) = props.get("collides") {
                tile_collides.insert(local_id, *collides);
            }
        }

        let mut ground = None;
        let mut destructible = None;
        let mut spawns = Vec::new();

        for layer in raw.layers {
            match layer.name.as_str() {
                LAYER_GROUND => ground = Some(layer.data),
                LAYER_DESTRUCTIBLE => destructible = Some(layer.data),
                LAYER_OBJECTS => {
                    for object in layer.objects {
                        let Some(kind) = SpawnKind::from_tag(&object.kind) else {
                            log::warn!("ignoring object of unknown type '{}'", object.kind);
                            continue;
                        };
                        spawns.push(SpawnPoint {
                            kind,
                            pos: Vec2::new(object.x, object.y),
                            props: object
                                .properties
                                .map(PropertyBag::flatten)
                                .unwrap_or_default(),
                        });
                    }
                }
                other => log::debug!("ignoring layer '{other}'"),
            }
        }

        let level = Self {
            width: raw.width,
            height: raw.height,
            tile_size: raw.tilewidth as f32,
            ground: ground.ok_or(LevelError::MissingLayer(LAYER_GROUND))?,
            destructible: destructible.ok_or(LevelError::MissingLayer(LAYER_DESTRUCTIBLE))?,
            first_gid,
            tile_count,
            tile_collides,
            spawns,
        };

        if !level.spawns.iter().any(|s| s.kind == SpawnKind::Player) {
            return Err(LevelError::NoPlayerSpawn);
        }
        Ok(level)
    }

    /// Read and parse a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// World-space extent of the map
    pub fn world_bounds(&self) -> Aabb {
        Aabb::from_min_max(
            Vec2::ZERO,
            Vec2::new(
                self.width as f32 * self.tile_size,
                self.height as f32 * self.tile_size,
            ),
        )
    }
}

/// Result of advancing a destructible cell's damage state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileAdvance {
    /// Cell moved to its successor state
    Advanced { collides: bool },
    /// No successor exists; cell unchanged
    Terminal,
    /// No destructible tile at that cell
    Empty,
}

/// One destructible cell
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Cell {
    /// Global tile id, 0 when the cell is open ground
    gid: u32,
    collides: bool,
}

/// The mutable destructible layer at runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestructibleGrid {
    width: u32,
    height: u32,
    tile_size: f32,
    first_gid: u32,
    tile_count: u32,
    tile_collides: BTreeMap<u32, bool>,
    cells: Vec<Cell>,
}

impl DestructibleGrid {
    /// Build the runtime grid from a parsed level. Initial collidability
    /// comes from each tile's declared `collides` property.
    pub fn from_level(level: &Level) -> Self {
        let cells = level
            .destructible
            .iter()
            .map(|&gid| {
                let collides = gid
                    .checked_sub(level.first_gid)
                    .and_then(|local| level.tile_collides.get(&local).copied())
                    .unwrap_or(false);
                Cell { gid, collides }
            })
            .collect();
        Self {
            width: level.width,
            height: level.height,
            tile_size: level.tile_size,
            first_gid: level.first_gid,
            tile_count: level.tile_count,
            tile_collides: level.tile_collides.clone(),
            cells,
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    /// Cell coordinates containing a world position
    pub fn cell_at(&self, pos: Vec2) -> Option<(u32, u32)> {
        if pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let x = (pos.x / self.tile_size) as u32;
        let y = (pos.y / self.tile_size) as u32;
        (x < self.width && y < self.height).then_some((x, y))
    }

    pub fn is_solid(&self, x: u32, y: u32) -> bool {
        self.index(x, y)
            .and_then(|i| self.cells.get(i))
            .is_some_and(|c| c.gid != 0 && c.collides)
    }

    /// World-space box of a cell
    pub fn cell_rect(&self, x: u32, y: u32) -> Aabb {
        let min = Vec2::new(x as f32, y as f32) * self.tile_size;
        Aabb::from_min_max(min, min + Vec2::splat(self.tile_size))
    }

    /// Solid cell rects overlapping `rect`, for movement resolution
    pub fn solid_rects_near(&self, rect: &Aabb) -> Vec<(u32, u32, Aabb)> {
        let min = (rect.min() / self.tile_size).floor().max(Vec2::ZERO);
        let max = (rect.max() / self.tile_size).ceil();
        let (x0, y0) = (min.x as u32, min.y as u32);
        let (x1, y1) = (
            (max.x as u32).min(self.width),
            (max.y as u32).min(self.height),
        );

        let mut out = Vec::new();
        for y in y0..y1 {
            for x in x0..x1 {
                if self.is_solid(x, y) {
                    out.push((x, y, self.cell_rect(x, y)));
                }
            }
        }
        out
    }

    /// Advance a struck cell to its next damage state. The successor tile
    /// is the next local id in the tileset; its `collides` property, when
    /// declared, replaces the cell's flag, otherwise the flag is retained.
    pub fn advance(&mut self, x: u32, y: u32) -> TileAdvance {
        let Some(i) = self.index(x, y) else {
            return TileAdvance::Empty;
        };
        let Some(cell) = self.cells.get(i).copied() else {
            return TileAdvance::Empty;
        };
        if cell.gid < self.first_gid {
            return TileAdvance::Empty;
        }

        let next_local = cell.gid - self.first_gid + 1;
        if next_local >= self.tile_count {
            // Terminal damage state: stays as configured
            return TileAdvance::Terminal;
        }

        let collides = match self.tile_collides.get(&next_local) {
            Some(&declared) => declared,
            None => {
                // Tolerated: successor lacks metadata, keep prior flag
                log::debug!("tile ({x},{y}) advanced to local id {next_local} with no metadata");
                cell.collides
            }
        };

        self.cells[i] = Cell {
            gid: self.first_gid + next_local,
            collides,
        };
        TileAdvance::Advanced { collides }
    }
}
