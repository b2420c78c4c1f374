use crate::layout::Point;

/// Handle to a tile slot in a [`TileArena`]
///
/// Handles are only held by the board's cell array, so a slot can be
/// recycled as soon as its tile is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(usize);

/// Which scale animation a tile is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalePhase {
    /// Freshly spawned, scaling up from nothing to full size
    Growing,
    /// Freshly merged, shrinking back from an overshoot to full size
    Popping,
    Settled,
}

/// On-screen state of a tile, independent of its logical cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileVisual {
    /// Top-left pixel; `None` until the animation layer first places the tile
    pub position: Option<Point>,
    pub scale: f32,
    pub phase: ScalePhase,
}

impl TileVisual {
    pub fn spawned() -> Self {
        TileVisual {
            position: None,
            scale: 0.0,
            phase: ScalePhase::Growing,
        }
    }

    /// Full size until placed; the animation layer applies the pop overshoot on placement
    pub fn merged() -> Self {
        TileVisual {
            position: None,
            scale: 1.0,
            phase: ScalePhase::Popping,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub value: u32,
    pub row: usize,
    pub col: usize,
    pub visual: TileVisual,
}

impl Tile {
    pub fn new(value: u32, row: usize, col: usize, visual: TileVisual) -> Self {
        Tile {
            value,
            row,
            col,
            visual,
        }
    }
}

/// Dense tile storage indexed by [`TileId`]
#[derive(Debug, Clone, Default)]
pub struct TileArena {
    slots: Vec<Option<Tile>>,
    free: Vec<usize>,
    len: usize,
}

impl TileArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tile: Tile) -> TileId {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(tile);
                TileId(index)
            }
            None => {
                self.slots.push(Some(tile));
                TileId(self.slots.len() - 1)
            }
        }
    }

    pub fn remove(&mut self, id: TileId) -> Option<Tile> {
        let tile = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(tile)
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.slots.get(id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }
}
