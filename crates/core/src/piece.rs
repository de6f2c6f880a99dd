//! Piece module - shape catalog and table-driven rotation
//!
//! A piece is a 4x4 local grid of 16 slots, indexed `y * 4 + x` with `y` growing
//! upward. Each live piece owns exactly four [`Block`]s. Rotation is a fixed
//! lookup of slot moves per (shape, rotation state, direction); the layouts are
//! hand-placed rather than matrix rotations of a uniform grid, so no geometry is
//! derived at runtime.
//!
//! Rotation state numbering: anticlockwise steps `0 -> 1 -> 2 -> 3 -> 0`,
//! clockwise steps the other way. I/S/Z only toggle between 0 and 1 and treat
//! both directions the same. O never changes.

use crate::types::{ShapeKind, Spin, LOCAL_GRID, PIECE_SLOTS};

/// One occupied cell
///
/// The tag is opaque to the simulation and survives commit and line collapse,
/// which lets hosts track individual blocks (e.g. for animation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    pub kind: ShapeKind,
    pub tag: u32,
}

impl Block {
    pub fn new(kind: ShapeKind, tag: u32) -> Self {
        Self { kind, tag }
    }
}

/// Slot contents
pub type Slot = Option<Block>;

/// A single slot move: `(source, destination)`; the source is emptied.
type SlotMove = (u8, u8);

/// Spawn layouts (rotation state 0) and tight bounding sizes
fn spawn_layout(kind: ShapeKind) -> ([u8; 4], (u8, u8)) {
    match kind {
        ShapeKind::O => ([5, 6, 9, 10], (2, 2)),
        ShapeKind::I => ([8, 9, 10, 11], (4, 1)),
        ShapeKind::S => ([5, 6, 10, 11], (3, 2)),
        ShapeKind::Z => ([6, 7, 9, 10], (3, 2)),
        ShapeKind::L => ([5, 9, 10, 11], (3, 2)),
        ShapeKind::J => ([7, 9, 10, 11], (3, 2)),
        ShapeKind::T => ([6, 9, 10, 11], (3, 2)),
    }
}

/// Anticlockwise slot moves out of `state`
fn anticlockwise_moves(kind: ShapeKind, state: u8) -> &'static [SlotMove] {
    match (kind, state) {
        (ShapeKind::O, _) => &[],

        (ShapeKind::I, 0) => &[(8, 2), (9, 6), (11, 14)],
        (ShapeKind::I, _) => &[(2, 8), (6, 9), (14, 11)],

        (ShapeKind::S, 0) => &[(5, 7), (6, 14)],
        (ShapeKind::S, _) => &[(7, 5), (14, 6)],

        (ShapeKind::Z, 0) => &[(7, 15), (9, 11)],
        (ShapeKind::Z, _) => &[(15, 7), (11, 9)],

        (ShapeKind::L, 0) => &[(5, 7), (9, 6), (11, 14)],
        (ShapeKind::L, 1) => &[(7, 15), (6, 11), (14, 9)],
        (ShapeKind::L, 2) => &[(15, 13), (11, 14), (9, 6)],
        (ShapeKind::L, _) => &[(13, 5), (14, 9), (6, 11)],

        (ShapeKind::J, 0) => &[(7, 15), (11, 14), (9, 6)],
        (ShapeKind::J, 1) => &[(15, 13), (14, 9), (6, 11)],
        (ShapeKind::J, 2) => &[(13, 5), (9, 6), (11, 14)],
        (ShapeKind::J, _) => &[(5, 7), (6, 11), (14, 9)],

        (ShapeKind::T, 0) => &[(9, 14)],
        (ShapeKind::T, 1) => &[(6, 9)],
        (ShapeKind::T, 2) => &[(11, 6)],
        (ShapeKind::T, _) => &[(14, 11)],
    }
}

/// Clockwise slot moves out of `state` (L/J/T only; I/S/Z reuse anticlockwise)
fn clockwise_moves(kind: ShapeKind, state: u8) -> &'static [SlotMove] {
    match (kind, state) {
        (ShapeKind::O, _) => &[],
        (ShapeKind::I | ShapeKind::S | ShapeKind::Z, _) => anticlockwise_moves(kind, state),

        (ShapeKind::L, 0) => &[(5, 13), (9, 14), (11, 6)],
        (ShapeKind::L, 1) => &[(7, 5), (6, 9), (14, 11)],
        (ShapeKind::L, 2) => &[(15, 7), (11, 6), (9, 14)],
        (ShapeKind::L, _) => &[(13, 15), (14, 11), (6, 9)],

        (ShapeKind::J, 0) => &[(7, 5), (11, 6), (9, 14)],
        (ShapeKind::J, 1) => &[(15, 7), (14, 11), (6, 9)],
        (ShapeKind::J, 2) => &[(13, 15), (9, 14), (11, 6)],
        (ShapeKind::J, _) => &[(5, 13), (6, 9), (14, 11)],

        (ShapeKind::T, 0) => &[(11, 14)],
        (ShapeKind::T, 1) => &[(14, 9)],
        (ShapeKind::T, 2) => &[(9, 6)],
        (ShapeKind::T, _) => &[(6, 11)],
    }
}

/// Slot moves for one rotation step
pub fn rotation_moves(kind: ShapeKind, state: u8, spin: Spin) -> &'static [(u8, u8)] {
    match spin {
        Spin::Clockwise => clockwise_moves(kind, state),
        Spin::Anticlockwise => anticlockwise_moves(kind, state),
    }
}

/// Local (x, y) of a slot index
#[inline]
pub fn slot_xy(slot: usize) -> (i8, i8) {
    let g = LOCAL_GRID as usize;
    ((slot % g) as i8, (slot / g) as i8)
}

/// Falling, queued, held or shadow piece
///
/// Pieces are reused in place: `create` repopulates, `clear` empties. Nothing is
/// heap allocated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Piece {
    kind: Option<ShapeKind>,
    rotation: u8,
    slots: [Slot; PIECE_SLOTS],
    x: i8,
    y: i8,
    visible_width: u8,
    visible_height: u8,
    display_offset: (f32, f32),
}

impl Piece {
    /// Create an empty piece
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a populated piece at the origin
    pub fn of(kind: ShapeKind) -> Self {
        let mut piece = Self::new();
        piece.create(kind);
        piece
    }

    /// Reset and populate with the rotation-0 layout of `kind`
    ///
    /// All four blocks carry tag 0; see [`Piece::create_tagged`].
    pub fn create(&mut self, kind: ShapeKind) {
        self.create_tagged(kind, 0);
    }

    /// Reset and populate, stamping every block with `tag`
    pub fn create_tagged(&mut self, kind: ShapeKind, tag: u32) {
        self.clear();
        let (slots, (w, h)) = spawn_layout(kind);
        for slot in slots {
            self.slots[slot as usize] = Some(Block::new(kind, tag));
        }
        self.kind = Some(kind);
        self.visible_width = w;
        self.visible_height = h;
    }

    /// Empty every slot and forget the shape (anchor is kept)
    pub fn clear(&mut self) {
        self.kind = None;
        self.rotation = 0;
        self.slots = [None; PIECE_SLOTS];
        self.visible_width = 0;
        self.visible_height = 0;
        self.display_offset = (0.0, 0.0);
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
    }

    pub fn kind(&self) -> Option<ShapeKind> {
        self.kind
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn x(&self) -> i8 {
        self.x
    }

    pub fn y(&self) -> i8 {
        self.y
    }

    pub fn position(&self) -> (i8, i8) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, x: i8, y: i8) {
        self.x = x;
        self.y = y;
    }

    /// Shift the anchor
    pub fn translate(&mut self, dx: i8, dy: i8) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }

    pub fn visible_size(&self) -> (u8, u8) {
        (self.visible_width, self.visible_height)
    }

    pub fn slots(&self) -> &[Slot; PIECE_SLOTS] {
        &self.slots
    }

    /// Occupied local cells as `(x, y, block)`
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8, Block)> + '_ {
        self.slots.iter().enumerate().filter_map(|(slot, cell)| {
            cell.map(|block| {
                let (x, y) = slot_xy(slot);
                (x, y, block)
            })
        })
    }

    /// Occupied cells translated into board space
    pub fn board_cells(&self) -> impl Iterator<Item = (i8, i8, Block)> + '_ {
        self.cells()
            .map(move |(x, y, b)| (self.x.saturating_add(x), self.y.saturating_add(y), b))
    }

    pub fn cell_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Bitmask of occupied slots (bit `i` = slot `i`)
    pub fn slot_mask(&self) -> u16 {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .fold(0u16, |mask, (i, _)| mask | (1 << i))
    }

    /// Hand every block over to the caller and leave the piece cleared
    pub fn take_blocks(&mut self) -> [Slot; PIECE_SLOTS] {
        let slots = std::mem::replace(&mut self.slots, [None; PIECE_SLOTS]);
        self.clear();
        slots
    }

    pub fn rotate_clockwise(&mut self) {
        self.rotate(Spin::Clockwise);
    }

    pub fn rotate_anticlockwise(&mut self) {
        self.rotate(Spin::Anticlockwise);
    }

    /// One table-driven rotation step
    pub fn rotate(&mut self, spin: Spin) {
        let Some(kind) = self.kind else {
            return;
        };
        if kind == ShapeKind::O {
            return;
        }

        for &(src, dst) in rotation_moves(kind, self.rotation, spin) {
            self.slots[dst as usize] = self.slots[src as usize].take();
        }

        self.rotation = match (kind.rotation_period(), spin) {
            (2, _) => self.rotation ^ 1,
            (_, Spin::Anticlockwise) => (self.rotation + 1) % 4,
            (_, Spin::Clockwise) => (self.rotation + 3) % 4,
        };
        std::mem::swap(&mut self.visible_width, &mut self.visible_height);
    }

    /// Rotate anticlockwise until the rotation state equals `target`
    ///
    /// Always takes `(target - current) mod period` anticlockwise steps, never
    /// the shorter clockwise path, so a second call with the same target is a no-op.
    ///
    /// `target` is normalized into `0..4` and then into the shape's rotation
    /// period, so the walk always terminates on the requested state.
    pub fn rotate_to(&mut self, target: i32) {
        let Some(kind) = self.kind else {
            return;
        };
        let period = i32::from(kind.rotation_period());
        let target = target.rem_euclid(4).rem_euclid(period);
        let steps = (target - i32::from(self.rotation)).rem_euclid(period);
        for _ in 0..steps {
            self.rotate_anticlockwise();
        }
    }

    /// Recenter the visual anchor on the local origin (previews, hold slot)
    ///
    /// Odd visible extents get a half-cell nudge. Has no effect on collision.
    pub fn move_center_to_origin(&mut self) {
        let half = f32::from(LOCAL_GRID) / 2.0;
        let w = f32::from(self.visible_width);
        let h = f32::from(self.visible_height);
        self.display_offset = (-(half + (w % 2.0) / 2.0), -(half + (h % 2.0) / 2.0));
    }

    /// Cosmetic offset set by [`Piece::move_center_to_origin`]
    pub fn display_offset(&self) -> (f32, f32) {
        self.display_offset
    }
}
