//! Per-face neighbor connectivity classification.
//!
//! A [`ConnectivityClassifier`] looks at the blocks around one face of a
//! block and produces a [`FaceConnectivity`] descriptor. The classifier is a
//! swappable collaborator; [`NeighborClassifier`] is the default scheme,
//! recording which of the eight in-plane neighbors connect.

use crate::types::{BlockPosition, BlockReader, BlockState, Direction};

/// Width of a serialized face descriptor in bits.
pub const FACE_BITS: u32 = 10;

/// Exclusive upper bound of a serialized face descriptor.
pub const FACE_VALUE_LIMIT: u16 = 1 << FACE_BITS;

/// One of the eight neighbors around a face, as seen looking at the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Neighbor {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Neighbor {
    pub const ALL: [Neighbor; 8] = [
        Neighbor::Up,
        Neighbor::Down,
        Neighbor::Left,
        Neighbor::Right,
        Neighbor::UpLeft,
        Neighbor::UpRight,
        Neighbor::DownLeft,
        Neighbor::DownRight,
    ];

    fn bit(self) -> u16 {
        1 << self as u16
    }

    /// (vertical, horizontal) step in face space: +1 is up / right.
    fn steps(self) -> (i32, i32) {
        match self {
            Neighbor::Up => (1, 0),
            Neighbor::Down => (-1, 0),
            Neighbor::Left => (0, -1),
            Neighbor::Right => (0, 1),
            Neighbor::UpLeft => (1, -1),
            Neighbor::UpRight => (1, 1),
            Neighbor::DownLeft => (-1, -1),
            Neighbor::DownRight => (-1, 1),
        }
    }

    /// The diagonal between a vertical and a horizontal neighbor.
    pub fn diagonal(vertical: Neighbor, horizontal: Neighbor) -> Neighbor {
        match (vertical, horizontal) {
            (Neighbor::Down, Neighbor::Left) => Neighbor::DownLeft,
            (Neighbor::Down, _) => Neighbor::DownRight,
            (_, Neighbor::Left) => Neighbor::UpLeft,
            _ => Neighbor::UpRight,
        }
    }

    /// World position of this neighbor of `pos` on `face`.
    pub fn position(self, pos: BlockPosition, face: Direction) -> BlockPosition {
        let (up, right) = face_plane(face);
        let (v, h) = self.steps();
        let pos = match v {
            1 => pos.neighbor(up),
            -1 => pos.neighbor(up.opposite()),
            _ => pos,
        };
        match h {
            1 => pos.neighbor(right),
            -1 => pos.neighbor(right.opposite()),
            _ => pos,
        }
    }
}

/// World directions pointing "up" and "right" when looking at a face from outside.
pub fn face_plane(face: Direction) -> (Direction, Direction) {
    match face {
        Direction::Up => (Direction::North, Direction::East),
        Direction::Down => (Direction::South, Direction::East),
        Direction::North => (Direction::Up, Direction::West),
        Direction::South => (Direction::Up, Direction::East),
        Direction::West => (Direction::Up, Direction::South),
        Direction::East => (Direction::Up, Direction::North),
    }
}

/// Classified connectivity of one face. Always fits in [`FACE_BITS`] bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FaceConnectivity(u16);

impl FaceConnectivity {
    /// A face with no connections.
    pub const NONE: FaceConnectivity = FaceConnectivity(0);

    /// Wrap a serialized value; None if it does not fit in [`FACE_BITS`] bits.
    pub fn new(value: u16) -> Option<Self> {
        (value < FACE_VALUE_LIMIT).then_some(Self(value))
    }

    pub fn from_neighbors<I>(neighbors: I) -> Self
    where
        I: IntoIterator<Item = Neighbor>,
    {
        Self(neighbors.into_iter().fold(0, |bits, n| bits | n.bit()))
    }

    /// Serialized numeric form, `0 <= value < 1024`.
    pub fn serialized(self) -> u16 {
        self.0
    }

    pub fn connected(self, neighbor: Neighbor) -> bool {
        self.0 & neighbor.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Decides whether a neighbor state counts as the same material.
pub trait ConnectionPredicate {
    fn connects(&self, own: &BlockState, other: &BlockState) -> bool;
}

impl<F> ConnectionPredicate for F
where
    F: Fn(&BlockState, &BlockState) -> bool,
{
    fn connects(&self, own: &BlockState, other: &BlockState) -> bool {
        self(own, other)
    }
}

/// Equivalence predicate plus classification flags, supplied by a behavior.
#[derive(Clone, Copy)]
pub struct ConnectionRules<'a> {
    predicate: &'a dyn ConnectionPredicate,
    /// Compare only block identity, not full state.
    pub ignore_states: bool,
    /// Classify faces even when they are covered by an equivalent block.
    pub connect_inside: bool,
}

impl<'a> ConnectionRules<'a> {
    pub fn new(predicate: &'a dyn ConnectionPredicate) -> Self {
        Self {
            predicate,
            ignore_states: false,
            connect_inside: false,
        }
    }

    pub fn with_ignore_states(mut self, ignore_states: bool) -> Self {
        self.ignore_states = ignore_states;
        self
    }

    pub fn with_connect_inside(mut self, connect_inside: bool) -> Self {
        self.connect_inside = connect_inside;
        self
    }

    /// Whether `other` counts as the same material as `own`.
    pub fn matches(&self, own: &BlockState, other: &BlockState) -> bool {
        (self.ignore_states && own.same_block(other)) || self.predicate.connects(own, other)
    }
}

impl std::fmt::Debug for ConnectionRules<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRules")
            .field("ignore_states", &self.ignore_states)
            .field("connect_inside", &self.connect_inside)
            .finish_non_exhaustive()
    }
}

/// Produces the connectivity descriptor of one face of a block.
pub trait ConnectivityClassifier {
    fn classify(
        &self,
        world: &dyn BlockReader,
        state: &BlockState,
        pos: BlockPosition,
        face: Direction,
        rules: &ConnectionRules<'_>,
    ) -> FaceConnectivity;
}

/// Default classifier: one bit per in-plane neighbor.
///
/// A neighbor is connected when it matches the block and, unless
/// `connect_inside` is set, is not itself covered on that face by another
/// matching block. A face covered by a matching block has no connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighborClassifier;

impl NeighborClassifier {
    fn matches_at(
        world: &dyn BlockReader,
        state: &BlockState,
        pos: BlockPosition,
        rules: &ConnectionRules<'_>,
    ) -> bool {
        world
            .block_state(pos)
            .map(|other| rules.matches(state, other))
            .unwrap_or(false)
    }
}

impl ConnectivityClassifier for NeighborClassifier {
    fn classify(
        &self,
        world: &dyn BlockReader,
        state: &BlockState,
        pos: BlockPosition,
        face: Direction,
        rules: &ConnectionRules<'_>,
    ) -> FaceConnectivity {
        if !rules.connect_inside && Self::matches_at(world, state, pos.neighbor(face), rules) {
            return FaceConnectivity::NONE;
        }

        FaceConnectivity::from_neighbors(Neighbor::ALL.into_iter().filter(|neighbor| {
            let neighbor_pos = neighbor.position(pos, face);
            Self::matches_at(world, state, neighbor_pos, rules)
                && (rules.connect_inside
                    || !Self::matches_at(world, state, neighbor_pos.neighbor(face), rules))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn same_state(own: &BlockState, other: &BlockState) -> bool {
        own == other
    }

    fn world(blocks: &[((i32, i32, i32), &str)]) -> HashMap<BlockPosition, BlockState> {
        blocks
            .iter()
            .map(|((x, y, z), name)| (BlockPosition::new(*x, *y, *z), BlockState::new(*name)))
            .collect()
    }

    #[test]
    fn test_face_plane_is_perpendicular() {
        for face in Direction::ALL {
            let (up, right) = face_plane(face);
            assert_ne!(up.axis(), face.axis());
            assert_ne!(right.axis(), face.axis());
            assert_ne!(up.axis(), right.axis());
        }
    }

    #[test]
    fn test_neighbor_positions() {
        let origin = BlockPosition::new(0, 0, 0);
        assert_eq!(Neighbor::Up.position(origin, Direction::South), BlockPosition::new(0, 1, 0));
        assert_eq!(Neighbor::Right.position(origin, Direction::South), BlockPosition::new(1, 0, 0));
        assert_eq!(Neighbor::Right.position(origin, Direction::North), BlockPosition::new(-1, 0, 0));
        assert_eq!(Neighbor::UpLeft.position(origin, Direction::Up), BlockPosition::new(-1, 0, -1));
        assert_eq!(Neighbor::DownRight.position(origin, Direction::East), BlockPosition::new(0, -1, -1));
    }

    #[test]
    fn test_descriptor_bounds() {
        assert_eq!(FaceConnectivity::new(1023).map(|c| c.serialized()), Some(1023));
        assert_eq!(FaceConnectivity::new(1024), None);
        let all = FaceConnectivity::from_neighbors(Neighbor::ALL);
        assert_eq!(all.serialized(), 0xFF);
        assert!(all.connected(Neighbor::DownLeft));
        assert!(FaceConnectivity::NONE.is_empty());
    }

    #[test]
    fn test_classify_wall() {
        // A 3x3 wall of glass in the XY plane at z = 0
        let mut blocks = Vec::new();
        for x in -1..=1 {
            for y in -1..=1 {
                blocks.push(((x, y, 0), "mod:glass"));
            }
        }
        let world = world(&blocks);
        let state = BlockState::new("mod:glass");
        let rules = ConnectionRules::new(&same_state);
        let origin = BlockPosition::new(0, 0, 0);

        let south = NeighborClassifier.classify(&world, &state, origin, Direction::South, &rules);
        assert_eq!(south, FaceConnectivity::from_neighbors(Neighbor::ALL));

        let corner = BlockPosition::new(1, 1, 0);
        let south = NeighborClassifier.classify(&world, &state, corner, Direction::South, &rules);
        assert_eq!(
            south,
            FaceConnectivity::from_neighbors([Neighbor::Left, Neighbor::Down, Neighbor::DownLeft])
        );

        // The block above covers the up face
        let up = NeighborClassifier.classify(&world, &state, origin, Direction::Up, &rules);
        assert_eq!(up, FaceConnectivity::NONE);
    }

    #[test]
    fn test_obscured_face_and_connect_inside() {
        let world = world(&[((0, 0, 0), "mod:glass"), ((0, 1, 0), "mod:glass"), ((1, 0, 0), "mod:glass")]);
        let state = BlockState::new("mod:glass");
        let origin = BlockPosition::new(0, 0, 0);

        let rules = ConnectionRules::new(&same_state);
        assert_eq!(
            NeighborClassifier.classify(&world, &state, origin, Direction::Up, &rules),
            FaceConnectivity::NONE
        );
        // North face: the block above and the one to the east are both neighbors
        let north = NeighborClassifier.classify(&world, &state, origin, Direction::North, &rules);
        assert!(north.connected(Neighbor::Up));
        assert!(north.connected(Neighbor::Left));

        let inside = rules.with_connect_inside(true);
        let up = NeighborClassifier.classify(&world, &state, origin, Direction::Up, &inside);
        assert_eq!(up, FaceConnectivity::from_neighbors([Neighbor::Right]));
    }

    #[test]
    fn test_ignore_states() {
        let mut world = world(&[((0, 0, 0), "mod:log")]);
        world.insert(
            BlockPosition::new(1, 0, 0),
            BlockState::new("mod:log").with_property("axis", "x"),
        );
        let state = BlockState::new("mod:log");
        let origin = BlockPosition::new(0, 0, 0);

        let strict = ConnectionRules::new(&same_state);
        let south = NeighborClassifier.classify(&world, &state, origin, Direction::South, &strict);
        assert!(!south.connected(Neighbor::Right));

        let loose = strict.with_ignore_states(true);
        let south = NeighborClassifier.classify(&world, &state, origin, Direction::South, &loose);
        assert!(south.connected(Neighbor::Right));
    }
}
