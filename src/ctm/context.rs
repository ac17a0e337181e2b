//! Packing of per-face connectivity into a single composite key.

use super::connectivity::{ConnectionRules, ConnectivityClassifier, FaceConnectivity, FACE_BITS};
use crate::types::{BlockPosition, BlockReader, BlockState, Direction};

const FACE_MASK: u64 = (1 << FACE_BITS) - 1;
const KEY_BITS: u32 = FACE_BITS * Direction::ALL.len() as u32;
const KEY_MASK: u64 = (1 << KEY_BITS) - 1;

const _: () = assert!(KEY_BITS <= u64::BITS);

/// Six face descriptors packed at fixed 10-bit offsets, one per
/// [`Direction`] in ordinal order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CompositeConnectivityKey(u64);

impl CompositeConnectivityKey {
    /// A key with every face unconnected.
    pub const EMPTY: CompositeConnectivityKey = CompositeConnectivityKey(0);

    /// Rebuild a key from its raw form. Bits above the six face fields are dropped.
    pub fn from_bits(bits: u64) -> Self {
        Self(bits & KEY_MASK)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    fn shift(face: Direction) -> u32 {
        face.index() as u32 * FACE_BITS
    }

    /// Store the descriptor for `face`, replacing whatever was there.
    pub fn pack(&mut self, face: Direction, connectivity: FaceConnectivity) {
        let shift = Self::shift(face);
        self.0 &= !(FACE_MASK << shift);
        self.0 |= u64::from(connectivity.serialized()) << shift;
    }

    pub fn with(mut self, face: Direction, connectivity: FaceConnectivity) -> Self {
        self.pack(face, connectivity);
        self
    }

    /// Serialized descriptor stored for `face`.
    pub fn unpack(self, face: Direction) -> u16 {
        ((self.0 >> Self::shift(face)) & FACE_MASK) as u16
    }

    pub fn face(self, face: Direction) -> FaceConnectivity {
        // Every field is masked to FACE_BITS, so this never falls back.
        FaceConnectivity::new(self.unpack(face)).unwrap_or_default()
    }
}

/// Connectivity of all six faces of one block instance.
///
/// Built fresh for each render query; holds no reference to the world
/// after [`encode`](Self::encode) returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceConnectivityEncoder {
    faces: [FaceConnectivity; 6],
    key: CompositeConnectivityKey,
}

impl FaceConnectivityEncoder {
    /// Classify every face once, in [`Direction::ALL`] order, and pack the results.
    pub fn encode(
        state: &BlockState,
        world: &dyn BlockReader,
        pos: BlockPosition,
        rules: &ConnectionRules<'_>,
        classifier: &dyn ConnectivityClassifier,
    ) -> Self {
        let mut faces = [FaceConnectivity::NONE; 6];
        let mut key = CompositeConnectivityKey::EMPTY;

        for face in Direction::ALL {
            let connectivity = classifier.classify(world, state, pos, face, rules);
            faces[face.index()] = connectivity;
            key.pack(face, connectivity);
        }

        Self { faces, key }
    }

    /// The descriptor classified for one face.
    pub fn descriptor_for(&self, face: Direction) -> FaceConnectivity {
        self.faces[face.index()]
    }

    /// The composite key handed to renderers.
    pub fn compressed_data(&self) -> CompositeConnectivityKey {
        self.key
    }
}
