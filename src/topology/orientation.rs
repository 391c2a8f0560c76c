//! Orientation groups describing how a shared edge or face is seen by a cell.
//!
//! A master edge or patch is stored once in the registry with its own vertex
//! order. A cell that consumes it records an orientation element mapping the
//! stored corner numbering onto its local numbering:
//!
//! - edges use [`BitFlip`] (group C₂): `false` means same sense as the master;
//! - triangles and quads use [`Dihedral<N>`]: corner `k` of the stored face is
//!   local corner [`Dihedral::apply`]`(k)`.
//!
//! Orientations compose, so chained correspondences (bottom face, to the
//! cell's reference numbering, to the top face) reduce to a single element.

use core::fmt::{Debug, Formatter};

/// Group law shared by all orientation types.
///
/// `compose(a, b)` acts as `a ∘ b` (apply `b`, then `a`).
pub trait Orientation: Copy + Default + Debug + 'static {
    fn compose(a: Self, b: Self) -> Self;
    fn inverse(a: Self) -> Self;
}

/// 1-bit flip (edge reversal); group C₂.
/// Compose = XOR; inverse = self.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(transparent)]
pub struct BitFlip(pub bool);

impl Debug for BitFlip {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("BitFlip").field(&self.0).finish()
    }
}

impl Orientation for BitFlip {
    #[inline]
    fn compose(a: Self, b: Self) -> Self {
        BitFlip(a.0 ^ b.0)
    }
    #[inline]
    fn inverse(a: Self) -> Self {
        a
    }
}

impl BitFlip {
    /// Same sense as the master entity.
    pub const SAME: BitFlip = BitFlip(false);
    /// Opposite sense.
    pub const REVERSED: BitFlip = BitFlip(true);

    /// True when the consumer walks the master edge in its stored direction.
    #[inline]
    pub fn is_same(self) -> bool {
        !self.0
    }

    /// Orientation taking stored endpoints `stored` onto the local pair.
    pub fn matching<T: PartialEq>(stored: [T; 2], local: [T; 2]) -> Option<Self> {
        if stored[0] == local[0] && stored[1] == local[1] {
            Some(BitFlip::SAME)
        } else if stored[0] == local[1] && stored[1] == local[0] {
            Some(BitFlip::REVERSED)
        } else {
            None
        }
    }
}

/// Dihedral group D_N (rotations + reflections); covers triangles (N=3) & quads (N=4).
/// Element = r^k * s^f, with k∈[0,N), f∈{0,1};
/// law: (k,f)*(k',f') = (k + (-1)^f k' mod N, f xor f')
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Dihedral<const N: u8> {
    pub rot: u8,
    pub flip: bool,
}

impl<const N: u8> Default for Dihedral<N> {
    fn default() -> Self {
        Self {
            rot: 0,
            flip: false,
        }
    }
}

impl<const N: u8> Debug for Dihedral<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dihedral")
            .field("rot", &self.rot)
            .field("flip", &self.flip)
            .finish()
    }
}

impl<const N: u8> Orientation for Dihedral<N> {
    #[inline]
    fn compose(a: Self, b: Self) -> Self {
        let add = if a.flip {
            (N - (b.rot % N)) % N
        } else {
            b.rot % N
        };
        Self {
            rot: (a.rot + add) % N,
            flip: a.flip ^ b.flip,
        }
    }
    #[inline]
    fn inverse(a: Self) -> Self {
        if a.flip {
            Self {
                rot: a.rot % N,
                flip: true,
            }
        } else {
            Self {
                rot: (N - (a.rot % N)) % N,
                flip: false,
            }
        }
    }
}

impl<const N: u8> Dihedral<N> {
    /// Builds an element from a rotation offset and a reflection bit.
    #[inline]
    pub const fn new(rot: u8, flip: bool) -> Self {
        Self { rot: rot % N, flip }
    }

    /// Maps corner `k` to `rot ± k (mod N)`.
    #[inline]
    pub fn apply(self, k: usize) -> usize {
        let n = N as usize;
        let k = k % n;
        let r = self.rot as usize;
        if self.flip { (r + n - k) % n } else { (r + k) % n }
    }

    /// True when the stored winding agrees with the local winding.
    #[inline]
    pub fn same_sense(self) -> bool {
        !self.flip
    }

    /// Finds the element with `stored[k] == local[self.apply(k)]` for every `k`.
    pub fn matching<T: PartialEq>(stored: &[T], local: &[T]) -> Option<Self> {
        let n = N as usize;
        if stored.len() != n || local.len() != n {
            return None;
        }
        for flip in [false, true] {
            for rot in 0..N {
                let candidate = Self::new(rot, flip);
                if (0..n).all(|k| stored[k] == local[candidate.apply(k)]) {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

/// Edge orientation alias.
pub use BitFlip as Sense;
/// Triangle face orientation.
pub type D3 = Dihedral<3>;
/// Quad face orientation.
pub type D4 = Dihedral<4>;

/// Accumulate a sequence of orientation steps, left-to-right.
/// Identity is `O::default()`.
#[inline]
pub fn accumulate_path<O, I>(path: I) -> O
where
    O: Orientation,
    I: IntoIterator<Item = O>,
{
    path.into_iter()
        .fold(O::default(), |acc, step| O::compose(acc, step))
}
