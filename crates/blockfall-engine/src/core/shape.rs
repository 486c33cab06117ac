use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// One fixed orientation of a shape, stored as a rectangular bitmap.
///
/// Rows run top to bottom and every row has the same width. Frames are not
/// re-measured per rotation: the bitmap carries whatever blank border the
/// catalog gives it, so a frame's lit cells do not have to touch its edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame(&'static [&'static [bool]]);

impl Frame {
    #[must_use]
    pub fn width(&self) -> usize {
        self.0.first().map_or(0, |row| row.len())
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the cell at `(dx, dy)` inside the frame is lit.
    ///
    /// Cells outside the bitmap are unlit.
    #[must_use]
    pub fn is_lit(&self, dx: usize, dy: usize) -> bool {
        self.0
            .get(dy)
            .and_then(|row| row.get(dx))
            .copied()
            .unwrap_or(false)
    }

    /// Returns the frame-relative `(dx, dy)` of every lit cell in row-major order.
    pub fn lit_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(dx, &lit)| lit.then_some((dx, dy)))
        })
    }
}

/// A catalog entry: the ordered rotation frames of one tetromino.
#[derive(Debug, PartialEq, Eq)]
pub struct Shape {
    kind: ShapeKind,
    frames: &'static [Frame],
}

impl Shape {
    /// The whole catalog, indexed by [`ShapeKind`].
    #[must_use]
    pub fn all() -> &'static [Shape; ShapeKind::LEN] {
        &SHAPES
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Number of rotation frames (1, 2 or 4).
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Returns rotation frame `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.frame_count()`.
    #[must_use]
    pub fn frame(&self, index: usize) -> &Frame {
        &self.frames[index]
    }

    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }
}

/// The seven canonical tetrominoes.
///
/// `L`/`J` are the two L mirrors and `S`/`Z` the two S mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    /// Long piece.
    I = 0,
    /// Square piece.
    O = 1,
    S = 2,
    Z = 3,
    J = 4,
    L = 5,
    T = 6,
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl ShapeKind {
    /// Number of shape kinds (7).
    pub const LEN: usize = 7;

    /// Every shape in the catalog, in catalog order.
    pub const ALL: [ShapeKind; Self::LEN] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::T,
    ];

    /// Returns the catalog entry for this kind.
    ///
    /// Every call returns the same `'static` reference.
    #[must_use]
    pub fn shape(self) -> &'static Shape {
        &SHAPES[self as usize]
    }

    /// Returns the single character representation of this shape kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::I.as_char(), 'I');
    /// assert_eq!(ShapeKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::I => 'I',
            ShapeKind::O => 'O',
            ShapeKind::S => 'S',
            ShapeKind::Z => 'Z',
            ShapeKind::J => 'J',
            ShapeKind::L => 'L',
            ShapeKind::T => 'T',
        }
    }

    /// Parses a shape kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_char('O'), Some(ShapeKind::O));
    /// assert_eq!(ShapeKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(ShapeKind::I),
            'O' => Some(ShapeKind::O),
            'S' => Some(ShapeKind::S),
            'Z' => Some(ShapeKind::Z),
            'J' => Some(ShapeKind::J),
            'L' => Some(ShapeKind::L),
            'T' => Some(ShapeKind::T),
            _ => None,
        }
    }
}

const C: bool = true;
const E: bool = false;

static SHAPES: [Shape; ShapeKind::LEN] = [
    Shape {
        kind: ShapeKind::I,
        frames: &[
            Frame(&[&[E, E, E, E], &[C, C, C, C], &[E, E, E, E], &[E, E, E, E]]),
            Frame(&[&[E, C, E, E], &[E, C, E, E], &[E, C, E, E], &[E, C, E, E]]),
        ],
    },
    Shape {
        kind: ShapeKind::O,
        frames: &[Frame(&[&[E, C, C], &[E, C, C]])],
    },
    Shape {
        kind: ShapeKind::S,
        frames: &[
            Frame(&[&[E, E, E], &[E, C, C], &[C, C, E]]),
            Frame(&[&[C, E], &[C, C], &[E, C]]),
        ],
    },
    Shape {
        kind: ShapeKind::Z,
        frames: &[
            Frame(&[&[E, E, E], &[C, C, E], &[E, C, C]]),
            Frame(&[&[E, C], &[C, C], &[C, E]]),
        ],
    },
    Shape {
        kind: ShapeKind::J,
        frames: &[
            Frame(&[&[E, C, E], &[E, C, E], &[C, C, E]]),
            Frame(&[&[C, E, E], &[C, C, C], &[E, E, E]]),
            Frame(&[&[E, C, C], &[E, C, E], &[E, C, E]]),
            Frame(&[&[E, E, E], &[C, C, C], &[E, E, C]]),
        ],
    },
    Shape {
        kind: ShapeKind::L,
        frames: &[
            Frame(&[&[E, C, E], &[E, C, E], &[E, C, C]]),
            Frame(&[&[E, E, E], &[C, C, C], &[C, E, E]]),
            Frame(&[&[C, C, E], &[E, C, E], &[E, C, E]]),
            Frame(&[&[E, E, C], &[C, C, C], &[E, E, E]]),
        ],
    },
    Shape {
        kind: ShapeKind::T,
        frames: &[
            Frame(&[&[E, C, E], &[C, C, C]]),
            Frame(&[&[E, C, E], &[E, C, C], &[E, C, E]]),
            Frame(&[&[E, E, E], &[C, C, C], &[E, C, E]]),
            Frame(&[&[E, C, E], &[C, C, E], &[E, C, E]]),
        ],
    },
];
