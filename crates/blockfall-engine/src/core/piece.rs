use serde::{Deserialize, Serialize};

use super::shape::{Frame, Shape, ShapeKind};

/// A falling piece: shape, rotation state and board-relative origin.
///
/// The origin is the board position of the top-left corner of the current
/// rotation frame. Coordinates are signed so that a candidate moved past an
/// edge is still a representable value; it is the legality check, not the
/// piece, that rejects it.
///
/// Pieces are immutable - movement and rotation operations return new
/// `GamePiece` instances.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GamePiece, ShapeKind};
///
/// let piece = GamePiece::new(ShapeKind::T);
/// let moved = piece.right().rotate();
/// assert_eq!(piece.origin(), (3, 0));
/// assert_eq!(moved.origin(), (4, 0));
/// assert_eq!(moved.rotation(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamePiece {
    kind: ShapeKind,
    rotation: usize,
    x: i32,
    y: i32,
}

impl GamePiece {
    /// Origin of every freshly spawned piece.
    pub const SPAWN_ORIGIN: (i32, i32) = (3, 0);

    /// Creates a piece in its first rotation frame at [`Self::SPAWN_ORIGIN`].
    #[must_use]
    pub fn new(kind: ShapeKind) -> Self {
        let (x, y) = Self::SPAWN_ORIGIN;
        Self {
            kind,
            rotation: 0,
            x,
            y,
        }
    }

    /// Creates a piece at an arbitrary origin.
    ///
    /// `rotation` is reduced modulo the shape's frame count.
    #[must_use]
    pub fn with_position(kind: ShapeKind, rotation: usize, x: i32, y: i32) -> Self {
        Self {
            kind,
            rotation: rotation % kind.shape().frame_count(),
            x,
            y,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &'static Shape {
        self.kind.shape()
    }

    #[must_use]
    pub fn rotation(&self) -> usize {
        self.rotation
    }

    #[must_use]
    pub fn origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// The rotation frame currently in use.
    #[must_use]
    pub fn frame(&self) -> &'static Frame {
        self.shape().frame(self.rotation)
    }

    /// Board coordinates covered by the current frame, in row-major order.
    ///
    /// Coordinates saturate at the `i32` limits, which are never on the board.
    pub fn lit_positions(&self) -> impl Iterator<Item = (i32, i32)> {
        let (x0, y0) = (self.x, self.y);
        self.frame().lit_cells().map(move |(dx, dy)| {
            (
                x0.saturating_add(offset(dx)),
                y0.saturating_add(offset(dy)),
            )
        })
    }

    /// Returns a copy advanced to the next rotation frame, wrapping around.
    #[must_use]
    pub fn rotate(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % self.shape().frame_count(),
            ..*self
        }
    }

    /// Returns a copy translated by `(dx, dy)`, saturating at the `i32` limits.
    #[must_use]
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..*self
        }
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.moved(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.moved(1, 0)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.moved(0, 1)
    }
}

// Frames are at most 4 cells on a side.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn offset(d: usize) -> i32 {
    d as i32
}

impl Serialize for GamePiece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "kind#rotation@x,y" (e.g., "T#1@3,5")
        let s = format!(
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation,
            self.x,
            self.y
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for GamePiece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let s = String::deserialize(deserializer)?;

        let (kind_str, rest) = s
            .split_once('#')
            .ok_or_else(|| D::Error::custom(format!("missing '#' in '{s}'")))?;
        let mut chars = kind_str.chars();
        let kind = match (chars.next(), chars.next()) {
            (Some(c), None) => ShapeKind::from_char(c)
                .ok_or_else(|| D::Error::custom(format!("invalid shape kind: {c}")))?,
            _ => {
                return Err(D::Error::custom(format!(
                    "shape kind must be a single character, got '{kind_str}'"
                )));
            }
        };

        let (rotation_str, position_str) = rest
            .split_once('@')
            .ok_or_else(|| D::Error::custom(format!("missing '@' in '{s}'")))?;
        let rotation = rotation_str.parse::<usize>().map_err(|e| {
            D::Error::custom(format!("invalid rotation: {rotation_str} ({e})"))
        })?;
        if rotation >= kind.shape().frame_count() {
            return Err(D::Error::custom(format!(
                "rotation {rotation} out of range for {kind:?}"
            )));
        }

        let (x_str, y_str) = position_str
            .split_once(',')
            .ok_or_else(|| D::Error::custom(format!("missing ',' in '{s}'")))?;
        let x = x_str
            .parse::<i32>()
            .map_err(|e| D::Error::custom(format!("invalid x position: {x_str} ({e})")))?;
        let y = y_str
            .parse::<i32>()
            .map_err(|e| D::Error::custom(format!("invalid y position: {y_str} ({e})")))?;

        Ok(GamePiece {
            kind,
            rotation,
            x,
            y,
        })
    }
}
