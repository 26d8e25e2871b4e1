//! Shapes module - the seven tetromino definitions and pivot rotation
//!
//! Offsets are relative to the piece origin with row 0 at the bottom. Every
//! shape carries its own pivot; rotation turns each cell 90° about it using
//! the matrix `[[0, -1], [1, 0]]` and snaps the result to the nearest cell.
//! There are no wall kicks: a rotation either fits where it lands or is
//! rejected.

use crate::components::Shape;
use crate::types::{CellPos, ShapeKind};

const O_SHAPE: Shape = Shape::new(ShapeKind::O, [(0, 0), (1, 0), (0, 1), (1, 1)], (0.5, 0.5));
const I_SHAPE: Shape = Shape::new(ShapeKind::I, [(0, 0), (0, 1), (0, 2), (0, 3)], (0.5, 1.5));
const T_SHAPE: Shape = Shape::new(ShapeKind::T, [(0, 0), (1, 0), (1, 1), (2, 0)], (1.0, 0.0));
const J_SHAPE: Shape = Shape::new(ShapeKind::J, [(0, 0), (1, 0), (1, 1), (1, 2)], (1.0, 1.0));
const L_SHAPE: Shape = Shape::new(ShapeKind::L, [(0, 0), (0, 1), (0, 2), (1, 0)], (0.0, 1.0));
const S_SHAPE: Shape = Shape::new(ShapeKind::S, [(0, 0), (1, 0), (1, 1), (2, 1)], (1.0, 0.0));
const Z_SHAPE: Shape = Shape::new(ShapeKind::Z, [(0, 1), (1, 1), (1, 0), (2, 0)], (1.0, 0.0));

/// Catalog entry for a kind, all cells in the background colour
pub fn catalog_shape(kind: ShapeKind) -> Shape {
    match kind {
        ShapeKind::O => O_SHAPE,
        ShapeKind::I => I_SHAPE,
        ShapeKind::T => T_SHAPE,
        ShapeKind::J => J_SHAPE,
        ShapeKind::L => L_SHAPE,
        ShapeKind::S => S_SHAPE,
        ShapeKind::Z => Z_SHAPE,
    }
}

/// Rotate one offset 90° counter-clockwise about `pivot`
fn rotate_offset((x, y): CellPos, (px, py): (f32, f32)) -> CellPos {
    let rx = x as f32 - px;
    let ry = y as f32 - py;
    // [[0, -1], [1, 0]] * (rx, ry)
    let nx = -ry + px;
    let ny = rx + py;
    (nx.round() as i8, ny.round() as i8)
}

/// The shape turned 90° about its pivot. Colours stay with their cells.
pub fn rotated(shape: &Shape) -> Shape {
    Shape {
        cells: shape.cells.map(|cell| rotate_offset(cell, shape.pivot)),
        ..*shape
    }
}

/// Rotate a piece sitting at `(x, y)`.
///
/// Returns the rotated shape only if every resulting absolute cell passes
/// `is_open`; otherwise `None` and the caller keeps the original.
pub fn try_rotate(
    shape: &Shape,
    x: i8,
    y: i8,
    is_open: impl Fn(i8, i8) -> bool,
) -> Option<Shape> {
    let candidate = rotated(shape);
    candidate
        .cells_at(x, y)
        .iter()
        .all(|&(cx, cy)| is_open(cx, cy))
        .then_some(candidate)
}
