use racer_core::geometry::Position;

/// Cells a car passes over travelling in a straight line from `from` to `to`,
/// both ends included.
///
/// Bresenham walk along the major axis. The error term is kept doubled so the
/// half-step starting bias stays in integers.
pub fn traversed_cells(from: Position, to: Position) -> Vec<Position> {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };

    let mut cells = Vec::with_capacity(dx.max(dy) as usize + 1);
    let (mut x, mut y) = (from.x, from.y);

    if dx > dy {
        let mut err = dx;
        while x != to.x {
            cells.push(Position::new(x, y));
            err -= 2 * dy;
            if err < 0 {
                y += sy;
                err += 2 * dx;
            }
            x += sx;
        }
    } else {
        let mut err = dy;
        while y != to.y {
            cells.push(Position::new(x, y));
            err -= 2 * dx;
            if err < 0 {
                x += sx;
                err += 2 * dy;
            }
            y += sy;
        }
    }
    cells.push(Position::new(x, y));
    cells
}
