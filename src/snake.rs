use std::collections::VecDeque;
use std::fmt;

use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Unit offset on screen axes: y grows downwards.
    fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

/// Top-left pixel coordinate of one grid square.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// The neighbouring cell `step` pixels away in `direction`.
    pub fn shifted(self, direction: Direction, step: i32) -> Self {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx * step, self.y + dy * step)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

/// The creature: body cells head-first, plus the heading it last moved in
/// and the direction it will take on the next move.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Cell>,
    heading: Direction,
    direction: Direction,
}

impl Snake {
    pub fn new(head: Cell, direction: Direction) -> Self {
        Snake { body: VecDeque::from([head]), heading: direction, direction }
    }

    /// Caller guarantees `body` is non-empty and free of duplicates.
    pub(crate) fn from_cells(body: VecDeque<Cell>, direction: Direction) -> Self {
        Snake { body, heading: direction, direction }
    }

    pub fn body(&self) -> impl ExactSizeIterator<Item = &Cell> + '_ {
        self.body.iter()
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.body.contains(cell)
    }

    pub fn next_head(&self, step: i32) -> Cell {
        self.head().shifted(self.direction, step)
    }

    /// Queues a turn for the next move. A reversal of the current heading
    /// is dropped; returns whether the request was taken.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if self.heading.is_opposite(new_direction) {
            return false;
        }

        self.direction = new_direction;
        true
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Pushes `new_head` and, unless growing, drops the tail. Returns the
    /// dropped tail cell.
    pub fn advance(&mut self, new_head: Cell, grow: bool) -> Option<Cell> {
        self.body.push_front(new_head);
        self.heading = self.direction;

        if grow {
            None
        } else {
            self.body.pop_back()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_pairs() {
        assert!(Up.is_opposite(Down));
        assert!(Down.is_opposite(Up));
        assert!(Left.is_opposite(Right));
        assert!(Right.is_opposite(Left));

        assert!(!Up.is_opposite(Left));
        assert!(!Right.is_opposite(Right));
    }

    #[test]
    fn shifted_moves_by_whole_cells() {
        let cell = Cell::new(40, 40);
        assert_eq!(cell.shifted(Up, 20), Cell::new(40, 20));
        assert_eq!(cell.shifted(Down, 20), Cell::new(40, 60));
        assert_eq!(cell.shifted(Left, 20), Cell::new(20, 40));
        assert_eq!(cell.shifted(Right, 20), Cell::new(60, 40));
    }

    #[test]
    fn reversal_is_rejected() {
        let mut snake = Snake::new(Cell::ORIGIN, Right);
        assert!(!snake.set_direction(Left));
        assert_eq!(snake.direction(), Right);

        assert!(snake.set_direction(Down));
        assert_eq!(snake.direction(), Down);
    }

    #[test]
    fn two_turns_inside_one_move_cannot_fold_back() {
        // Heading right: Up is accepted, but Left still reverses the heading.
        let mut snake = Snake::new(Cell::new(20, 20), Right);
        assert!(snake.set_direction(Up));
        assert!(!snake.set_direction(Left));
        assert_eq!(snake.direction(), Up);

        snake.advance(snake.next_head(20), false);
        assert_eq!(snake.heading(), Up);
        assert!(snake.set_direction(Left));
    }

    #[test]
    fn advance_without_growth_keeps_length() {
        let mut snake = Snake::new(Cell::ORIGIN, Right);
        let tail = snake.advance(Cell::new(20, 0), false);

        assert_eq!(tail, Some(Cell::ORIGIN));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Cell::new(20, 0));
    }

    #[test]
    fn advance_with_growth_keeps_tail() {
        let mut snake = Snake::new(Cell::ORIGIN, Right);
        let tail = snake.advance(Cell::new(20, 0), true);

        assert_eq!(tail, None);
        assert_eq!(snake.body().copied().collect::<Vec<_>>(), vec![Cell::new(20, 0), Cell::ORIGIN]);
    }
}
