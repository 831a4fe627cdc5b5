use std::collections::VecDeque;

use crate::Coords;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    /// Unit vector for this direction. `y` grows downwards, like the terminal.
    pub fn delta(self) -> Coords {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    /// Only the four cardinal unit vectors map to a direction.
    pub fn from_delta(delta: Coords) -> Option<Direction> {
        match delta {
            (0, -1) => Some(Up),
            (0, 1) => Some(Down),
            (-1, 0) => Some(Left),
            (1, 0) => Some(Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Direction {
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
}

/// The snake's body, head first. Moving pushes a new head and pops the tail,
/// both O(1) on the deque.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
    // Direction of the last committed step; reversal is checked against it
    // as well, so several turns queued between two steps can't fold back.
    heading: Direction,
}

impl Snake {
    /// Builds a straight snake of `size` cells whose head is at `head` and whose
    /// body trails away from `direction`.
    pub fn new(head: Coords, size: usize, direction: Direction) -> Self {
        let diff = direction.delta();

        let body = (0..size.max(1) as i32)
            .map(|i| (head.0 - diff.0 * i, head.1 - diff.1 * i))
            .collect();
        Snake { body, direction, heading: direction }
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn tail(&self) -> Coords {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> impl Iterator<Item = &Coords> + '_ {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, pos: &Coords) -> bool {
        self.body.contains(pos)
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// Where the head would be after one step in the current direction.
    pub fn next_head(&self) -> Coords {
        let (x, y) = self.head();
        let (dx, dy) = self.direction.delta();
        (x + dx, y + dy)
    }

    /// Returns false, leaving the direction alone, if the request would turn
    /// the snake back onto itself.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction.is_opposite(self.direction) || new_direction.is_opposite(self.heading) {
            return false;
        }

        self.direction = new_direction;
        true
    }

    /// Pushes `new_head` and drops the tail unless `grow` is set. Returns the
    /// dropped tail cell.
    pub fn advance(&mut self, new_head: Coords, grow: bool) -> Option<Coords> {
        self.body.push_front(new_head);
        self.heading = self.direction;

        if grow {
            None
        } else {
            self.body.pop_back()
        }
    }
}
