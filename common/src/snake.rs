use serde::{Deserialize, Serialize};

use crate::COLLISION_EXEMPT_SEGMENTS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn offset(self, velocity: Velocity) -> Self {
        Position {
            x: self.x + velocity.dx,
            y: self.y + velocity.dy,
        }
    }

    /// Wrap onto a `columns x rows` grid of `cell` sized cells.
    pub fn wrap(self, grid: Grid) -> Self {
        let cell = grid.cell as i32;
        Position {
            x: self.x.div_euclid(cell).rem_euclid(grid.columns as i32) * cell,
            y: self.y.div_euclid(cell).rem_euclid(grid.rows as i32) * cell,
        }
    }
}

/// Cell layout of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub cell: u32,
    pub columns: u32,
    pub rows: u32,
}

impl Grid {
    /// Never smaller than one cell in either direction.
    pub fn new(width: u32, height: u32, cell: u32) -> Self {
        let cell = cell.max(1);
        Grid {
            cell,
            columns: (width / cell).max(1),
            rows: (height / cell).max(1),
        }
    }

    pub fn center(&self) -> Position {
        Position {
            x: (self.columns / 2 * self.cell) as i32,
            y: (self.rows / 2 * self.cell) as i32,
        }
    }

    pub fn cell_position(&self, column: u32, row: u32) -> Position {
        Position {
            x: (column * self.cell) as i32,
            y: (row * self.cell) as i32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: i32,
    pub dy: i32,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { dx: 0, dy: 0 };

    pub fn towards(direction: Direction, cell: u32) -> Self {
        let step = cell as i32;
        match direction {
            Direction::Up => Velocity { dx: 0, dy: -step },
            Direction::Right => Velocity { dx: step, dy: 0 },
            Direction::Down => Velocity { dx: 0, dy: step },
            Direction::Left => Velocity { dx: -step, dy: 0 },
        }
    }

    pub fn scaled(self, factor: i32) -> Self {
        Velocity {
            dx: self.dx * factor,
            dy: self.dy * factor,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        self.dx != 0
    }

    pub fn is_vertical(&self) -> bool {
        self.dy != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Maps a `KeyboardEvent.key` value. Legacy `Up`/`Down`/... names are accepted too.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "Up" => Some(Direction::Up),
            "ArrowRight" | "Right" => Some(Direction::Right),
            "ArrowDown" | "Down" => Some(Direction::Down),
            "ArrowLeft" | "Left" => Some(Direction::Left),
            _ => None,
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snake {
    pub head: Position,
    pub velocity: Velocity,
    pub tails: Vec<Position>,
}

impl Snake {
    /// Lays `start_tails` segments out behind the head, opposite to `velocity`.
    pub fn new(head: Position, velocity: Velocity, start_tails: usize) -> Self {
        let tails = (1..=start_tails as i32)
            .map(|i| head.offset(velocity.scaled(-i)))
            .collect();
        Snake { head, velocity, tails }
    }

    pub fn len(&self) -> usize {
        self.tails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tails.is_empty()
    }

    /// Shift every segment onto its predecessor, then advance the head.
    pub fn step_forward(&mut self) {
        for i in (0..self.tails.len()).rev() {
            self.tails[i] = if i == 0 { self.head } else { self.tails[i - 1] };
        }
        self.head = self.head.offset(self.velocity);
    }

    /// Append a segment on top of the current last one; the next shift moves it into place.
    pub fn grow(&mut self) {
        let last = self.tails.last().copied().unwrap_or(self.head);
        self.tails.push(last);
    }

    /// Turn only onto the axis perpendicular to the current motion.
    pub fn turn(&mut self, direction: Direction, cell: u32) -> bool {
        let blocked = if direction.is_vertical() {
            self.velocity.is_vertical()
        } else {
            self.velocity.is_horizontal()
        };
        if blocked {
            return false;
        }
        self.velocity = Velocity::towards(direction, cell);
        true
    }

    /// Pull the head and every segment onto `grid`.
    pub fn wrap(&mut self, grid: Grid) {
        self.head = self.head.wrap(grid);
        for segment in &mut self.tails {
            *segment = segment.wrap(grid);
        }
    }

    pub fn bites_itself(&self) -> bool {
        self.tails
            .iter()
            .skip(COLLISION_EXEMPT_SEGMENTS)
            .any(|segment| *segment == self.head)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Berry {
    pub position: Position,
}

impl Berry {
    pub fn new(position: Position) -> Self {
        Berry { position }
    }
}
