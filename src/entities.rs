//! All run entity types. Pure data, plus the geometry needed to collide them.

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector in screen space (y grows downward).
    pub fn unit(self) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}

/// The set of directions held during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldDirections {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl HeldDirections {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, direction: Direction) -> Self {
        self.insert(direction);
        self
    }

    pub fn insert(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
    }

    pub fn contains(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .into_iter()
            .filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Direction> for HeldDirections {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut held = Self::none();
        for direction in iter {
            held.insert(direction);
        }
        held
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned box in world units. `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict overlap: boxes that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Anything with a bounding box.
pub trait Bounded {
    fn rect(&self) -> Rect;
}

// ── Hero ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Hero {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Displacement applied during the last frame.
    pub vx: f64,
    pub vy: f64,
    /// Remaining grace time in milliseconds. Never negative.
    pub invulnerable_ms: f64,
}

impl Hero {
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0.0
    }
}

// ── Falling entities ──────────────────────────────────────────────────────────

/// A falling "virus". Costs a life on contact.
#[derive(Clone, Debug, PartialEq)]
pub struct Hazard {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Velocity in world units per millisecond.
    pub vx: f64,
    pub vy: f64,
    /// Rotation phase in radians (cosmetic).
    pub spin: f64,
}

/// A falling "router". Grants score when collected.
#[derive(Clone, Debug, PartialEq)]
pub struct Pickup {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub vx: f64,
    pub vy: f64,
    /// Pulse phase (cosmetic).
    pub pulse: f64,
}

/// A timed "firewall" plate. The hero can stand on it but not pass down
/// through it.
#[derive(Clone, Debug, PartialEq)]
pub struct HazardZone {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub lifetime_ms: f64,
}

impl Bounded for Hero {
    fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, width: self.width, height: self.height }
    }
}

impl Bounded for Hazard {
    fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, width: self.width, height: self.height }
    }
}

impl Bounded for Pickup {
    fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, width: self.width, height: self.height }
    }
}

impl Bounded for HazardZone {
    fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, width: self.width, height: self.height }
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Last-fire timestamp and current interval of one spawner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnTimer {
    pub last_ms: f64,
    pub interval_ms: f64,
}

impl SpawnTimer {
    pub fn new(interval_ms: f64) -> Self {
        Self { last_ms: 0.0, interval_ms }
    }

    pub fn is_due(&self, now_ms: f64) -> bool {
        now_ms - self.last_ms > self.interval_ms
    }

    /// Timer state after firing at `now_ms`: the interval shrinks by `step_ms`
    /// but never below `floor_ms`.
    pub fn fired(&self, now_ms: f64, step_ms: f64, floor_ms: f64) -> SpawnTimer {
        SpawnTimer {
            last_ms: now_ms,
            interval_ms: (self.interval_ms - step_ms).max(floor_ms),
        }
    }
}

// ── Master run state ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    NotStarted,
    Running,
    GameOver,
}

/// The entire state of one run. Cloneable so the pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct RunState {
    pub hero: Hero,
    /// In spawn order.
    pub hazards: Vec<Hazard>,
    pub pickups: Vec<Pickup>,
    pub zones: Vec<HazardZone>,
    pub score: u32,
    pub level: u32,
    pub lives: u32,
    /// Milliseconds of simulated time since the run started.
    pub clock_ms: f64,
    pub hazard_timer: SpawnTimer,
    pub pickup_timer: SpawnTimer,
    pub zone_timer: SpawnTimer,
    pub status: RunStatus,
}
