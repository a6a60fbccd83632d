/// Points awarded for every berry eaten
pub const SCORE_INCREMENT: u32 = 10;

/// Number of body segments a fresh snake starts with
pub const DEFAULT_START_TAILS: u32 = 3;

/// Edge length of one grid cell in pixels
pub const DEFAULT_SIZE_CELL: u32 = 12;

/// Display refreshes consumed per gameplay update
pub const DEFAULT_SPEED: u32 = 8;

/// Default drawing surface size in pixels
pub const DEFAULT_CANVAS_WIDTH: u32 = 600;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 600;

/// Default length of one animation window in milliseconds
pub const DEFAULT_ANIMATION_DURATION_MS: f64 = 1000.0;

/// Segments closer to the head than this index never count as a bite
pub const COLLISION_EXEMPT_SEGMENTS: usize = 3;

pub const DEFAULT_HEAD_COLOR: &str = "#FA0556";
pub const DEFAULT_BODY_COLOR: &str = "#A00034";
pub const DEFAULT_BERRY_COLOR: &str = "#34C759";
