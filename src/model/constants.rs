// Elo constants
pub const STARTING_RATING: f64 = 1000.0;
pub const BASE_RATING_CHANGE: f64 = 40.0;
pub const ELO_DIVISOR: f64 = 400.0;
// Confidence constants
pub const MAX_CONFIDENCE_GAMES: u32 = 20;
pub const MAX_CONFIDENCE: f64 = 1.0;
pub const CONFIDENCE_GROWTH_RATE: f64 = 3.0;
// Variety constants
pub const MAX_VARIETY_BONUS: f64 = 0.2;
pub const MIN_VARIETY_BONUS: f64 = -0.1;
pub const MAX_GAP_PERCENT: f64 = 0.4;
pub const MIN_SCALING_FACTOR: f64 = 0.5;
pub const VARIETY_DIFFICULTY_MULTIPLIER: f64 = 0.75;
pub const DEFAULT_AVERAGE_ENTROPY: f64 = 2.0;
pub const COSINE_FALLOFF: f64 = 0.7;
// Percentile amplification curve
pub const TAIL_PERCENTILE_DISTANCE: f64 = 0.8;
pub const TAIL_CURVE_GROWTH_RATE: f64 = 1.1;
pub const TAIL_CURVE_MIDPOINT: f64 = 8.0;
pub const TAIL_CURVE_FLOOR: f64 = 0.1;
// Multiplier constants
pub const MIN_MULTIPLIER: f64 = 0.0;
pub const MAX_MULTIPLIER: f64 = 2.0;
// Proven potential constants
pub const PP_LOOKBACK_WINDOW: u32 = 16;
pub const PP_GAP_THRESHOLD: f64 = 0.1;
pub const PP_MIN_ESTABLISHED_GAMES: u32 = 40;
// Catch-up bonus constants
pub const CATCH_UP_TARGET_RATING: f64 = 1700.0;
pub const CATCH_UP_CONVERGENCE_THRESHOLD: f64 = 50.0;
pub const CATCH_UP_MAX_BONUS: f64 = 1.0;
// Ladder reset catch-up: pulls the field toward 1500
pub const LADDER_RESET_TARGET_RATING: f64 = 1500.0;
pub const LADDER_RESET_CONVERGENCE_THRESHOLD: f64 = 200.0;
