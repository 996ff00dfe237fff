//! Collaborators the simulation consults but does not own: map layout and
//! field-of-vision calculation.
mod map;
mod vision;

pub use map::{GridOracle, MapDimensions, StaticGrid};
pub use vision::{
    LineOfSightVision, MAX_VISION_RADIUS, RadiusVision, VisibleTiles, VisionCalculator,
};
