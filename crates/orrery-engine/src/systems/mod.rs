pub mod lighting;
pub mod orbit;
pub mod picking;
pub mod rng;
pub mod scene_builder;
