pub mod states;
pub mod params;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod barnes_hut;
pub mod collisions;
pub mod hue;
pub mod distribution;
pub mod universe;
