pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::states::{acceleration_due_to, radius_for_mass, Body, NVec3};
pub use simulation::forces::{Acceleration, AccelSet, NewtonianGravity, NewtonianGravityBarnesHut};
pub use simulation::integrator::{integrate_bodies, IntegratorKind};
pub use simulation::engine::{Engine, GravityKind};
pub use simulation::params::Parameters;
pub use simulation::barnes_hut::{bounding_cube, MassSummary, Octree, PointMass};
pub use simulation::collisions::{merge_bodies, merge_pass, resolve_collisions};
pub use simulation::hue::{mix_hues, WeightedHue};
pub use simulation::distribution::{
    BodyDistribution, DistributionKind, EllipsoidDistribution, RingDistribution, SphereDistribution,
};
pub use simulation::universe::{Diagnostics, Universe};

pub use configuration::config::{BodyConfig, EngineConfig, ParametersConfig, ScenarioConfig, UniverseConfig};

pub use benchmark::benchmark::{bench_gravity, bench_step_curve};
