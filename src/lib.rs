#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod body;
pub mod bounds;
pub mod broad_phase;
pub mod material;
pub mod narrowphase;
pub mod shapes;
pub mod sleep;
pub mod soft_contact;
pub mod solver;
pub mod vec3;
pub mod world;

pub use body::RigidBody;
pub use bounds::Aabb;
pub use broad_phase::UniformGrid;
pub use material::Material;
pub use narrowphase::Manifold;
pub use shapes::Shape;
pub use sleep::SleepConfig;
pub use solver::SolverConfig;
pub use vec3::Vec3;
pub use world::World;
