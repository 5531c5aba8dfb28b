//! Lookup-table control policies for the Robby agent.
//!
//! A [`Policy`] assigns one [`Action`](robby_engine::Action) to every possible
//! [`Observation`](robby_engine::Observation), including observations that can never
//! occur during play (such as five walls). The table is total so that mutation can
//! target any entry uniformly.
//!
//! # Modules
//!
//! - [`policy`] - The policy table, its construction and its mutation operator
//! - [`rule`] - Hand-written rules used to seed a policy
//! - [`episode`] - Running a policy against a world for a fixed number of steps
//!
//! # Example
//!
//! ```
//! use robby_engine::{GridWorld, WorldConfig};
//! use robby_policy::{Policy, episode};
//!
//! let mut rng = rand::rng();
//! let policy = Policy::default_strategy();
//! let mut world = GridWorld::random(WorldConfig::new(10, 50), &mut rng).unwrap();
//!
//! let collected = episode::run_episode(&mut world, &policy, 200);
//! assert!(collected <= 50);
//! ```

pub use self::policy::{Policy, PolicyError};

pub mod episode;
pub mod policy;
pub mod rule;
