//! Sampling strategies for minimal samples.
//!
//! Samplers are stateless policies over an injected random source, so one
//! sampler can serve every worker of a parallel run.

pub mod grouped;
pub mod uniform;

pub use grouped::GroupedSampler;
pub use uniform::UniformRandomSampler;
