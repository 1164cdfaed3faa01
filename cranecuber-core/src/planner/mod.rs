//! Move planning
//!
//! - [`reposition`]: bring any face to the top with the fewest primitives
//! - [`translator`]: turn one parsed move into primitives

pub mod reposition;
pub mod translator;

pub use reposition::{plan_bring_to_top, Primitive, RepositionCounts, RepositionPlan, Repositioner};
pub use translator::MoveTranslator;
