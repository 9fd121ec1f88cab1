//! Umbrella crate for the `hog-features` workspace.
//!
//! Re-exports the grid foundation, the gradient stages and the descriptor
//! pipeline so applications depend on a single crate.

pub use hf_core::*;
pub use hf_grad::*;
pub use hf_hog::*;
