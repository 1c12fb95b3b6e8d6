//! Individual pipeline stages for custom post-processing.
//!
//! Most users should call [`Interpreter`](crate::Interpreter) or
//! [`Detector`](crate::Detector). These re-exports allow running decoding,
//! ranking and suppression separately, e.g. to inspect candidates before
//! suppression.

pub use crate::candidate::nms::suppress;
#[cfg(feature = "rayon")]
pub use crate::candidate::rank::rank_candidates_par;
pub use crate::candidate::rank::rank_candidates;
pub use crate::grid::BOX_PARAMS;
