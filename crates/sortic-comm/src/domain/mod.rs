//! Domain layer: session state, typed buffers, timing gates and the
//! box-choice policy seam.

mod box_choice;
mod buffers;
mod context;
mod timing;

pub use box_choice::{BoxCandidate, BoxChoicePolicy, DeclineAll};
pub use buffers::{ClassifyOutcome, MessageBuffers};
pub use context::SorticContext;
pub use timing::{CommTimings, PollGate};
