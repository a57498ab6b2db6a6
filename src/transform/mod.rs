//! Transform stages of the update pipeline.
//!
//! Each stage is a pure function from a working frame and the inbound view
//! state to a new working frame. The controller runs them in a fixed
//! order: filter, then search, then sort, then reorder. A stage error
//! leaves the previous frame in place (the stage degrades to a no-op).

pub mod filter;
pub mod reorder;
pub mod search;
pub mod sort;
