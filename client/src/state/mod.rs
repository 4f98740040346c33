//! Client-side view state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Session state itself lives in the shared session store and is mirrored
//! into a signal by the shell; these modules hold the remaining UI state.

pub mod device;
pub mod remote;
