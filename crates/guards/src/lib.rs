//! `gatehouse-guards` — route-gating state machines.
//!
//! Two cooperating guards consulted on every navigation: the coarse guard
//! gates on session presence, access level and roles; the fine guard gates
//! on granular module/action permissions. Both are pure functions of
//! (session snapshot, authorization model output, bootstrap-complete flag);
//! re-evaluation is driven by the session store's watch subscription.

pub mod coarse;
pub mod fine;

pub use coarse::{CoarseDecision, CoarseRequirement, Denial, evaluate_coarse};
pub use fine::{FineDecision, evaluate_fine};
