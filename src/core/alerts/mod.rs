// Alert system module: severity-tagged notifications with read-state.
//
// Architecture:
// - model.rs: Alert record, category/severity enums, presentation tokens
// - queue.rs: bounded newest-first queue with unread tracking

pub mod model;
pub mod queue;
