//! Search application services.

mod listener;
mod status;

pub use listener::ResultChannelListener;
pub use status::SearchStatusTracker;
