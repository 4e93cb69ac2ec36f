//! Tower layers for the outbound client stack

mod user_agent;

pub use user_agent::UserAgentLayer;
