mod chain;
mod node;

pub use chain::EventChain;
