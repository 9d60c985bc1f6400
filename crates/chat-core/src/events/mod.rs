//! Events that leave the process

mod fanout;

pub use fanout::FanoutEvent;
