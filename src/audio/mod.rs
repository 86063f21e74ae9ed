pub mod sink;

pub use sink::{Silent, SoundCue, SoundSink, TerminalBell};
