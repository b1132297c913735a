mod engine;
mod mode;
mod render;

pub use engine::{TimerEngine, TimerSettings, termination_signal};
pub use mode::TimerMode;
pub use render::{Frame, Renderer, TerminalSink};
