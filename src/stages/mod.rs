pub mod extractor;
pub mod sequencer;
pub mod stage0_discover;
pub mod stage1_walk;
pub mod stage2_render;

pub use extractor::*;
pub use sequencer::*;
pub use stage0_discover::*;
pub use stage1_walk::*;
pub use stage2_render::*;
