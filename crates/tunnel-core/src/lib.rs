pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod integrator;
pub mod palette;
pub mod scene;
pub mod scheduler;
pub mod sequencer;
pub mod speed;
pub mod tempo;
pub mod timeline;
pub mod tunnel;

pub use clock::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use input::*;
pub use scene::*;
pub use scheduler::*;
pub use sequencer::*;
pub use speed::*;
pub use tempo::*;
pub use timeline::*;
pub use tunnel::*;
