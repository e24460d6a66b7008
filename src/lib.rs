//! Flying Meme - a one-button meme arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, scoring)
//! - `renderer`: Display list composition and the canvas 2D backend
//! - `scheduler`: Animation-frame driven run lifecycle
//! - `session`: Owns the game state and wires input, assets and score sinks
//! - `theme`: Theme resolution and the asset provider seam
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod score_sink;
pub mod session;
pub mod settings;
pub mod sim;
pub mod theme;
pub mod tuning;

pub use highscores::HighScores;
pub use scheduler::{FrameHost, FrameOutcome, FrameScheduler, SchedulerError, SchedulerPhase};
pub use score_sink::{GAME_ID, ScoreSink};
pub use session::Session;
pub use settings::Settings;
pub use theme::{AssetProvider, ThemeAssets, ThemeKind, resolve_theme};
pub use tuning::Tuning;
