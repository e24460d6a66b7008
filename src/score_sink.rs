//! Where final scores go
//!
//! Sinks are fire-and-forget: `submit_score` returns immediately and any
//! failure is logged, never reported back to the game loop.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use thiserror::Error;

/// Game id attached to every submission
pub const GAME_ID: &str = "flyingMeme";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub game_id: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("score callback `{0}` is not a function")]
    MissingCallback(String),
    #[error("score submission rejected: {0}")]
    Rejected(String),
}

pub trait ScoreSink {
    /// Hand off a final score. Must not block.
    fn submit_score(&mut self, game_id: &str, final_score: u32);
}

/// A sink shared with other owners, e.g. a leaderboard the UI also reads
impl<S: ScoreSink + ?Sized> ScoreSink for Rc<RefCell<S>> {
    fn submit_score(&mut self, game_id: &str, final_score: u32) {
        self.borrow_mut().submit_score(game_id, final_score);
    }
}

/// Keeps submissions in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub submissions: Vec<ScoreSubmission>,
}

impl ScoreSink for MemorySink {
    fn submit_score(&mut self, game_id: &str, final_score: u32) {
        self.submissions.push(ScoreSubmission {
            game_id: game_id.to_string(),
            score: final_score,
        });
    }
}

#[cfg(target_arch = "wasm32")]
pub use js::JsScoreSink;

#[cfg(target_arch = "wasm32")]
mod js {
    use js_sys::{Function, Promise, Reflect};
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::{JsFuture, spawn_local};

    use super::{ScoreSink, SinkError};

    /// Calls a page-provided `fn(gameId, score)`; a returned promise is
    /// awaited off the frame loop
    pub struct JsScoreSink {
        callback: Function,
    }

    impl JsScoreSink {
        /// Look up a global function by name, e.g. `window.submitScore`
        pub fn from_global(name: &str) -> Result<Self, SinkError> {
            let window = web_sys::window().ok_or_else(|| SinkError::MissingCallback(name.into()))?;
            let callback = Reflect::get(&window, &JsValue::from_str(name))
                .ok()
                .and_then(|value| value.dyn_into::<Function>().ok())
                .ok_or_else(|| SinkError::MissingCallback(name.into()))?;
            Ok(Self { callback })
        }

        fn call(&self, game_id: &str, final_score: u32) -> Result<JsValue, SinkError> {
            self.callback
                .call2(
                    &JsValue::NULL,
                    &JsValue::from_str(game_id),
                    &JsValue::from(final_score),
                )
                .map_err(|e| SinkError::Rejected(format!("{e:?}")))
        }
    }

    impl ScoreSink for JsScoreSink {
        fn submit_score(&mut self, game_id: &str, final_score: u32) {
            let returned = match self.call(game_id, final_score) {
                Ok(value) => value,
                Err(e) => {
                    log::error!("{e}");
                    return;
                }
            };
            let Ok(promise) = returned.dyn_into::<Promise>() else {
                return;
            };
            spawn_local(async move {
                match JsFuture::from(promise).await {
                    Ok(_) => log::info!("Score {final_score} submitted"),
                    Err(e) => log::error!("{}", SinkError::Rejected(format!("{e:?}"))),
                }
            });
        }
    }
}
