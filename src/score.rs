//! Final score submission to the game hub
//!
//! Submission is fire-and-forget: delivery, retries and persistence belong to
//! the hub API. Failures are logged by the caller and never reach the
//! simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default hub endpoint for score submissions
pub const DEFAULT_SCORE_ENDPOINT: &str = "/api/game/score";

/// JSON body accepted by the hub: `{ "gameCode": "INVADERS", "score": 1200 }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub game_code: String,
    pub score: u64,
}

impl ScoreSubmission {
    /// Build a submission; the hub expects upper-case game codes
    pub fn new(game_code: &str, score: u64) -> Result<Self, ReportError> {
        let game_code = game_code.trim().to_uppercase();
        if game_code.is_empty() {
            return Err(ReportError::EmptyGameCode);
        }
        Ok(Self { game_code, score })
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        serde_json::to_string(self).map_err(|e| ReportError::Serialize(e.to_string()))
    }
}

/// Reasons a score could not be handed to the hub
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    EmptyGameCode,
    Serialize(String),
    /// The request could not be built
    Request(String),
    /// Network or browser failure
    Transport(String),
    /// The hub answered with a non-success status
    Status(u16),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::EmptyGameCode => write!(f, "missing game code"),
            ReportError::Serialize(e) => write!(f, "could not encode score: {}", e),
            ReportError::Request(e) => write!(f, "could not build request: {}", e),
            ReportError::Transport(e) => write!(f, "request failed: {}", e),
            ReportError::Status(code) => write!(f, "hub answered with status {}", code),
        }
    }
}

impl std::error::Error for ReportError {}

/// Receives final scores
pub trait ScoreReporter {
    /// Hand a score over for delivery
    ///
    /// An `Ok` only means the submission was accepted for sending; delivery
    /// errors surface later in the reporter's own logs.
    fn report(&self, submission: &ScoreSubmission) -> Result<(), ReportError>;
}

/// Reporter that only logs, used natively and when reporting is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ScoreReporter for LogReporter {
    fn report(&self, submission: &ScoreSubmission) -> Result<(), ReportError> {
        log::info!(
            "[submitScore] {} scored {}",
            submission.game_code,
            submission.score
        );
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::FetchReporter;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use super::{ReportError, ScoreReporter, ScoreSubmission};

    /// POSTs scores as JSON to the hub API
    #[derive(Debug, Clone)]
    pub struct FetchReporter {
        endpoint: String,
    }

    impl FetchReporter {
        pub fn new(endpoint: impl Into<String>) -> Self {
            Self {
                endpoint: endpoint.into(),
            }
        }
    }

    impl ScoreReporter for FetchReporter {
        fn report(&self, submission: &ScoreSubmission) -> Result<(), ReportError> {
            let body = submission.to_json()?;

            let init = RequestInit::new();
            init.set_method("POST");
            init.set_mode(RequestMode::SameOrigin);
            init.set_body(&JsValue::from_str(&body));

            let request = Request::new_with_str_and_init(&self.endpoint, &init)
                .map_err(|e| ReportError::Request(format!("{:?}", e)))?;
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(|e| ReportError::Request(format!("{:?}", e)))?;

            let window =
                web_sys::window().ok_or_else(|| ReportError::Transport("no window".into()))?;
            let promise = window.fetch_with_request(&request);
            let game_code = submission.game_code.clone();
            let score = submission.score;

            wasm_bindgen_futures::spawn_local(async move {
                match send(promise).await {
                    Ok(()) => log::info!("Submitted {} score {}", game_code, score),
                    Err(e) => log::error!("Score submission failed: {}", e),
                }
            });
            Ok(())
        }
    }

    async fn send(promise: js_sys::Promise) -> Result<(), ReportError> {
        let response = JsFuture::from(promise)
            .await
            .map_err(|e| ReportError::Transport(format!("{:?}", e)))?;
        let response: Response = response
            .dyn_into()
            .map_err(|e| ReportError::Transport(format!("{:?}", e)))?;
        if response.ok() {
            Ok(())
        } else {
            Err(ReportError::Status(response.status()))
        }
    }
}
