//! Question answering: search, ground, generate.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use ragask_chat::{compose, SourceSummary};
use ragask_core::{Error, Result};
use ragask_search::{SearchIndex, DEFAULT_TOP_N};
use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/ask", post(ask))
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Either a grounded answer or a single error message, never both.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AskResponse {
    Answered {
        answer: Option<String>,
        question: String,
        sources: Vec<SourceSummary>,
    },
    Failed {
        error: String,
    },
}

impl From<Error> for AskResponse {
    fn from(err: Error) -> Self {
        AskResponse::Failed {
            error: err.to_string(),
        }
    }
}

/// POST /ask
///
/// Upstream failures are reported in the body with status 200; only a body
/// that cannot be parsed as an [`AskRequest`] gets a 422. The body is read as
/// JSON whatever its `Content-Type`.
async fn ask(State(state): State<Arc<AppState>>, body: Bytes) -> (StatusCode, Json<AskResponse>) {
    let req = match serde_json::from_slice::<AskRequest>(&body) {
        Ok(req) => req,
        Err(e) => {
            let err = Error::Validation(e.to_string());
            warn!("Rejected /ask body: {}", err);
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(err.into()));
        }
    };

    let span = info_span!("ask", request_id = %Uuid::new_v4());

    let outcome = answer_question(&state, &req.question)
        .instrument(span.clone())
        .await;

    let response = span.in_scope(|| match outcome {
        Ok((answer, sources)) => {
            info!("Answered with {} sources", sources.len());
            AskResponse::Answered {
                answer,
                question: req.question,
                sources,
            }
        }
        Err(err) => {
            error!(kind = err.kind(), "Ask failed: {}", err);
            err.into()
        }
    });

    (StatusCode::OK, Json(response))
}

/// Settings, then search, then one completion. The first error stops the chain.
pub async fn answer_question(
    state: &AppState,
    question: &str,
) -> Result<(Option<String>, Vec<SourceSummary>)> {
    if question.is_empty() {
        warn!("Empty question forwarded to search");
    }

    let settings = state.settings.load()?;

    let index = SearchIndex::from_settings(&settings);
    let results = state.search.search(&index, question, DEFAULT_TOP_N).await?;
    let sources: Vec<SourceSummary> = results.map(SourceSummary::from).collect();

    let answer = compose(state.completion.as_ref(), &settings, question, &sources).await?;

    Ok((answer, sources))
}
