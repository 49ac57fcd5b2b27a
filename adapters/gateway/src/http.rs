//! HTTP client for the remote AI service.

use std::{future::Future, time::Duration};

use adaptive_defence_core::{AttackPlan, Outcome, PlanRequest};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    wire::{FeedbackRequest, FeedbackResponse, NextWaveRequest, NextWaveResponse},
    AttackAdvisor, GatewayError,
};

/// Endpoint that returns the next attack plan.
pub const NEXT_WAVE_PATH: &str = "/ai/next_wave";

/// Endpoint that receives wave outcomes.
pub const FEEDBACK_PATH: &str = "/ai/feedback";

/// Endpoint that triggers a training pass.
pub const TRAIN_PATH: &str = "/ai/train";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Connection settings for the AI service.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Scheme, host and port of the service, without a trailing path.
    pub base_url: String,
    /// Upper bound for a single request, including the response body.
    pub request_timeout_ms: u64,
}

impl GatewayConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

/// [`AttackAdvisor`] backed by the JSON endpoints of the AI service.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Builds a gateway for the configured service.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(GatewayError::Client)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl AttackAdvisor for HttpGateway {
    fn request_plan(
        &self,
        request: &PlanRequest,
    ) -> impl Future<Output = Result<AttackPlan, GatewayError>> + Send {
        let body = NextWaveRequest::from(request);
        let url = self.endpoint(NEXT_WAVE_PATH);
        async move {
            let response = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(GatewayError::Unavailable)?;
            let decoded: NextWaveResponse = successful(response)?
                .json()
                .await
                .map_err(GatewayError::Malformed)?;
            decoded.into_plan()
        }
    }

    fn report_outcome(
        &self,
        outcome: &Outcome,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send {
        let body = FeedbackRequest::from(outcome);
        let url = self.endpoint(FEEDBACK_PATH);
        async move {
            let response = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(GatewayError::Unavailable)?;
            let decoded: FeedbackResponse = successful(response)?
                .json()
                .await
                .map_err(GatewayError::Malformed)?;
            Ok(decoded.message)
        }
    }

    fn request_training(&self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime available; skipping training trigger");
            return;
        };
        let client = self.client.clone();
        let url = self.endpoint(TRAIN_PATH);
        let _ = runtime.spawn(async move {
            match client.post(&url).send().await {
                Ok(response) => debug!(status = %response.status(), "training triggered"),
                Err(error) => debug!(%error, "training trigger failed"),
            }
        });
    }
}

fn successful(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(GatewayError::Status {
            status: status.as_u16(),
        })
    }
}
