//! AWS Lambda handler for running a single property projection
//!
//! Accepts investment parameters as the JSON event payload (missing fields use
//! defaults) and returns the full scenario report, or an error message when
//! the parameters fail validation.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use realty_projection::{InvestmentParameters, ScenarioReport, ScenarioRunner};
use serde::Serialize;

/// Output from the projection
#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ScenarioReport>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Lambda handler function
async fn handler(event: LambdaEvent<InvestmentParameters>) -> Result<ProjectionResponse, Error> {
    let start = std::time::Instant::now();
    let params = event.payload;

    let response = match ScenarioRunner::new().run(&params) {
        Ok(report) => ProjectionResponse {
            report: Some(report),
            execution_time_ms: start.elapsed().as_millis() as u64,
            error: None,
        },
        Err(e) => {
            log::warn!("rejected parameters: {}", e);
            ProjectionResponse {
                report: None,
                execution_time_ms: start.elapsed().as_millis() as u64,
                error: Some(e.to_string()),
            }
        }
    };

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
