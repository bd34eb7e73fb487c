//! `POST /api/calculate`.
//!
//! | Body | Status | Reply |
//! |---|---|---|
//! | not JSON | 400 | `{"status":"error","error":"malformed_json",...}` |
//! | JSON without `date` | 200 | `{"status":"success","message":"Not yet implemented"}` |
//! | birth request | 200 | `{"status":"success","chart":{...}}` |
//! | invalid birth data | 422 | `{"status":"error","error":"invalid_input","field":...}` |
//! | chart cannot be computed | 500 | `{"status":"error","error":"computation_failed",...}` |

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::chart::{BirthInput, ChartEngine, ChartError, ChartResult, ChartSettings};
use crate::response::{IntoResponse, Json, Response};
use crate::{Request, Status};

/// Birth data as posted by the calculator form.
#[derive(Clone, Debug, Deserialize)]
pub struct BirthRequest {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM` or `HH:MM:SS`, local clock time
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    /// UTC offset (`+05:30`, `Z`) or IANA zone (`Asia/Kolkata`)
    pub timezone: String,
    #[serde(default)]
    pub settings: Option<ChartSettings>,
}

impl BirthRequest {
    pub fn to_input(&self) -> Result<BirthInput, ChartError> {
        BirthInput::parse(&self.date, &self.time, self.latitude, self.longitude, &self.timezone)
    }
}

#[derive(Serialize)]
struct Stub {
    status: &'static str,
    message: &'static str,
}

const NOT_IMPLEMENTED: Stub = Stub { status: "success", message: "Not yet implemented" };

#[derive(Serialize)]
struct Calculated {
    status: &'static str,
    chart: ChartResult,
}

#[derive(Serialize)]
struct Failure {
    status: &'static str,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    message: String,
}

impl Failure {
    fn new(error: &'static str, field: Option<&'static str>, message: impl Into<String>) -> Self {
        Self { status: "error", error, field, message: message.into() }
    }
}

pub async fn calculate(engine: Arc<ChartEngine>, req: Request) -> Response {
    let payload: Value = match req.json() {
        Ok(value) => value,
        Err(e) => {
            return (Status::BadRequest, Json(Failure::new("malformed_json", None, e.to_string())))
                .into_response();
        }
    };

    if payload.get("date").is_none() {
        return Json(NOT_IMPLEMENTED).into_response();
    }

    let birth: BirthRequest = match serde_json::from_value(payload) {
        Ok(birth) => birth,
        Err(e) => return reject(ChartError::InvalidInput { field: "body", message: e.to_string() }),
    };

    let input = match birth.to_input() {
        Ok(input) => input,
        Err(e) => return reject(e),
    };
    let settings = birth.settings.as_ref().unwrap_or(engine.defaults());

    match engine.calculate_with(&input, settings) {
        Ok(chart) => Json(Calculated { status: "success", chart }).into_response(),
        Err(e) => reject(e),
    }
}

fn reject(e: ChartError) -> Response {
    match e {
        ChartError::InvalidInput { field, message } => {
            debug!(field, "rejected birth data: {message}");
            (Status::UnprocessableContent, Json(Failure::new("invalid_input", Some(field), message)))
                .into_response()
        }
        ChartError::Computation(message) => {
            error!("chart computation failed: {message}");
            (Status::InternalServerError, Json(Failure::new("computation_failed", None, message)))
                .into_response()
        }
    }
}
