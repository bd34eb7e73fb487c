//! Liveness and readiness probes.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can it serve charts? Failure → pulled from the load balancer. |

use crate::{Request, Response};

/// Always `200 OK` with body `"ok"`. If the process can answer HTTP at all,
/// it is alive.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with body `"ready"`. The chart engine loads nothing at startup,
/// so there is no warm-up to wait for.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}
