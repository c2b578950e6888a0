use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::warn;

use crate::metrics::{RATE_LIMITED_TOTAL, REQUEST_TOTAL};
use crate::models::{StatusOnlyResponse, StatusResponse};
use crate::rate_limit::Decision;
use crate::state::AppState;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Works out which address a request is really coming from.
///
/// Forwarding headers are only believed when the TCP peer is a trusted
/// proxy. `X-Forwarded-For` is read right to left and the first hop that is
/// not itself a trusted proxy wins; `X-Real-IP` is the fallback.
pub fn resolve_client_ip(peer: IpAddr, headers: &HeaderMap, trusted: &[IpAddr]) -> IpAddr {
    if !trusted.contains(&peer) {
        return peer;
    }

    forwarded_for(headers, trusted)
        .or_else(|| real_ip(headers))
        .unwrap_or(peer)
}

fn forwarded_for(headers: &HeaderMap, trusted: &[IpAddr]) -> Option<IpAddr> {
    // a single unparsable hop makes the whole header untrustworthy
    let hops: Vec<IpAddr> = headers
        .get_all(X_FORWARDED_FOR)
        .iter()
        .map(|v| v.to_str().ok())
        .collect::<Option<Vec<&str>>>()?
        .into_iter()
        .flat_map(|v| v.split(','))
        .map(|hop| hop.trim().parse().ok())
        .collect::<Option<Vec<IpAddr>>>()?;

    hops.iter()
        .rev()
        .find(|ip| !trusted.contains(*ip))
        .or(hops.first())
        .copied()
}

fn real_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers.get(X_REAL_IP)?.to_str().ok()?.trim().parse().ok()
}

// Fixed-window gate in front of every route
pub async fn rate_limit(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    REQUEST_TOTAL.inc();

    // IPv4 peers on a dual-stack socket show up as ::ffff:a.b.c.d
    let peer = addr.ip().to_canonical();
    let client = resolve_client_ip(peer, request.headers(), &state.trusted_proxies);

    match state.limiter.admit(&client.to_string()) {
        Decision::Allow { remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert("x-ratelimit-limit", HeaderValue::from(state.limiter.limit()));
            headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
            response
        }
        Decision::Reject { retry_after } => {
            RATE_LIMITED_TOTAL.inc();
            warn!(client = %client, path = %request.uri().path(), "Rate limit exceeded");

            // round up so clients never retry early
            let retry_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, HeaderValue::from(retry_secs))],
                Json(StatusOnlyResponse {
                    status: StatusResponse::new(
                        StatusCode::TOO_MANY_REQUESTS,
                        "Rate limit exceeded. Try again later.",
                        "RL_429_TOO_MANY_REQUESTS",
                    ),
                }),
            )
                .into_response()
        }
    }
}
