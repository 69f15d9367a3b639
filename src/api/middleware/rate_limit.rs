//! Rate limiting middleware using token bucket algorithm.

use std::sync::Arc;

use axum::Router;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::state::AppState;

/// Applies a per-IP limiter for public endpoints.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// With `behind_proxy`, the client IP comes from `X-Forwarded-For` /
/// `X-Real-IP` headers; otherwise from the socket peer address. Enable the
/// flag only behind a trusted reverse proxy, since the headers are
/// client-controlled.
pub fn public(router: Router<AppState>, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        let conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_second(2)
                .burst_size(100)
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .unwrap(),
        );
        router.layer(GovernorLayer::new(conf))
    } else {
        let conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_second(2)
                .burst_size(100)
                .key_extractor(PeerIpKeyExtractor)
                .finish()
                .unwrap(),
        );
        router.layer(GovernorLayer::new(conf))
    }
}

/// Applies a stricter limiter for authenticated endpoints.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
pub fn secure(router: Router<AppState>, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        let conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_second(1)
                .burst_size(10)
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .unwrap(),
        );
        router.layer(GovernorLayer::new(conf))
    } else {
        let conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_second(1)
                .burst_size(10)
                .key_extractor(PeerIpKeyExtractor)
                .finish()
                .unwrap(),
        );
        router.layer(GovernorLayer::new(conf))
    }
}
