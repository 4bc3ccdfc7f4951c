//! Per-client rate limiting applied to the whole application.

use actix_governor::{GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor};

use crate::config::Config;

pub type RateLimiterConfig = GovernorConfig<
    PeerIpKeyExtractor,
    actix_governor::governor::middleware::NoOpMiddleware<
        actix_governor::governor::clock::QuantaInstant,
    >,
>;

/// Build the limiter from configuration.
///
/// `rate_limit_requests` may be spent in a burst; the quota refills evenly
/// over `rate_limit_window_secs` (at least one request per second).
/// Returns `None` when the resulting quota is unusable.
pub fn create_rate_limiter_config(config: &Config) -> Option<RateLimiterConfig> {
    let requests = u64::from(config.rate_limit_requests.max(1));
    let seconds_per_request = (config.rate_limit_window_secs / requests).max(1);

    GovernorConfigBuilder::default()
        .seconds_per_request(seconds_per_request)
        .burst_size(config.rate_limit_requests)
        .finish()
}
