use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    /// How often the dispatch timer fires, in millis. Must be finer than the
    /// smallest reminder granularity the service promises.
    pub dispatch_interval_millis: u64,
    /// How long a claimed reminder stays reserved before an unrecorded claim
    /// expires and the reminder becomes claimable again, in millis
    pub claim_ttl_millis: i64,
    /// Display name used as the sender in SMS bodies
    pub sms_sender_name: String,
    /// Address of the queue consumer socket the publisher connects to
    pub queue_address: String,
    /// Upper bound on a single storage call, in millis
    pub storage_timeout_millis: u64,
    /// Upper bound on a single queue send, in millis
    pub transport_timeout_millis: u64,
}

fn env_millis(var: &str, default: u64) -> u64 {
    match std::env::var(var) {
        Ok(value) => match value.parse::<u64>() {
            Ok(millis) => millis,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    var, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    pub fn new() -> Self {
        let sms_sender_name =
            std::env::var("SMS_SENDER_NAME").unwrap_or_else(|_| "Remindd".into());
        let queue_address =
            std::env::var("QUEUE_ADDRESS").unwrap_or_else(|_| "127.0.0.1:5555".into());

        Self {
            dispatch_interval_millis: env_millis("DISPATCH_INTERVAL_MILLIS", 1000),
            claim_ttl_millis: env_millis("CLAIM_TTL_MILLIS", 60 * 1000) as i64,
            sms_sender_name,
            queue_address,
            storage_timeout_millis: env_millis("STORAGE_TIMEOUT_MILLIS", 5 * 1000),
            transport_timeout_millis: env_millis("TRANSPORT_TIMEOUT_MILLIS", 5 * 1000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
