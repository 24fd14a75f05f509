use mood_core::CoreError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::sleep;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub time_window: Duration,
    pub burst_allowance: u32,
}

impl RateLimitConfig {
    pub fn reddit_oauth() -> Self {
        Self {
            max_requests: 100, // Reddit allows 100 requests per minute for OAuth2 clients
            time_window: Duration::from_secs(60),
            burst_allowance: 10,
        }
    }

    /// Tokens regained per second.
    pub fn refill_rate(&self) -> f64 {
        self.max_requests as f64 / self.time_window.as_secs_f64()
    }
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

#[derive(Debug)]
pub struct TokenBucket {
    state: Mutex<BucketState>,
    capacity: f64,
    refill_rate: f64,
}

impl TokenBucket {
    pub fn new(config: &RateLimitConfig) -> Self {
        let capacity = config.burst_allowance as f64;
        Self {
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
            capacity,
            refill_rate: config.refill_rate(),
        }
    }

    /// Take `tokens_needed` tokens, or report how long until they are
    /// available.
    pub async fn acquire(&self, tokens_needed: f64) -> Result<(), Duration> {
        let mut state = self.state.lock().await;
        self.refill(&mut state);

        if state.tokens >= tokens_needed {
            state.tokens -= tokens_needed;
            Ok(())
        } else {
            let missing = tokens_needed - state.tokens;
            Err(Duration::from_secs_f64(missing / self.refill_rate))
        }
    }

    pub async fn available_tokens(&self) -> f64 {
        let mut state = self.state.lock().await;
        self.refill(&mut state);
        state.tokens
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill);
        state.tokens = (state.tokens + elapsed.as_secs_f64() * self.refill_rate).min(self.capacity);
        state.last_refill = now;
    }
}

/// Token-bucket limiter applied before every API call. Concurrent callers
/// are additionally capped at the burst size.
#[derive(Debug)]
pub struct RateLimiter {
    token_bucket: TokenBucket,
    semaphore: Arc<Semaphore>,
    config: RateLimitConfig,
    permits_granted: AtomicU64,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            token_bucket: TokenBucket::new(&config),
            semaphore: Arc::new(Semaphore::new(config.burst_allowance as usize)),
            config,
            permits_granted: AtomicU64::new(0),
        }
    }

    pub async fn acquire_permit(&self) -> Result<RateLimitPermit, CoreError> {
        let start_time = Instant::now();
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| CoreError::Internal {
                message: "rate limiter closed".to_string(),
            })?;

        loop {
            match self.token_bucket.acquire(1.0).await {
                Ok(()) => break,
                Err(wait_time) => {
                    debug!("Rate limit reached, waiting {:?}", wait_time);
                    sleep(wait_time).await;
                }
            }
        }

        self.permits_granted.fetch_add(1, Ordering::Relaxed);
        Ok(RateLimitPermit {
            _permit: permit,
            queue_wait_time: start_time.elapsed(),
        })
    }

    pub async fn status(&self) -> RateLimitStatus {
        let available_tokens = self.token_bucket.available_tokens().await;
        let max_tokens = self.config.burst_allowance;

        RateLimitStatus {
            available_tokens: available_tokens as u32,
            max_tokens,
            available_permits: self.semaphore.available_permits(),
            requests_per_minute: self.config.max_requests,
            permits_granted: self.permits_granted.load(Ordering::Relaxed),
            is_near_limit: available_tokens < max_tokens as f64 * 0.2,
        }
    }
}

#[derive(Debug)]
pub struct RateLimitPermit {
    _permit: OwnedSemaphorePermit,
    pub queue_wait_time: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub available_tokens: u32,
    pub max_tokens: u32,
    pub available_permits: usize,
    pub requests_per_minute: u32,
    pub permits_granted: u64,
    pub is_near_limit: bool,
}

impl RateLimitStatus {
    pub fn utilization_percentage(&self) -> f64 {
        if self.max_tokens == 0 {
            return 0.0;
        }
        let used = self.max_tokens.saturating_sub(self.available_tokens);
        used as f64 / self.max_tokens as f64 * 100.0
    }
}
