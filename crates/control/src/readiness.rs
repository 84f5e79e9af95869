use crate::lambda_cli::{FunctionState, LambdaCli};
use fogros_models::{ProvisionError, ReadinessConfig, ReadinessMode};
use fogros_telemetry::TracingService;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
    pub timeout: Duration,
}

impl Backoff {
    fn next(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max)
    }
}

/// How to decide that a freshly created function can be invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessStrategy {
    /// Check the function state until `Active`, backing off between checks.
    Poll(Backoff),
    /// Sleep unconditionally; no status checks are issued.
    FixedDelay(Duration),
}

impl ReadinessStrategy {
    pub fn from_config(config: &ReadinessConfig) -> Self {
        match config.mode {
            ReadinessMode::Poll => {
                let initial_ms = config.initial_backoff_ms.max(1);
                ReadinessStrategy::Poll(Backoff {
                    initial: Duration::from_millis(initial_ms),
                    max: Duration::from_millis(config.max_backoff_ms.max(initial_ms)),
                    timeout: Duration::from_millis(config.timeout_ms),
                })
            }
            ReadinessMode::Fixed => {
                ReadinessStrategy::FixedDelay(Duration::from_millis(config.fixed_delay_ms))
            }
        }
    }

    /// Returns the number of status checks issued.
    #[instrument(skip(self, lambda))]
    pub async fn wait_until_ready(
        &self,
        lambda: &LambdaCli,
        function_name: &str,
    ) -> Result<u32, ProvisionError> {
        match self {
            ReadinessStrategy::FixedDelay(delay) => {
                info!("Waiting {:?} for {} to become ready", delay, function_name);
                tokio::time::sleep(*delay).await;
                Ok(0)
            }
            ReadinessStrategy::Poll(backoff) => poll(lambda, function_name, backoff).await,
        }
    }
}

async fn poll(
    lambda: &LambdaCli,
    function_name: &str,
    backoff: &Backoff,
) -> Result<u32, ProvisionError> {
    let started = Instant::now();
    let mut delay = backoff.initial;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let state = lambda.function_state(function_name).await?;
        match state {
            FunctionState::Active => {
                info!("Function {} is active after {} checks", function_name, attempt);
                return Ok(attempt);
            }
            FunctionState::Failed => {
                return Err(ProvisionError::FunctionFailed {
                    function_name: function_name.to_string(),
                    state: state.as_str().to_string(),
                });
            }
            FunctionState::NotReady(_) => {}
        }

        let elapsed = started.elapsed();
        if elapsed >= backoff.timeout {
            return Err(ProvisionError::ReadinessTimeout {
                function_name: function_name.to_string(),
                waited_ms: elapsed.as_millis() as u64,
            });
        }

        let wait = delay.min(backoff.timeout - elapsed);
        TracingService::log_readiness_check(
            function_name,
            attempt,
            state.as_str(),
            wait.as_millis() as u64,
        );
        tokio::time::sleep(wait).await;
        delay = backoff.next(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fogros_models::ProvisionerConfig;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let backoff = Backoff {
            initial: Duration::from_millis(500),
            max: Duration::from_millis(1500),
            timeout: Duration::from_secs(10),
        };
        let second = backoff.next(backoff.initial);
        assert_eq!(second, Duration::from_millis(1000));
        assert_eq!(backoff.next(second), Duration::from_millis(1500));
    }

    #[test]
    fn test_from_config() {
        let mut config = ProvisionerConfig::default().readiness;
        assert_eq!(
            ReadinessStrategy::from_config(&config),
            ReadinessStrategy::Poll(Backoff {
                initial: Duration::from_secs(1),
                max: Duration::from_secs(10),
                timeout: Duration::from_secs(120),
            })
        );

        config.initial_backoff_ms = 0;
        config.max_backoff_ms = 0;
        match ReadinessStrategy::from_config(&config) {
            ReadinessStrategy::Poll(backoff) => {
                assert_eq!(backoff.initial, Duration::from_millis(1));
                assert_eq!(backoff.max, Duration::from_millis(1));
                assert_eq!(backoff.next(backoff.initial), Duration::from_millis(1));
            }
            other => panic!("unexpected strategy: {other:?}"),
        }

        config.mode = ReadinessMode::Fixed;
        assert_eq!(
            ReadinessStrategy::from_config(&config),
            ReadinessStrategy::FixedDelay(Duration::from_secs(60))
        );
    }
}
