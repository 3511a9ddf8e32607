use crate::breaker::{Admission, BreakerConfig, CircuitBreaker};
use crate::call_kind::CallKind;
use crate::retry::RetryPolicy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use transport::{Envelope, ErrorKind, RpcError, RpcRequest, RpcResponse};

/// Thin wrapper around `reqwest::Client`: POSTs an envelope-wrapped request
/// to a peer's `/mcp` endpoint, decodes the response, and applies the
/// deadline/retry/breaker policy uniformly for every caller.
pub struct RpcClient {
    http: reqwest::Client,
    retry: RetryPolicy,
    breaker: Arc<CircuitBreaker>,
    /// Multiplies every `CallKind` deadline. `1.0` in production; test
    /// harnesses shrink this so a scenario exercising `request_move`'s 30s
    /// deadline (e.g. a silent player) doesn't make the suite slow.
    deadline_scale: f64,
}

impl RpcClient {
    pub fn new() -> Self {
        RpcClient::with_policies(RetryPolicy::default(), BreakerConfig::default())
    }

    pub fn with_policies(retry: RetryPolicy, breaker_config: BreakerConfig) -> Self {
        RpcClient {
            http: reqwest::Client::new(),
            retry,
            breaker: Arc::new(CircuitBreaker::new(breaker_config)),
            deadline_scale: 1.0,
        }
    }

    /// Scales every outbound call's deadline by `scale` (e.g. `0.01` turns
    /// a 30s `request_move` deadline into 300ms). Intended for test
    /// harnesses only; production agents never call this.
    pub fn with_deadline_scale(mut self, scale: f64) -> Self {
        self.deadline_scale = scale;
        self
    }

    pub fn breaker(&self) -> Arc<CircuitBreaker> {
        Arc::clone(&self.breaker)
    }

    /// Sends one JSON-RPC call to `endpoint`, retrying transport-level
    /// failures under the configured policy and respecting the circuit
    /// breaker for `endpoint`.
    pub async fn call<P, T>(
        &self,
        endpoint: &str,
        method: &str,
        id: Value,
        payload: Envelope<P>,
    ) -> Result<T, RpcError>
    where
        P: Serialize + Clone,
        T: DeserializeOwned,
    {
        let kind = CallKind::for_method(method);
        let deadline = kind.deadline().mul_f64(self.deadline_scale.max(0.001));

        for attempt in 0..self.retry.max_attempts {
            match self.breaker.admit(endpoint).await {
                Admission::Rejected => {
                    return Err(RpcError::new(
                        ErrorKind::ConnectionRefused,
                        format!("circuit open for {endpoint}"),
                    ));
                }
                Admission::Allowed => {}
            }

            let request = RpcRequest::new(method, payload.clone(), id.clone());
            match self.attempt_once::<P, T>(endpoint, &request, deadline).await {
                Ok(response) => {
                    self.breaker.record_success(endpoint).await;
                    return response.into_result();
                }
                Err(err) if err.kind.is_retryable() => {
                    self.breaker.record_failure(endpoint).await;
                    if attempt + 1 == self.retry.max_attempts {
                        return Err(err);
                    }
                    tokio::time::sleep(self.retry.delay_for(attempt)).await;
                }
                Err(err) => {
                    // A non-retryable transport error (e.g. breaker-observed
                    // auth failure) still counts against the breaker, but we
                    // don't retry it.
                    if err.kind.is_transport() {
                        self.breaker.record_failure(endpoint).await;
                    }
                    return Err(err);
                }
            }
        }
        unreachable!("retry loop always returns within max_attempts iterations")
    }

    async fn attempt_once<P, T>(
        &self,
        endpoint: &str,
        request: &RpcRequest<P>,
        deadline: Duration,
    ) -> Result<RpcResponse<T>, RpcError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let send = self.http.post(endpoint).json(request).send();
        let response = match tokio::time::timeout(deadline, send).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(_)) => {
                return Err(RpcError::new(ErrorKind::ConnectionRefused, format!("could not reach {endpoint}")));
            }
            Err(_) => return Err(RpcError::new(ErrorKind::Timeout, format!("call to {endpoint} timed out"))),
        };

        let body: RpcResponse<T> = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                return Err(RpcError::new(
                    ErrorKind::MalformedMessage,
                    format!("could not decode response from {endpoint}: {e}"),
                ));
            }
        };
        Ok(body)
    }
}

impl Default for RpcClient {
    fn default() -> Self {
        RpcClient::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_calls_use_the_ten_second_deadline() {
        assert_eq!(CallKind::Control.deadline(), Duration::from_secs(10));
    }
}
