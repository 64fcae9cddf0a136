//! Lazily initialized aggregator client
//!
//! The client is bound to the provider's chain id, which is only known after
//! an RPC round trip. The first call that needs the client performs that
//! initialization; concurrent callers wait on the same attempt. A failed
//! attempt is not cached, so the next caller starts a fresh one.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::aggregator::{AggregatorClient, ParaSwapClient};
use crate::config::AggregatorConfig;
use crate::error::{Result, SwapError};
use crate::provider::ChainProvider;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Builds an aggregator client for a chain id
pub type AggregatorFactory =
    Arc<dyn Fn(u64) -> BoxFuture<'static, anyhow::Result<Arc<dyn AggregatorClient>>> + Send + Sync>;

/// Factory producing [`ParaSwapClient`]s
pub fn paraswap_factory(config: AggregatorConfig) -> AggregatorFactory {
    Arc::new(move |chain_id| {
        let config = config.clone();
        Box::pin(async move {
            let client = ParaSwapClient::new(chain_id, &config)?;
            Ok::<_, anyhow::Error>(Arc::new(client) as Arc<dyn AggregatorClient>)
        })
    })
}

pub struct LazyAggregator {
    provider: Option<Arc<dyn ChainProvider>>,
    factory: AggregatorFactory,
    client: OnceCell<Arc<dyn AggregatorClient>>,
    attempts: AtomicU64,
}

impl LazyAggregator {
    pub fn new(provider: Option<Arc<dyn ChainProvider>>, factory: AggregatorFactory) -> Self {
        Self {
            provider,
            factory,
            client: OnceCell::new(),
            attempts: AtomicU64::new(0),
        }
    }

    /// Resolve the client, initializing it on first use
    pub async fn get(&self) -> Result<Arc<dyn AggregatorClient>> {
        let provider = self.provider.as_ref().ok_or(SwapError::NotConnected)?;

        let client = self
            .client
            .get_or_try_init(|| async {
                let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
                let chain_id = provider.chain_id().await?;
                crate::log_network!(
                    "Initializing aggregator client for chain {} (attempt {})",
                    chain_id, attempt
                );
                (self.factory)(chain_id).await.map_err(SwapError::from)
            })
            .await?;

        Ok(client.clone())
    }

    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Number of initialization attempts started so far
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockAggregator, MockChainProvider};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn counting_factory(calls: Arc<AtomicUsize>, delay: Duration) -> AggregatorFactory {
        Arc::new(move |chain_id| {
            let calls = calls.clone();
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                Ok::<_, anyhow::Error>(
                    Arc::new(MockAggregator::with_chain_id(chain_id)) as Arc<dyn AggregatorClient>
                )
            })
        })
    }

    #[tokio::test]
    async fn test_missing_provider_is_not_connected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = LazyAggregator::new(None, counting_factory(calls.clone(), Duration::ZERO));

        assert!(matches!(lazy.get().await, Err(SwapError::NotConnected)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrent_first_calls_share_one_initialization() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = Arc::new(MockChainProvider::new(137));
        let lazy = Arc::new(LazyAggregator::new(
            Some(provider.clone() as Arc<dyn ChainProvider>),
            counting_factory(calls.clone(), Duration::from_millis(20)),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = lazy.clone();
                tokio::spawn(async move { lazy.get().await.map(|c| c.chain_id()) })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 137);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.chain_id_calls(), 1);
        assert!(lazy.is_initialized());
    }

    #[tokio::test]
    async fn test_failed_initialization_is_retried() {
        let provider = Arc::new(MockChainProvider::new(1));
        provider.fail_chain_id_once("connection refused");

        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = LazyAggregator::new(
            Some(provider.clone() as Arc<dyn ChainProvider>),
            counting_factory(calls.clone(), Duration::ZERO),
        );

        let err = lazy.get().await.err().unwrap();
        assert!(err.is_upstream());
        assert_eq!(err.to_string(), "connection refused");
        assert!(!lazy.is_initialized());

        let client = lazy.get().await.unwrap();
        assert_eq!(client.chain_id(), 1);
        assert_eq!(lazy.attempts(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
