//! Chain access used by the adapter
//!
//! The adapter only needs the chain id (to pick the aggregator network) and
//! read-only calls (allowance checks). Any ethers provider qualifies.

use async_trait::async_trait;
use ethers::providers::{JsonRpcClient, Middleware, Provider};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, TransactionRequest, U256};

#[async_trait]
pub trait ChainProvider: Send + Sync {
    async fn chain_id(&self) -> anyhow::Result<u64>;

    /// Execute a read-only call against the latest block
    async fn eth_call(&self, to: Address, data: Bytes) -> anyhow::Result<Bytes>;
}

#[async_trait]
impl<P> ChainProvider for Provider<P>
where
    P: JsonRpcClient + 'static,
{
    async fn chain_id(&self) -> anyhow::Result<u64> {
        let chain_id = Middleware::get_chainid(self).await?;
        chain_id_to_u64(chain_id)
    }

    async fn eth_call(&self, to: Address, data: Bytes) -> anyhow::Result<Bytes> {
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();
        let output = Middleware::call(self, &tx, None).await?;
        Ok(output)
    }
}

/// Narrow an RPC-reported chain id without panicking on oversized values
pub(crate) fn chain_id_to_u64(chain_id: U256) -> anyhow::Result<u64> {
    if chain_id > U256::from(u64::MAX) {
        anyhow::bail!("Chain id {} does not fit in 64 bits", chain_id);
    }
    Ok(chain_id.as_u64())
}
