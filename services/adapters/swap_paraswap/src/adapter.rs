//! Swap adapter
//!
//! Turns a one-sided swap request into an ERC-20 approval plus the
//! aggregator's swap transaction, then quotes or executes them through the
//! bound wallet account.
//!
//! On simple accounts the approval and the swap are separate transactions.
//! If the swap broadcast fails after the approval landed, the allowance stays
//! on-chain; the error is returned as-is and nothing is rolled back.

use ethers::types::U256;
use std::sync::Arc;
use tracing::debug;

use crate::account::{BundleOptions, BundledAccount, SentTransaction, SimpleAccount, WalletAccount};
use crate::aggregator::{BuildTxOptions, BuildTxRequest, RateRequest};
use crate::allowance::AllowanceResetPolicy;
use crate::config::{ResolvedSwapConfig, SwapConfig, SwapConfigOverride};
use crate::error::{Result, SwapError};
use crate::lazy::{paraswap_factory, AggregatorFactory, LazyAggregator};
use crate::provider::ChainProvider;
use crate::types::{SwapOutcome, SwapQuote, SwapRequest, SwapTransactions, TransactionIntent};
use crate::{log_error, log_execution, log_success, log_swap, log_warning};

pub struct SwapAdapter {
    account: WalletAccount,
    provider: Option<Arc<dyn ChainProvider>>,
    aggregator: LazyAggregator,
    config: SwapConfig,
    allowance_policy: AllowanceResetPolicy,
}

impl SwapAdapter {
    /// Adapter backed by the public ParaSwap API
    pub fn new(
        account: WalletAccount,
        provider: Option<Arc<dyn ChainProvider>>,
        config: SwapConfig,
    ) -> Self {
        let factory = paraswap_factory(config.aggregator.clone());
        Self::with_aggregator_factory(account, provider, config, factory)
    }

    pub fn with_aggregator_factory(
        account: WalletAccount,
        provider: Option<Arc<dyn ChainProvider>>,
        config: SwapConfig,
        factory: AggregatorFactory,
    ) -> Self {
        Self {
            aggregator: LazyAggregator::new(provider.clone(), factory),
            account,
            provider,
            config,
            allowance_policy: AllowanceResetPolicy::standard(),
        }
    }

    pub fn with_allowance_policy(mut self, policy: AllowanceResetPolicy) -> Self {
        self.allowance_policy = policy;
        self
    }

    pub fn account(&self) -> &WalletAccount {
        &self.account
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    fn ensure_connected(&self) -> Result<&Arc<dyn ChainProvider>> {
        self.provider.as_ref().ok_or(SwapError::NotConnected)
    }

    /// Price the request and build the reset (if needed), approval and swap intents
    pub(crate) async fn build_swap_transactions(
        &self,
        request: &SwapRequest,
    ) -> Result<SwapTransactions> {
        let (side, amount) = request.validate()?;

        let aggregator = self.aggregator.get().await?;
        let route = aggregator
            .get_rate(&RateRequest {
                src_token: request.token_in,
                dest_token: request.token_out,
                amount,
                side,
            })
            .await?;

        let src_amount = route.src_amount_u256()?;
        let dest_amount = route.dest_amount_u256()?;

        let account = self.account.address().await?;
        let receiver = request.to.unwrap_or(account);

        let payload = aggregator
            .build_tx(
                &BuildTxRequest {
                    src_token: request.token_in,
                    dest_token: request.token_out,
                    src_amount,
                    dest_amount,
                    price_route: route,
                    user_address: account,
                    receiver,
                    partner: self.config.aggregator.partner.clone(),
                },
                &BuildTxOptions { ignore_checks: true },
            )
            .await?;

        let spender = payload.to;
        let approval = TransactionIntent::contract_call(
            request.token_in,
            dex::encode_approve(spender, src_amount)?,
        );
        let swap = TransactionIntent {
            to: payload.to,
            value: payload.value,
            data: payload.data,
            from: None,
        };

        let reset_allowance = self
            .allowance_policy
            .reset_intent(
                self.ensure_connected()?.as_ref(),
                aggregator.chain_id(),
                request.token_in,
                account,
                spender,
            )
            .await?;

        debug!(
            "Built swap {} {:?} -> {} {:?} via {:?} (reset: {})",
            src_amount,
            request.token_in,
            dest_amount,
            request.token_out,
            spender,
            reset_allowance.is_some()
        );

        Ok(SwapTransactions {
            reset_allowance,
            approval,
            swap,
            token_in_amount: src_amount,
            token_out_amount: dest_amount,
        })
    }

    /// Quote the total fee and amounts of a swap without sending anything
    pub async fn quote(&self, request: &SwapRequest) -> Result<SwapQuote> {
        self.ensure_connected()?;
        request.validate()?;

        if !self.account.can_sign() {
            return Err(read_only("fee quotes"));
        }

        let txs = self.build_swap_transactions(request).await?;

        let fee = match &self.account {
            WalletAccount::Bundled(account) => {
                let options = BundleOptions {
                    paymaster_token: self.config.paymaster_token,
                };
                account
                    .quote_send_transactions(&txs.intents(), &options)
                    .await?
                    .fee
            }
            WalletAccount::Simple(account) => quote_each(account.as_ref(), &txs.intents()).await?,
            WalletAccount::ReadOnly(_) => return Err(read_only("fee quotes")),
        };

        debug!(
            "Quoted swap: fee {}, in {}, out {}",
            fee, txs.token_in_amount, txs.token_out_amount
        );

        Ok(SwapQuote {
            fee,
            token_in_amount: txs.token_in_amount,
            token_out_amount: txs.token_out_amount,
        })
    }

    /// Execute a swap, rejecting it before any broadcast if the fee is above the ceiling
    pub async fn execute(
        &self,
        request: &SwapRequest,
        overrides: Option<&SwapConfigOverride>,
    ) -> Result<SwapOutcome> {
        if !self.account.can_sign() {
            return Err(read_only("swap execution"));
        }
        self.ensure_connected()?;

        let txs = self.build_swap_transactions(request).await?;
        let resolved = self.config.resolve(overrides);

        log_swap!(
            "Executing {} account swap: {} in, {} out",
            self.account.kind(),
            txs.token_in_amount,
            txs.token_out_amount
        );

        match &self.account {
            WalletAccount::Bundled(account) => {
                self.execute_bundled(account.as_ref(), txs, &resolved).await
            }
            WalletAccount::Simple(account) => {
                self.execute_simple(account.as_ref(), txs, &resolved).await
            }
            WalletAccount::ReadOnly(_) => Err(read_only("swap execution")),
        }
    }

    async fn execute_bundled(
        &self,
        account: &dyn BundledAccount,
        txs: SwapTransactions,
        resolved: &ResolvedSwapConfig,
    ) -> Result<SwapOutcome> {
        let intents = txs.intents();
        let options = BundleOptions {
            paymaster_token: resolved.paymaster_token,
        };

        let quote = account.quote_send_transactions(&intents, &options).await?;
        if let Err(e) = resolved.check_fee(quote.fee) {
            log_warning!("Swap rejected before broadcast: {}", e);
            return Err(e);
        }

        log_execution!("Submitting bundle of {} operations", intents.len());
        let sent = account
            .send_transactions(&intents, &options)
            .await
            .map_err(|e| {
                log_error!("Bundle submission failed: {:#}", e);
                SwapError::from(e)
            })?;

        log_success!("Swap bundle submitted: {}", sent.hash);

        Ok(SwapOutcome {
            hash: sent.hash,
            approval_hash: None,
            reset_allowance_hash: None,
            fee: sent.fee,
            token_in_amount: txs.token_in_amount,
            token_out_amount: txs.token_out_amount,
        })
    }

    async fn execute_simple(
        &self,
        account: &dyn SimpleAccount,
        txs: SwapTransactions,
        resolved: &ResolvedSwapConfig,
    ) -> Result<SwapOutcome> {
        let fee = quote_each(account, &txs.intents()).await?;
        if let Err(e) = resolved.check_fee(fee) {
            log_warning!("Swap rejected before broadcast: {}", e);
            return Err(e);
        }

        let mut total_fee = U256::zero();

        let reset_allowance_hash = match &txs.reset_allowance {
            Some(reset) => {
                let sent = send_step(account, reset, "allowance reset").await?;
                total_fee = total_fee.saturating_add(sent.fee);
                Some(sent.hash)
            }
            None => None,
        };

        let approval = send_step(account, &txs.approval, "approval").await?;
        total_fee = total_fee.saturating_add(approval.fee);

        // The allowance stays on-chain if this fails
        let swap = send_step(account, &txs.swap, "swap").await?;
        total_fee = total_fee.saturating_add(swap.fee);

        log_success!("Swap sent: {} (approval {})", swap.hash, approval.hash);

        Ok(SwapOutcome {
            hash: swap.hash,
            approval_hash: Some(approval.hash),
            reset_allowance_hash,
            fee: total_fee,
            token_in_amount: txs.token_in_amount,
            token_out_amount: txs.token_out_amount,
        })
    }
}

fn read_only(operation: &str) -> SwapError {
    SwapError::Unsupported(format!("{} requires an account that can sign transactions", operation))
}

/// Sum independent fee quotes
async fn quote_each(account: &dyn SimpleAccount, intents: &[TransactionIntent]) -> Result<U256> {
    let mut total = U256::zero();
    for intent in intents {
        let quote = account.quote_send_transaction(intent).await?;
        total = total.saturating_add(quote.fee);
    }
    Ok(total)
}

async fn send_step(
    account: &dyn SimpleAccount,
    intent: &TransactionIntent,
    step: &str,
) -> Result<SentTransaction> {
    log_execution!("Sending {} transaction to {:?}", step, intent.to);
    account.send_transaction(intent).await.map_err(|e| {
        log_error!("{} transaction failed: {:#}", step, e);
        SwapError::from(e)
    })
}
