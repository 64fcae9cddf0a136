//! ParaSwap REST client
//!
//! Two endpoints are used:
//! - `GET /prices` for the best route of a one-sided trade
//! - `POST /transactions/{network}` for the calldata executing that route
//!
//! Amounts travel as decimal strings in both directions.

use anyhow::Context;
use async_trait::async_trait;
use ethers::types::{Address, Bytes, U256};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::route::parse_amount;
use super::{
    AggregatorClient, AggregatorError, BuildTxOptions, BuildTxRequest, PriceRoute, RateRequest,
    SwapPayload,
};
use crate::config::AggregatorConfig;
use swap_config::aggregator::POOL_IDLE_TIMEOUT_SECS;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PricesResponse {
    price_route: PriceRoute,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    #[serde(default)]
    from: Option<Address>,
    to: Address,
    #[serde(default)]
    value: Option<String>,
    data: Bytes,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// ParaSwap client bound to one network
pub struct ParaSwapClient {
    http: reqwest::Client,
    base_url: Url,
    chain_id: u64,
    api_version: String,
}

impl ParaSwapClient {
    pub fn new(chain_id: u64, config: &AggregatorConfig) -> Result<Self, AggregatorError> {
        let http = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .timeout(config.timeout)
            .tcp_nodelay(true)
            .build()?;

        crate::log_network!("ParaSwap client for chain {} at {}", chain_id, config.base_url);

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            chain_id,
            api_version: config.api_version.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AggregatorError> {
        // Keep any path prefix on the base URL
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AggregatorError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(AggregatorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Parse a `value` field that may be decimal or `0x` hex
fn parse_value(raw: Option<&str>) -> Result<U256, AggregatorError> {
    match raw {
        None | Some("") => Ok(U256::zero()),
        Some(hex) if hex.starts_with("0x") || hex.starts_with("0X") => {
            U256::from_str_radix(&hex[2..], 16).map_err(|_| AggregatorError::InvalidAmount {
                field: "value",
                value: hex.to_string(),
            })
        }
        Some(decimal) => parse_amount("value", decimal),
    }
}

fn addr(address: &Address) -> String {
    format!("{:?}", address)
}

#[async_trait]
impl AggregatorClient for ParaSwapClient {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn get_rate(&self, request: &RateRequest) -> anyhow::Result<PriceRoute> {
        let url = self.endpoint("prices")?;
        crate::log_search!(
            "Pricing {} {} -> {} ({})",
            request.amount,
            addr(&request.src_token),
            addr(&request.dest_token),
            request.side.as_str()
        );

        let response = self
            .http
            .get(url)
            .query(&[
                ("srcToken", addr(&request.src_token)),
                ("destToken", addr(&request.dest_token)),
                ("amount", request.amount.to_string()),
                ("side", request.side.as_str().to_string()),
                ("network", self.chain_id.to_string()),
                ("version", self.api_version.clone()),
            ])
            .send()
            .await
            .map_err(AggregatorError::from)?;

        let prices: PricesResponse = Self::read_json(response)
            .await
            .context("ParaSwap price request failed")?;

        debug!(
            "Route: {} -> {}",
            prices.price_route.src_amount, prices.price_route.dest_amount
        );
        Ok(prices.price_route)
    }

    async fn build_tx(
        &self,
        request: &BuildTxRequest,
        options: &BuildTxOptions,
    ) -> anyhow::Result<SwapPayload> {
        let url = self.endpoint(&format!("transactions/{}", self.chain_id))?;

        let body = json!({
            "srcToken": addr(&request.src_token),
            "destToken": addr(&request.dest_token),
            "srcAmount": request.src_amount.to_string(),
            "destAmount": request.dest_amount.to_string(),
            "priceRoute": request.price_route,
            "userAddress": addr(&request.user_address),
            "receiver": addr(&request.receiver),
            "partner": request.partner,
        });

        let response = self
            .http
            .post(url)
            .query(&[("ignoreChecks", options.ignore_checks)])
            .json(&body)
            .send()
            .await
            .map_err(AggregatorError::from)?;

        let tx: TransactionResponse = Self::read_json(response)
            .await
            .context("ParaSwap transaction build failed")?;

        Ok(SwapPayload {
            from: tx.from,
            to: tx.to,
            value: parse_value(tx.value.as_deref())?,
            data: tx.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TradeSide;
    use mockito::{Matcher, Server, ServerGuard};

    const USDT: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";
    const DAI: &str = "0x6b175474e89094c44da98b954eedeac495271d0f";
    const AUGUSTUS: &str = "0x6a000f20005980200259b80c5102003040001068";

    fn client_for(server: &ServerGuard) -> ParaSwapClient {
        let config = AggregatorConfig {
            base_url: Url::parse(&server.url()).unwrap(),
            ..Default::default()
        };
        ParaSwapClient::new(1, &config).unwrap()
    }

    fn route_json() -> serde_json::Value {
        json!({
            "srcToken": USDT,
            "destToken": DAI,
            "srcAmount": "1000000",
            "destAmount": "1000",
            "side": "SELL",
            "contractAddress": AUGUSTUS,
            "bestRoute": []
        })
    }

    fn rate_request() -> RateRequest {
        RateRequest {
            src_token: USDT.parse().unwrap(),
            dest_token: DAI.parse().unwrap(),
            amount: U256::from(1_000_000u64),
            side: TradeSide::Sell,
        }
    }

    #[tokio::test]
    async fn test_get_rate_sends_expected_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/prices")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("srcToken".into(), USDT.into()),
                Matcher::UrlEncoded("destToken".into(), DAI.into()),
                Matcher::UrlEncoded("amount".into(), "1000000".into()),
                Matcher::UrlEncoded("side".into(), "SELL".into()),
                Matcher::UrlEncoded("network".into(), "1".into()),
                Matcher::UrlEncoded("version".into(), "6.2".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(json!({ "priceRoute": route_json() }).to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let route = client.get_rate(&rate_request()).await.unwrap();

        assert_eq!(route.src_amount_u256().unwrap(), U256::from(1_000_000u64));
        assert_eq!(route.dest_amount_u256().unwrap(), U256::from(1000u64));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_message_is_surfaced() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/prices")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error":"No routes found with enough liquidity"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.get_rate(&rate_request()).await.unwrap_err();

        let api = err.downcast_ref::<AggregatorError>().unwrap();
        assert!(matches!(api, AggregatorError::Api { status: 400, .. }));
        assert!(format!("{:#}", err).contains("No routes found"));
    }

    #[tokio::test]
    async fn test_build_tx_posts_route_and_parties() {
        let mut server = Server::new_async().await;
        let user: Address = "0x1111111111111111111111111111111111111111".parse().unwrap();
        let receiver: Address = "0x2222222222222222222222222222222222222222".parse().unwrap();

        let mock = server
            .mock("POST", "/transactions/1")
            .match_query(Matcher::UrlEncoded("ignoreChecks".into(), "true".into()))
            .match_body(Matcher::PartialJson(json!({
                "srcToken": USDT,
                "destToken": DAI,
                "srcAmount": "1000000",
                "destAmount": "1000",
                "userAddress": format!("{:?}", user),
                "receiver": format!("{:?}", receiver),
                "partner": "anon",
                "priceRoute": { "contractAddress": AUGUSTUS, "bestRoute": [] }
            })))
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "from": format!("{:?}", user),
                    "to": AUGUSTUS,
                    "value": "0",
                    "data": "0xe3ead59e",
                    "chainId": 1
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let request = BuildTxRequest {
            src_token: USDT.parse().unwrap(),
            dest_token: DAI.parse().unwrap(),
            src_amount: U256::from(1_000_000u64),
            dest_amount: U256::from(1000u64),
            price_route: serde_json::from_value(route_json()).unwrap(),
            user_address: user,
            receiver,
            partner: "anon".to_string(),
        };

        let payload = client
            .build_tx(&request, &BuildTxOptions::default())
            .await
            .unwrap();

        assert_eq!(payload.to, AUGUSTUS.parse::<Address>().unwrap());
        assert_eq!(payload.from, Some(user));
        assert_eq!(payload.value, U256::zero());
        assert_eq!(payload.data, Bytes::from(vec![0xe3, 0xea, 0xd5, 0x9e]));
        mock.assert_async().await;
    }

    #[test]
    fn test_value_accepts_decimal_and_hex() {
        assert_eq!(parse_value(None).unwrap(), U256::zero());
        assert_eq!(parse_value(Some("42")).unwrap(), U256::from(42u64));
        assert_eq!(parse_value(Some("0x2a")).unwrap(), U256::from(42u64));
        assert!(parse_value(Some("0xzz")).is_err());
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = AggregatorConfig {
            base_url: Url::parse("https://proxy.example/paraswap/").unwrap(),
            ..Default::default()
        };
        let client = ParaSwapClient::new(137, &config).unwrap();
        assert_eq!(
            client.endpoint("transactions/137").unwrap().as_str(),
            "https://proxy.example/paraswap/transactions/137"
        );
    }
}
