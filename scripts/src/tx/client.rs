use json::JsonValue;
use reqwest::{header::CONTENT_TYPE, Client};
use tracing::debug;

use crate::errors::ScriptError;

/// Error cause reported by the RPC for an account that doesn't exist
const UNKNOWN_ACCOUNT_CAUSE: &str = "UNKNOWN_ACCOUNT";

/// On-chain state of an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountState {
    /// The account exists, with its balance in yoctoNEAR
    Exists { amount: String },
    Missing,
}

/// Minimal NEAR JSON-RPC client, only reading account state
#[derive(Debug, Clone)]
pub struct NearRpcClient {
    client: Client,
    url: String,
}

impl NearRpcClient {
    pub fn new(url: &str) -> Self {
        NearRpcClient {
            client: Client::new(),
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query the state of `account_id` at final finality
    pub async fn view_account(&self, account_id: &str) -> Result<AccountState, ScriptError> {
        let mut params = JsonValue::new_object();
        params["request_type"] = "view_account".into();
        params["finality"] = "final".into();
        params["account_id"] = account_id.into();

        let response = self.query(params).await?;
        parse_view_account(account_id, &response)
    }

    /// Send a `query` request, returning the parsed response body
    async fn query(&self, params: JsonValue) -> Result<JsonValue, ScriptError> {
        let mut request = JsonValue::new_object();
        request["jsonrpc"] = "2.0".into();
        request["id"] = "croncat-scripts".into();
        request["method"] = "query".into();
        request["params"] = params;

        debug!("RPC request to {}: {}", self.url, request.dump());
        let body = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(request.dump())
            .send()
            .await
            .map_err(|e| ScriptError::Rpc(e.to_string()))?
            .text()
            .await
            .map_err(|e| ScriptError::Rpc(e.to_string()))?;

        json::parse(&body).map_err(|e| ScriptError::Rpc(format!("invalid response: {}", e)))
    }
}

/// Interpret a `view_account` response
fn parse_view_account(account_id: &str, response: &JsonValue) -> Result<AccountState, ScriptError> {
    let result = &response["result"];
    if result.is_object() {
        let amount = result["amount"].as_str().unwrap_or_default().to_string();
        return Ok(AccountState::Exists { amount });
    }

    let error = &response["error"];
    if error.is_null() {
        return Err(ScriptError::Rpc(format!(
            "response for {} has neither result nor error",
            account_id
        )));
    }

    // Older nodes only describe the failure in a free-form string
    let legacy_missing = error["data"]
        .as_str()
        .is_some_and(|data| data.contains("does not exist"));
    if error["cause"]["name"] == UNKNOWN_ACCOUNT_CAUSE || legacy_missing {
        return Ok(AccountState::Missing);
    }

    Err(ScriptError::Rpc(format!(
        "viewing {}: {}",
        account_id,
        error.dump()
    )))
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    #[test]
    fn parses_existing_account() {
        let response = json::parse(
            r#"{"jsonrpc":"2.0","id":"x","result":{"amount":"100000000000000000000000000","locked":"0","block_height":1}}"#,
        )
        .unwrap();

        assert_eq!(
            parse_view_account("a.testnet", &response).unwrap(),
            AccountState::Exists {
                amount: "100000000000000000000000000".to_string()
            }
        );
    }

    #[test]
    fn parses_unknown_account() {
        let response = json::parse(
            r#"{"jsonrpc":"2.0","id":"x","error":{"name":"HANDLER_ERROR","cause":{"name":"UNKNOWN_ACCOUNT","info":{}},"code":-32000}}"#,
        )
        .unwrap();
        assert_eq!(
            parse_view_account("a.testnet", &response).unwrap(),
            AccountState::Missing
        );

        let legacy = json::parse(
            r#"{"jsonrpc":"2.0","id":"x","error":{"code":-32000,"message":"Server error","data":"account a.testnet does not exist while viewing"}}"#,
        )
        .unwrap();
        assert_eq!(
            parse_view_account("a.testnet", &legacy).unwrap(),
            AccountState::Missing
        );
    }

    #[test]
    fn other_errors_are_reported() {
        let response = json::parse(
            r#"{"jsonrpc":"2.0","id":"x","error":{"name":"HANDLER_ERROR","cause":{"name":"NO_SYNCED_BLOCKS"}}}"#,
        )
        .unwrap();
        assert!(matches!(
            parse_view_account("a.testnet", &response),
            Err(ScriptError::Rpc(_))
        ));
    }

    #[tokio::test]
    async fn view_account_over_http() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/")
                    .body_includes("view_account")
                    .body_includes("cron.croncat.testnet");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"jsonrpc":"2.0","id":"x","result":{"amount":"5"}}"#);
            })
            .await;

        let client = NearRpcClient::new(&server.url("/"));
        let state = client.view_account("cron.croncat.testnet").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            state,
            AccountState::Exists {
                amount: "5".to_string()
            }
        );
    }

    #[tokio::test]
    async fn unparseable_body_is_an_rpc_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(502).body("bad gateway");
            })
            .await;

        let client = NearRpcClient::new(&server.url("/"));
        assert!(matches!(
            client.view_account("cron.croncat.testnet").await,
            Err(ScriptError::Rpc(_))
        ));
    }
}
