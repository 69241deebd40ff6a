use eyre::Result;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::arb::driver::TradePlan;
use crate::arb::route::Route;

/// Slack notifier
#[derive(Debug)]
pub struct SlackNotifier {
    /// The Slack OAuth token
    token: String,
    /// The HTTP client
    client: Client,
}

impl SlackNotifier {
    /// Create a new Slack notifier
    ///
    /// # Errors
    /// * If `SLACK_OAUTH_TOKEN` is not set
    /// * If the HTTP client cannot be built
    pub fn new() -> Result<Self> {
        let token = std::env::var("SLACK_OAUTH_TOKEN")
            .map_err(|_| eyre::eyre!("SLACK_OAUTH_TOKEN not set"))?;

        // Create a client with a timeout
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self { token, client })
    }

    /// Post a found opportunity to the default channel
    ///
    /// # Errors
    /// * If the Slack API call fails
    pub async fn send_plan(&self, plan: &TradePlan, route: &Route) -> Result<()> {
        self.send_to(&plan_message(plan, route), "#gyre").await
    }

    /// Send an error message to the error channel
    ///
    /// # Errors
    /// * If the Slack API call fails
    pub async fn send_error(&self, error: &str) -> Result<()> {
        self.send_to(&format!(":warning: Error: {error}"), "#gyre-errors")
            .await
    }

    /// Send a message to a specific channel
    async fn send_to(&self, msg: &str, channel: &str) -> Result<()> {
        let payload = json!({
            "channel": channel,
            "text": msg,
            "username": "Gyre Bot",
            "icon_emoji": ":cyclone:"
        });

        let response = self
            .client
            .post("https://slack.com/api/chat.postMessage")
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        // Check if Slack API returned success
        if !response["ok"].as_bool().unwrap_or(false) {
            return Err(eyre::eyre!(
                "Slack API error: {}",
                response["error"].as_str().unwrap_or("unknown error")
            ));
        }

        Ok(())
    }
}

/// One-line summary of a plan for the channel
fn plan_message(plan: &TradePlan, route: &Route) -> String {
    format!(
        ":cyclone: borrow {} {} → {} hops → repay {} (quoted return {})",
        plan.borrow_amount,
        plan.borrow_token,
        plan.router_path.len(),
        plan.expected_return,
        route.quote_output_amount,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;
    use crate::arb::decimal::Dec;

    #[test]
    fn test_plan_message() {
        let plan = TradePlan {
            borrow_token: "tokenA".to_string(),
            borrow_amount: U256::from(508u64),
            router_path: vec!["P1".into(), "P2".into(), "P3".into()],
            expected_return: U256::from(509u64),
        };
        let route = Route {
            input_token: "tokenA".to_string(),
            output_token: "tokenA".to_string(),
            path: plan.router_path.clone(),
            input_amount: plan.borrow_amount,
            quote_output_amount: U256::from(513u64),
            quote_lp_fee: Dec::from(0),
            quote_dao_fee: Dec::from(0),
            price_impact: Dec::from(0),
            gas_multiplier: Dec::from(0),
        };
        let message = plan_message(&plan, &route);
        assert!(message.contains("borrow 508 tokenA"));
        assert!(message.contains("3 hops"));
        assert!(message.contains("513"));
    }
}
