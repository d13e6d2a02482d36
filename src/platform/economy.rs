use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DataList, PlatformClient};
use crate::error::FetchError;
use crate::summary::Metric;

/// Trailing window that revenue stats are summed over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevenueWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl RevenueWindow {
    pub const DAYS: i64 = 30;

    pub fn trailing(end: DateTime<Utc>) -> Self {
        Self {
            start: end - Duration::days(Self::DAYS),
            end,
        }
    }

    fn query(&self) -> [(&'static str, String); 3] {
        [
            ("granularity", "Daily".to_string()),
            ("startTime", self.start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("endTime", self.end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ]
    }
}

#[derive(Deserialize)]
struct RevenuePoint {
    value: Option<f64>,
}

#[derive(Deserialize)]
struct CurrencyBalance {
    #[serde(default)]
    robux: f64,
}

#[derive(Deserialize)]
struct RawTransaction {
    created: Option<String>,
    agent: Option<Named>,
    details: Option<Named>,
    currency: Option<Amount>,
}

#[derive(Deserialize)]
struct Named {
    name: Option<String>,
}

#[derive(Deserialize)]
struct Amount {
    amount: Option<f64>,
}

/// A recent sale, for display only.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sale {
    pub created: Option<String>,
    pub item: String,
    pub buyer: String,
    pub amount: u64,
}

fn whole_robux(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// Sum one game's daily revenue over `window`. A 403 maps to
/// [`Metric::NoPermission`], any other failure to [`Metric::Unavailable`].
pub async fn fetch_revenue(
    client: &PlatformClient,
    universe_id: u64,
    auth: &str,
    window: &RevenueWindow,
) -> Metric {
    let url = client.develop_url(&format!("/v1/places/{universe_id}/stats/Revenue"));

    match client
        .fetch::<DataList<Value>>(&url, &window.query(), Some(auth))
        .await
    {
        Ok(series) => {
            let total: f64 = series
                .entries::<RevenuePoint>(&url)
                .iter()
                .filter_map(|p| p.value)
                .sum();
            Metric::Robux(whole_robux(total))
        }
        Err(e) if e.is_permission_denied() => {
            tracing::warn!(universe_id, url = e.url(), "no permission to read revenue");
            Metric::NoPermission
        }
        Err(e) => {
            tracing::warn!(universe_id, url = e.url(), "failed to fetch revenue: {e}");
            Metric::Unavailable
        }
    }
}

/// The group's current Robux balance.
pub async fn fetch_group_funds(
    client: &PlatformClient,
    group_id: u64,
    auth: &str,
) -> Result<u64, FetchError> {
    let url = client.economy_url(&format!("/v1/groups/{group_id}/currency"));
    let balance: CurrencyBalance = client.fetch(&url, &[], Some(auth)).await?;
    Ok(whole_robux(balance.robux))
}

/// The group's ten most recent sales.
pub async fn fetch_recent_sales(
    client: &PlatformClient,
    group_id: u64,
    auth: &str,
) -> Result<Vec<Sale>, FetchError> {
    let url = client.economy_url(&format!("/v1/groups/{group_id}/transactions"));
    let query = [("limit", "10".to_string()), ("transactionType", "Sale".to_string())];
    let list: DataList<Value> = client.fetch(&url, &query, Some(auth)).await?;

    Ok(list
        .entries::<RawTransaction>(&url)
        .into_iter()
        .map(|t| Sale {
            created: t.created,
            item: t.details.and_then(|d| d.name).unwrap_or_default(),
            buyer: t.agent.and_then(|a| a.name).unwrap_or_default(),
            amount: whole_robux(t.currency.and_then(|c| c.amount).unwrap_or(0.0)),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::client_for;
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn window() -> RevenueWindow {
        RevenueWindow::trailing(Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).unwrap())
    }

    #[test]
    fn trailing_window_is_thirty_days() {
        let w = window();
        assert_eq!(w.end - w.start, Duration::days(30));
        let query = w.query();
        assert_eq!(query[1].1, "2026-03-01T12:00:00Z");
        assert_eq!(query[2].1, "2026-03-31T12:00:00Z");
    }

    #[tokio::test]
    async fn revenue_sums_daily_series() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/places/10/stats/Revenue"))
            .and(query_param("granularity", "Daily"))
            .and(query_param("startTime", "2026-03-01T12:00:00Z"))
            .and(query_param("endTime", "2026-03-31T12:00:00Z"))
            .and(header("cookie", ".ROBLOSECURITY=tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"value": 100}, {"value": 250.4}, {"value": null}, {"value": 0}]
            })))
            .expect(1)
            .mount(&mock)
            .await;

        let metric = fetch_revenue(&client_for(&mock.uri()), 10, "tok", &window()).await;
        assert_eq!(metric, Metric::Robux(350));
    }

    #[tokio::test]
    async fn malformed_revenue_points_are_skipped() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"value": 40}, {"value": "lots"}, {"value": 2}]
            })))
            .mount(&mock)
            .await;

        let metric = fetch_revenue(&client_for(&mock.uri()), 10, "tok", &window()).await;
        assert_eq!(metric, Metric::Robux(42));
    }

    #[tokio::test]
    async fn empty_series_is_zero() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&mock)
            .await;

        let metric = fetch_revenue(&client_for(&mock.uri()), 10, "tok", &window()).await;
        assert_eq!(metric, Metric::Robux(0));
    }

    #[tokio::test]
    async fn forbidden_revenue_is_no_permission() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock)
            .await;

        let metric = fetch_revenue(&client_for(&mock.uri()), 10, "tok", &window()).await;
        assert_eq!(metric, Metric::NoPermission);
    }

    #[tokio::test]
    async fn failed_revenue_is_unavailable() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock)
            .await;

        let metric = fetch_revenue(&client_for(&mock.uri()), 10, "tok", &window()).await;
        assert_eq!(metric, Metric::Unavailable);
    }

    #[tokio::test]
    async fn group_funds_reads_robux() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/groups/5/currency"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"robux": 48210})))
            .mount(&mock)
            .await;

        let funds = fetch_group_funds(&client_for(&mock.uri()), 5, "tok").await.unwrap();
        assert_eq!(funds, 48210);
    }

    #[tokio::test]
    async fn recent_sales_tolerate_missing_fields() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/groups/5/transactions"))
            .and(query_param("limit", "10"))
            .and(query_param("transactionType", "Sale"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {
                        "created": "2026-03-30T10:00:00Z",
                        "agent": {"id": 1, "name": "buyer1"},
                        "details": {"id": 2, "name": "VIP Pass"},
                        "currency": {"amount": 70, "type": "Robux"}
                    },
                    {}
                ]
            })))
            .mount(&mock)
            .await;

        let sales = fetch_recent_sales(&client_for(&mock.uri()), 5, "tok").await.unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].item, "VIP Pass");
        assert_eq!(sales[0].buyer, "buyer1");
        assert_eq!(sales[0].amount, 70);
        assert_eq!(sales[1].amount, 0);
        assert!(sales[1].created.is_none());
    }
}
