use log::{debug, info};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use crate::backend::interface::{BackendError, LedgerStore, Result};
use crate::config::RemoteConfig;
use crate::core::{LedgerRecord, UserName};

/// Row shape of the hosted `ledgers` table: `username` is the primary
/// key, `data` a json column.
#[derive(Serialize)]
struct LedgerRow<'a> {
    username: &'a str,
    data: &'a LedgerRecord
}

#[derive(Deserialize)]
struct DataColumn {
    data: LedgerRecord
}

/// Ledger records kept in a hosted Postgres table, reached through its
/// REST gateway (`{url}/rest/v1/{table}`).
pub struct RemoteStore {
    http: Client,
    endpoint: String,
    key: String
}

impl RemoteStore {
    pub fn new(config: &RemoteConfig) -> Result<RemoteStore> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()?;
        let endpoint = format!("{}/rest/v1/{}", config.url.trim_end_matches('/'), config.table);

        Ok(RemoteStore { http, endpoint, key: config.key.clone() })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(BackendError::Status { status, body })
    }
}

impl LedgerStore for RemoteStore {
    fn describe(&self) -> String {
        format!("remote table at {}", self.endpoint)
    }

    fn load(&self, user: &UserName) -> Result<Option<LedgerRecord>> {
        let request = self.http.get(&self.endpoint)
            .query(&[("username", format!("eq.{}", user.as_str())), ("select", "data".to_owned())]);
        let response = Self::check(self.authorized(request).send()?)?;

        let body = response.text()?;
        let rows: Vec<DataColumn> = serde_json::from_str(&body)
            .map_err(|err| BackendError::UnexpectedResponse(format!("{}: {}", err, body)))?;

        debug!("remote returned {} row(s) for {}", rows.len(), user);
        Ok(rows.into_iter().next().map(|row| row.data))
    }

    fn save(&self, user: &UserName, record: &LedgerRecord) -> Result<()> {
        let rows = [LedgerRow { username: user.as_str(), data: record }];
        let request = self.http.post(&self.endpoint)
            .query(&[("on_conflict", "username")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&rows);
        Self::check(self.authorized(request).send()?)?;

        info!("upserted ledger of {} to remote table", user);
        Ok(())
    }
}
