use crate::client::PureStreamClient;
use crate::error::Result;
use purestream_core::Stats;
use reqwest::Method;

/// Site-wide counters.
pub struct StatsClient<'a> {
    client: &'a PureStreamClient,
}

impl<'a> StatsClient<'a> {
    pub(crate) fn new(client: &'a PureStreamClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> Result<Stats> {
        let request = self.client.request(Method::GET, "/stats").await;
        self.client.send(request).await
    }
}
