// Track API account endpoints: region lookup and credential check.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Error;

/// Where the workspace behind the tracking credentials lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    /// Track API base URL for the account, e.g. `https://track.customer.io`.
    pub url: String,
    /// `us` or `eu`.
    pub data_center: String,
    pub environment_id: u64,
}

impl Client {
    /// Look up the data center for the configured tracking credentials.
    ///
    /// `GET {track}/api/v1/accounts/region`
    pub async fn find_region(&self) -> Result<RegionInfo, Error> {
        let url = self.tracking_url("api/v1/accounts/region");
        self.get(&url).await?.json()
    }

    /// Verify the tracking credentials. Succeeds only on HTTP 200.
    ///
    /// `GET {track}/auth`
    pub async fn test_auth(&self) -> Result<(), Error> {
        let url = self.tracking_url("auth");
        self.get(&url).await.map(|_| ())
    }
}
