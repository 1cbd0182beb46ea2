// Beta API collection endpoints.
//
// Without an ID a collection is created (POST); with one it is replaced
// (PUT). Either way the new contents fully replace the old.

use serde::Serialize;

use super::require;
use crate::client::{Client, segment};
use crate::error::Error;

#[derive(Serialize)]
struct CollectionBody<'a, D: Serialize + ?Sized> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a D>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

impl Client {
    /// Create or replace a collection from inline rows.
    ///
    /// `POST {beta}/v1/api/collections` or `PUT {beta}/v1/api/collections/{id}`
    pub async fn update_collection<D>(
        &self,
        collection_id: Option<&str>,
        collection_name: &str,
        items: &D,
    ) -> Result<(), Error>
    where
        D: Serialize + ?Sized + Sync,
    {
        require(collection_name, "collectionName")?;
        let body = CollectionBody {
            name: collection_name,
            data: Some(items),
            url: None,
        };
        self.write_collection(collection_id, &body).await
    }

    /// Create or replace a collection from a JSON document (or a shared
    /// Google Sheet) at `json_url`.
    pub async fn update_collection_via_url(
        &self,
        collection_id: Option<&str>,
        collection_name: &str,
        json_url: &str,
    ) -> Result<(), Error> {
        require(collection_name, "collectionName")?;
        let body: CollectionBody<'_, ()> = CollectionBody {
            name: collection_name,
            data: None,
            url: Some(json_url),
        };
        self.write_collection(collection_id, &body).await
    }

    async fn write_collection<B: Serialize + Sync>(
        &self,
        collection_id: Option<&str>,
        body: &B,
    ) -> Result<(), Error> {
        match collection_id.filter(|id| !id.is_empty()) {
            None => {
                let url = self.beta_url("v1/api/collections");
                self.post(&url, body).await?;
            }
            Some(id) => {
                let url = self.beta_url(&format!("v1/api/collections/{}", segment(id)));
                self.put(&url, body).await?;
            }
        }
        Ok(())
    }
}
