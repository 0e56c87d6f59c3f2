//! Record repository backed by the REST API

use crate::{client::ApiClient, error::ClientError};
use async_trait::async_trait;
use erp_core::{Record, RecordId};
use erp_records::{Backend, RecordError, RecordResult, Repository};
use std::{fmt, marker::PhantomData, sync::Arc};
use tracing::debug;
use validator::Validate;

/// `Repository` over `/api/<resource>` endpoints
pub struct HttpRepository<R> {
    client: Arc<ApiClient>,
    marker: PhantomData<fn() -> R>,
}

impl<R: Record> HttpRepository<R> {
    /// Repository sharing `client` and its session
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            marker: PhantomData,
        }
    }

    /// Underlying client
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn collection() -> String {
        format!("/api/{}", R::RESOURCE)
    }

    fn member(id: RecordId) -> String {
        format!("/api/{}/{id}", R::RESOURCE)
    }

    fn error(id: Option<RecordId>, error: ClientError) -> RecordError {
        match id {
            Some(id) if error.is_not_found() => RecordError::NotFound {
                resource: R::RESOURCE,
                id,
            },
            _ => error.into(),
        }
    }
}

#[async_trait]
impl<R: Record> Repository<R> for HttpRepository<R> {
    async fn list(&self) -> RecordResult<Vec<R>> {
        let records: Vec<R> = self
            .client
            .get(&Self::collection())
            .await
            .map_err(|e| Self::error(None, e))?;
        debug!(resource = R::RESOURCE, count = records.len(), "records fetched");
        Ok(records)
    }

    async fn get(&self, id: RecordId) -> RecordResult<R> {
        self.client
            .get(&Self::member(id))
            .await
            .map_err(|e| Self::error(Some(id), e))
    }

    async fn create(&self, draft: R) -> RecordResult<R> {
        draft.validate()?;
        self.client
            .post(&Self::collection(), &draft)
            .await
            .map_err(|e| Self::error(None, e))
    }

    async fn update(&self, id: RecordId, patch: &R::Patch) -> RecordResult<R> {
        self.client
            .put(&Self::member(id), patch)
            .await
            .map_err(|e| Self::error(Some(id), e))
    }

    async fn replace(&self, record: R) -> RecordResult<R> {
        record.validate()?;
        let id = record.id();
        self.client
            .put(&Self::member(id), &record)
            .await
            .map_err(|e| Self::error(Some(id), e))
    }

    async fn delete(&self, id: RecordId) -> RecordResult<()> {
        self.client
            .delete(&Self::member(id))
            .await
            .map_err(|e| Self::error(Some(id), e))
    }

    fn backend(&self) -> Backend {
        Backend::Http
    }
}

impl<R> Clone for HttpRepository<R> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            marker: PhantomData,
        }
    }
}

impl<R: Record> fmt::Debug for HttpRepository<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRepository")
            .field("resource", &R::RESOURCE)
            .field("client", &self.client)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erp_core::types::{Invoice, Notice};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paths() {
        assert_eq!(HttpRepository::<Invoice>::collection(), "/api/invoices");
        assert_eq!(HttpRepository::<Notice>::member(7), "/api/notices/7");
    }

    #[test]
    fn test_not_found_maps_to_record_error() {
        let missing = ClientError::Status {
            status: 404,
            message: "no such invoice".to_string(),
        };
        let err = HttpRepository::<Invoice>::error(Some(9), missing);
        assert!(matches!(
            err,
            RecordError::NotFound {
                resource: "invoices",
                id: 9
            }
        ));

        let listing = ClientError::Status {
            status: 404,
            message: "no route".to_string(),
        };
        assert!(HttpRepository::<Invoice>::error(None, listing).is_backend());
    }
}
