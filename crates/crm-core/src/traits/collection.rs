//! Remote collection trait.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;
use crate::filter::QueryParams;
use crate::record::{PageResult, Record};
use crate::types::{RecordId, RecordType};

/// The remote REST collection of one record type.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Record type served by this collection.
    fn record_type(&self) -> RecordType;

    /// Fetch one page of records for the given query parameters.
    async fn list(&self, params: &QueryParams) -> Result<PageResult>;

    /// Fetch a single record.
    async fn get(&self, id: RecordId) -> Result<Record>;

    /// Create a record from a JSON object.
    async fn create(&self, data: &Value) -> Result<Record>;

    /// Replace fields of an existing record.
    async fn update(&self, id: RecordId, data: &Value) -> Result<Record>;

    /// Delete a record.
    async fn delete(&self, id: RecordId) -> Result<()>;
}

#[async_trait]
impl<C> Collection for Arc<C>
where
    C: Collection + ?Sized,
{
    fn record_type(&self) -> RecordType {
        (**self).record_type()
    }

    async fn list(&self, params: &QueryParams) -> Result<PageResult> {
        (**self).list(params).await
    }

    async fn get(&self, id: RecordId) -> Result<Record> {
        (**self).get(id).await
    }

    async fn create(&self, data: &Value) -> Result<Record> {
        (**self).create(data).await
    }

    async fn update(&self, id: RecordId, data: &Value) -> Result<Record> {
        (**self).update(id, data).await
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        (**self).delete(id).await
    }
}
