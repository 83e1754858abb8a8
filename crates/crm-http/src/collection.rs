//! REST-backed record collection.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crm_core::error::InvalidInputError;
use crm_core::{Collection, PageResult, QueryParams, Record, RecordId, RecordType, Result};

use crate::client::RestClient;

/// Options for converting a lead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadConversion {
    pub create_account: bool,
    pub create_opportunity: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opportunity_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opportunity_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
}

impl Default for LeadConversion {
    fn default() -> Self {
        Self {
            create_account: true,
            create_opportunity: true,
            account_name: None,
            opportunity_name: None,
            opportunity_amount: None,
            owner_id: None,
        }
    }
}

/// Records created by a lead conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    #[serde(default)]
    pub success: bool,
    pub account_id: Option<RecordId>,
    pub contact_id: Option<RecordId>,
    pub opportunity_id: Option<RecordId>,
}

#[derive(Serialize)]
struct MergeRequest<'a> {
    case_ids: &'a [RecordId],
    master_case_id: RecordId,
}

/// One record type's REST collection.
#[derive(Debug, Clone)]
pub struct HttpCollection {
    record_type: RecordType,
    client: RestClient,
}

impl HttpCollection {
    pub(crate) fn new(record_type: RecordType, client: RestClient) -> Self {
        Self {
            record_type,
            client,
        }
    }

    fn endpoint(&self) -> String {
        self.record_type.endpoint()
    }

    fn record_path(&self, id: RecordId) -> String {
        format!("{}/{}", self.endpoint(), id)
    }

    fn require(&self, expected: RecordType, action: &str) -> Result<()> {
        if self.record_type == expected {
            Ok(())
        } else {
            Err(InvalidInputError::Other {
                message: format!(
                    "{action} is only available for {}, not {}",
                    expected.plural(),
                    self.record_type.plural()
                ),
            }
            .into())
        }
    }

    /// Convert a lead into an account, contact and (optionally) opportunity.
    #[instrument(skip(self, options), fields(record_type = %self.record_type))]
    pub async fn convert_lead(
        &self,
        id: RecordId,
        options: &LeadConversion,
    ) -> Result<ConversionResult> {
        self.require(RecordType::Lead, "convert")?;
        debug!(%id, "converting lead");
        self.client
            .post(&format!("{}/convert", self.record_path(id)), options)
            .await
    }

    /// Mark a case as escalated.
    #[instrument(skip(self), fields(record_type = %self.record_type))]
    pub async fn escalate_case(&self, id: RecordId) -> Result<Record> {
        self.require(RecordType::Case, "escalate")?;
        debug!(%id, "escalating case");
        self.client
            .post_empty(&format!("{}/escalate", self.record_path(id)))
            .await
    }

    /// Merge `ids` into `master`; the other cases are closed.
    ///
    /// # Errors
    ///
    /// Fails before any request when fewer than two cases are given or
    /// `master` is not one of them.
    #[instrument(skip(self), fields(record_type = %self.record_type))]
    pub async fn merge_cases(&self, ids: &[RecordId], master: RecordId) -> Result<Record> {
        self.require(RecordType::Case, "merge")?;
        if ids.len() < 2 {
            return Err(InvalidInputError::Other {
                message: "need at least 2 cases to merge".to_string(),
            }
            .into());
        }
        if !ids.contains(&master) {
            return Err(InvalidInputError::Other {
                message: format!("master case {master} must be one of the merged cases"),
            }
            .into());
        }

        debug!(count = ids.len(), %master, "merging cases");
        let request = MergeRequest {
            case_ids: ids,
            master_case_id: master,
        };
        self.client
            .post(&format!("{}/merge", self.endpoint()), &request)
            .await
    }

    /// Reassign a record to another user.
    #[instrument(skip(self), fields(record_type = %self.record_type))]
    pub async fn change_owner(&self, id: RecordId, owner_id: i64) -> Result<Record> {
        let mut params = QueryParams::new();
        params.push("owner_id", owner_id.to_string());
        self.client
            .put_query(&format!("{}/change-owner", self.record_path(id)), &params)
            .await
    }
}

#[async_trait]
impl Collection for HttpCollection {
    fn record_type(&self) -> RecordType {
        self.record_type
    }

    #[instrument(skip(self, params), fields(record_type = %self.record_type))]
    async fn list(&self, params: &QueryParams) -> Result<PageResult> {
        self.client.get(&self.endpoint(), params).await
    }

    #[instrument(skip(self), fields(record_type = %self.record_type))]
    async fn get(&self, id: RecordId) -> Result<Record> {
        self.client
            .get(&self.record_path(id), &QueryParams::new())
            .await
    }

    #[instrument(skip(self, data), fields(record_type = %self.record_type))]
    async fn create(&self, data: &Value) -> Result<Record> {
        self.client.post(&self.endpoint(), data).await
    }

    #[instrument(skip(self, data), fields(record_type = %self.record_type))]
    async fn update(&self, id: RecordId, data: &Value) -> Result<Record> {
        self.client.put(&self.record_path(id), data).await
    }

    #[instrument(skip(self), fields(record_type = %self.record_type))]
    async fn delete(&self, id: RecordId) -> Result<()> {
        self.client.delete(&self.record_path(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CrmApi;
    use crm_core::ApiUrl;

    fn collection(record_type: RecordType) -> HttpCollection {
        CrmApi::new(ApiUrl::new("http://localhost:8000").unwrap())
            .unwrap()
            .collection(record_type)
    }

    #[test]
    fn record_paths() {
        let cases = collection(RecordType::Case);
        assert_eq!(cases.endpoint(), "/api/cases");
        assert_eq!(cases.record_path(RecordId::new(7)), "/api/cases/7");
    }

    #[test]
    fn default_conversion_creates_everything() {
        let body = serde_json::to_value(LeadConversion::default()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"create_account": true, "create_opportunity": true})
        );
    }

    #[tokio::test]
    async fn restricted_actions_reject_other_record_types() {
        let contacts = collection(RecordType::Contact);

        assert!(
            contacts
                .convert_lead(RecordId::new(1), &LeadConversion::default())
                .await
                .is_err()
        );
        assert!(contacts.escalate_case(RecordId::new(1)).await.is_err());
    }

    #[tokio::test]
    async fn merge_requires_master_among_cases() {
        let cases = collection(RecordType::Case);

        let err = cases
            .merge_cases(&[RecordId::new(1)], RecordId::new(1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("at least 2"));

        let err = cases
            .merge_cases(&[RecordId::new(1), RecordId::new(2)], RecordId::new(3))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("master case 3"));
    }
}
