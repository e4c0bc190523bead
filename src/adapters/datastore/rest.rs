//! REST client implementation of the record reader and status writer ports.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::donation::{
    BloodBankUnit, BloodCollectionRecord, Donation, EligibilityRecord, MedicalHistoryRecord,
    ResolvedStatus, StatusHistoryEntry,
};
use crate::domain::foundation::{DomainError, DonationId, DonorId, ErrorCode};
use crate::ports::{DonationStatusWriter, DonorRecordReader};

use super::raw::{
    RawBloodBankUnit, RawBloodCollection, RawDonation, RawDonorRef, RawEligibilityRecord,
    RawMedicalHistory, RawStatusHistoryEntry,
};

/// Configuration for the hosted data store client.
#[derive(Debug, Clone)]
pub struct DatastoreConfig {
    /// Base URL of the data store API.
    pub base_url: String,
    /// Service key for authentication.
    service_key: Secret<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum retries for failed source fetches.
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries.
    pub retry_base_delay: Duration,
}

impl DatastoreConfig {
    /// Creates a new configuration with default timeouts and retries.
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            service_key: Secret::new(service_key.into()),
            timeout: Duration::from_secs(10),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(200),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count for fetches.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the backoff base delay.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Exposes the service key (for making requests).
    fn service_key(&self) -> &str {
        self.service_key.expose_secret()
    }
}

/// Standard list envelope returned by the data store.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: Vec<T>,
}

/// REST adapter over the hosted data store.
pub struct DatastoreRestAdapter {
    config: DatastoreConfig,
    client: Client,
}

impl DatastoreRestAdapter {
    /// Creates a new adapter with the given configuration.
    pub fn new(config: DatastoreConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the items endpoint URL for a collection.
    fn items_url(&self, collection: &str) -> String {
        format!(
            "{}/items/{}",
            self.config.base_url.trim_end_matches('/'),
            collection
        )
    }

    /// Fetches a collection with retries and exponential backoff.
    ///
    /// Only retryable failures (network errors, 5xx) are retried; client
    /// errors surface immediately.
    async fn fetch<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, DomainError> {
        let mut attempt: u32 = 0;
        loop {
            match self.try_fetch(collection, query).await {
                Ok(rows) => return Ok(rows),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.config.retry_base_delay * 2u32.saturating_pow(attempt);
                    warn!(collection, attempt, %err, "source fetch failed, retrying");
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_fetch<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, DomainError> {
        let response = self
            .client
            .get(self.items_url(collection))
            .bearer_auth(self.config.service_key())
            .query(query)
            .send()
            .await
            .map_err(|e| DomainError::source_unavailable(collection, e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(DomainError::source_unavailable(
                collection,
                format!("Data store returned {}", status),
            ));
        }
        if !status.is_success() {
            return Err(DomainError::new(
                ErrorCode::DatastoreError,
                format!("Data store returned {}", status),
            )
            .with_detail("collection", collection));
        }

        let envelope: DataEnvelope<T> = response.json().await.map_err(|e| {
            DomainError::new(ErrorCode::DatastoreError, format!("Malformed response: {}", e))
                .with_detail("collection", collection)
        })?;

        debug!(collection, rows = envelope.data.len(), "source fetch completed");
        Ok(envelope.data)
    }
}

/// Normalizes raw rows, skipping individually malformed records.
///
/// One bad row must not take down a whole source; it is logged and dropped.
fn normalize<R, D>(
    collection: &str,
    rows: Vec<R>,
    convert: impl Fn(R) -> Result<D, DomainError>,
) -> Vec<D> {
    rows.into_iter()
        .filter_map(|row| match convert(row) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(collection, %err, "skipping malformed record");
                None
            }
        })
        .collect()
}

#[async_trait]
impl DonorRecordReader for DatastoreRestAdapter {
    async fn donations(&self, donor_id: &DonorId) -> Result<Vec<Donation>, DomainError> {
        let rows: Vec<RawDonation> = self
            .fetch(
                "donations",
                &[
                    ("filter[donor_id][_eq]", donor_id.as_str()),
                    ("sort", "-last_updated"),
                ],
            )
            .await?;
        Ok(normalize("donations", rows, RawDonation::into_domain))
    }

    async fn status_history(
        &self,
        donation_id: &DonationId,
    ) -> Result<Vec<StatusHistoryEntry>, DomainError> {
        let id = donation_id.to_string();
        let rows: Vec<RawStatusHistoryEntry> = self
            .fetch(
                "donation_status_history",
                &[("filter[donation_id][_eq]", id.as_str()), ("sort", "-changed_at")],
            )
            .await?;
        Ok(normalize(
            "donation_status_history",
            rows,
            RawStatusHistoryEntry::into_domain,
        ))
    }

    async fn latest_eligibility(
        &self,
        donor_id: &DonorId,
    ) -> Result<Option<EligibilityRecord>, DomainError> {
        let rows: Vec<RawEligibilityRecord> = self
            .fetch(
                "eligibility",
                &[
                    ("filter[donor_id][_eq]", donor_id.as_str()),
                    ("sort", "-collection_start_time,-created_at"),
                    ("limit", "1"),
                ],
            )
            .await?;
        Ok(normalize("eligibility", rows, RawEligibilityRecord::into_domain).into_iter().next())
    }

    async fn latest_bank_unit(
        &self,
        donor_id: &DonorId,
    ) -> Result<Option<BloodBankUnit>, DomainError> {
        let rows: Vec<RawBloodBankUnit> = self
            .fetch(
                "blood_bank_units",
                &[
                    ("filter[donor_id][_eq]", donor_id.as_str()),
                    ("sort", "-created_at"),
                    ("limit", "1"),
                ],
            )
            .await?;
        Ok(normalize("blood_bank_units", rows, RawBloodBankUnit::into_domain)
            .into_iter()
            .next())
    }

    async fn latest_collection(
        &self,
        donor_id: &DonorId,
    ) -> Result<Option<BloodCollectionRecord>, DomainError> {
        let rows: Vec<RawBloodCollection> = self
            .fetch(
                "blood_collections",
                &[
                    ("filter[donor_id][_eq]", donor_id.as_str()),
                    ("sort", "-start_time"),
                    ("limit", "1"),
                ],
            )
            .await?;
        Ok(normalize("blood_collections", rows, RawBloodCollection::into_domain)
            .into_iter()
            .next())
    }

    async fn latest_medical_history(
        &self,
        donor_id: &DonorId,
    ) -> Result<Option<MedicalHistoryRecord>, DomainError> {
        let rows: Vec<RawMedicalHistory> = self
            .fetch(
                "medical_history",
                &[
                    ("filter[donor_id][_eq]", donor_id.as_str()),
                    ("sort", "-created_at"),
                    ("limit", "1"),
                ],
            )
            .await?;
        Ok(normalize("medical_history", rows, RawMedicalHistory::into_domain)
            .into_iter()
            .next())
    }

    async fn donor_ids(&self) -> Result<Vec<DonorId>, DomainError> {
        let rows: Vec<RawDonorRef> = self
            .fetch("donations", &[("fields", "donor_id"), ("limit", "-1")])
            .await?;

        let mut ids: Vec<DonorId> = Vec::new();
        for row in rows {
            match DonorId::new(row.donor_id) {
                Ok(id) if !ids.contains(&id) => ids.push(id),
                Ok(_) => {}
                Err(err) => warn!(%err, "skipping donation with blank donor id"),
            }
        }
        Ok(ids)
    }
}

#[async_trait]
impl DonationStatusWriter for DatastoreRestAdapter {
    async fn update_current_status(
        &self,
        donation_id: &DonationId,
        status: ResolvedStatus,
    ) -> Result<(), DomainError> {
        let url = format!("{}/{}", self.items_url("donations"), donation_id);
        let response = self
            .client
            .patch(url)
            .bearer_auth(self.config.service_key())
            .json(&json!({ "current_status": status.label() }))
            .send()
            .await
            .map_err(|e| DomainError::source_unavailable("donations", e.to_string()))?;

        let http_status = response.status();
        if http_status == reqwest::StatusCode::NOT_FOUND {
            return Err(DomainError::new(
                ErrorCode::DonationNotFound,
                format!("Donation not found: {}", donation_id),
            ));
        }
        if http_status.is_server_error() {
            return Err(DomainError::source_unavailable(
                "donations",
                format!("Data store returned {}", http_status),
            ));
        }
        if !http_status.is_success() {
            return Err(DomainError::new(
                ErrorCode::DatastoreError,
                format!("Data store returned {}", http_status),
            ));
        }

        debug!(%donation_id, status = %status, "cached status updated");
        Ok(())
    }
}
