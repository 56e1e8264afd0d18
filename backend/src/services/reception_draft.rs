//! Reception draft service
//!
//! Keeps one in-progress reception per operator. Every change goes through
//! [`ReceptionData::apply`], so derived figures and validation flags are
//! always consistent with the raw measurements.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::Serialize;
use shared::{
    validate_license_plate, validation_errors, DiscountTemplate, Reception, ReceptionData,
    ReceptionReceipt, ReceptionTotals, ReceptionUpdate, ValidationIssue,
};
use tokio::sync::RwLock;
use tokio::task::AbortHandle;

use crate::error::{AppError, AppResult};
use crate::external::{PaddyApiClient, RemoteError};

/// A draft together with its display-ready summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub draft: ReceptionData,
    pub totals: ReceptionTotals,
    pub has_validation_errors: bool,
    pub validation_errors: Vec<ValidationIssue>,
}

impl DraftView {
    pub fn of(draft: &ReceptionData) -> Self {
        Self {
            totals: ReceptionTotals::from_clusters(&draft.clusters),
            has_validation_errors: draft.has_validation_errors(),
            validation_errors: validation_errors(&draft.clusters),
            draft: draft.clone(),
        }
    }
}

/// Printable receipt in structured and plain-text form
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptView {
    pub receipt: ReceptionReceipt,
    pub text: String,
}

/// A template load still in flight
struct PendingLoad {
    generation: u64,
    handle: AbortHandle,
}

type PendingLoads = Mutex<HashMap<String, PendingLoad>>;

fn lock_pending(pending: &PendingLoads) -> MutexGuard<'_, HashMap<String, PendingLoad>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

fn is_current(pending: &PendingLoads, operator: &str, generation: u64) -> bool {
    lock_pending(pending).get(operator).map(|p| p.generation) == Some(generation)
}

/// Clears a load's pending entry once its caller stops waiting, aborting the
/// task if the caller went away first
struct PendingGuard<'a> {
    pending: &'a PendingLoads,
    operator: &'a str,
    generation: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut pending = lock_pending(self.pending);
        if pending.get(self.operator).map(|p| p.generation) == Some(self.generation) {
            if let Some(load) = pending.remove(self.operator) {
                load.handle.abort();
            }
        }
    }
}

/// Reception draft service
#[derive(Clone)]
pub struct ReceptionDraftService {
    api: PaddyApiClient,
    drafts: Arc<RwLock<HashMap<String, ReceptionData>>>,
    pending: Arc<PendingLoads>,
    generation: Arc<AtomicU64>,
}

impl ReceptionDraftService {
    pub fn new(api: PaddyApiClient) -> Self {
        Self {
            api,
            drafts: Arc::new(RwLock::new(HashMap::new())),
            pending: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current draft of an operator, opening a blank one if needed
    pub async fn current(&self, operator: &str) -> DraftView {
        let mut drafts = self.drafts.write().await;
        let draft = drafts
            .entry(operator.to_string())
            .or_insert_with(|| ReceptionData::new(DiscountTemplate::default()));
        DraftView::of(draft)
    }

    /// Apply one mutation to an operator's draft
    pub async fn apply(&self, operator: &str, update: ReceptionUpdate) -> AppResult<DraftView> {
        if let ReceptionUpdate::SetGeneral { patch } = &update {
            if let Some(plate) = patch.license_plate.as_deref().filter(|p| !p.trim().is_empty()) {
                validate_license_plate(plate).map_err(|_| AppError::Validation {
                    field: "licensePlate".to_string(),
                    message: "Patente inválida".to_string(),
                })?;
            }
        }

        let mut drafts = self.drafts.write().await;
        let draft = drafts
            .entry(operator.to_string())
            .or_insert_with(|| ReceptionData::new(DiscountTemplate::default()));
        draft.apply(update)?;
        Ok(DraftView::of(draft))
    }

    /// Fetch a template (the default one when `template_id` is `None`) with
    /// the discount table and switch the draft to it.
    ///
    /// A newer load for the same operator aborts this one, which then
    /// resolves to [`RemoteError::Cancelled`] without touching the draft.
    pub async fn load_template(
        &self,
        operator: &str,
        template_id: Option<i64>,
    ) -> AppResult<DraftView> {
        let api = self.api.clone();
        let drafts = self.drafts.clone();
        let pending = self.pending.clone();
        let key = operator.to_string();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);

        // Superseding and registering happen under one lock
        let task = {
            let mut loads = lock_pending(&self.pending);
            if let Some(previous) = loads.remove(operator) {
                tracing::debug!("Superseding pending template load for {}", operator);
                previous.handle.abort();
            }

            let task = tokio::spawn(async move {
                let template = match template_id {
                    Some(id) => api.templates().get_by_id(id).await?,
                    None => api.default_template().await?,
                };
                let ranges = api.discount_percents().list_all().await?;
                tracing::debug!(
                    "Loaded template '{}' with {} discount ranges for {}",
                    template.name,
                    ranges.len(),
                    key
                );

                let mut drafts = drafts.write().await;
                if !is_current(&pending, &key, generation) {
                    return Err(AppError::from(RemoteError::Cancelled));
                }
                let draft = drafts
                    .entry(key)
                    .or_insert_with(|| ReceptionData::new(DiscountTemplate::default()));
                draft.apply(ReceptionUpdate::SetTemplate { template, ranges })?;
                Ok::<_, AppError>(DraftView::of(draft))
            });
            loads.insert(
                operator.to_string(),
                PendingLoad {
                    generation,
                    handle: task.abort_handle(),
                },
            );
            task
        };

        let guard = PendingGuard {
            pending: &self.pending,
            operator,
            generation,
        };
        let outcome = task.await;
        drop(guard);

        match outcome {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(RemoteError::Cancelled.into()),
            Err(e) => Err(AppError::Internal(format!("Template load failed: {}", e))),
        }
    }

    /// Abort an in-flight template load; returns whether one was pending
    pub async fn cancel_template_load(&self, operator: &str) -> bool {
        let load = lock_pending(&self.pending).remove(operator);
        match load {
            Some(load) => {
                load.handle.abort();
                tracing::debug!("Cancelled template load for {}", operator);
                true
            }
            None => false,
        }
    }

    /// Drop an operator's draft, cancelling any pending template load
    pub async fn discard(&self, operator: &str) {
        self.cancel_template_load(operator).await;
        self.drafts.write().await.remove(operator);
    }

    /// Validate the draft, create the reception remotely and close the draft
    pub async fn save(&self, operator: &str) -> AppResult<Reception> {
        let payload = {
            let drafts = self.drafts.read().await;
            let draft = drafts
                .get(operator)
                .ok_or_else(|| AppError::NotFound("la recepción en curso".to_string()))?;
            draft.to_payload()?
        };

        let reception = self.api.receptions().create(&payload).await?;
        tracing::info!(
            "Reception {} saved for producer {} by {}",
            reception.id,
            reception.producer_id,
            operator
        );

        self.drafts.write().await.remove(operator);
        Ok(reception)
    }

    /// Receipt for the operator's draft, dated today
    pub async fn receipt(&self, operator: &str) -> AppResult<ReceiptView> {
        let drafts = self.drafts.read().await;
        let draft = drafts
            .get(operator)
            .ok_or_else(|| AppError::NotFound("la recepción en curso".to_string()))?;
        let receipt = ReceptionReceipt::build(draft, Utc::now().date_naive());
        Ok(ReceiptView {
            text: receipt.to_text(),
            receipt,
        })
    }
}
