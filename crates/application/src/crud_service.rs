//! Generic CRUD dispatcher shared by every registered module.
//!
//! Each call resolves the module, checks the derived permission code, then
//! delegates to the record store. Failures are folded into an
//! [`ActionEnvelope`] at this boundary.

use std::sync::Arc;

use hoso_core::{AppError, AppResult, AuthContext};
use hoso_domain::{
    GenericRecord, ModuleDescriptor, ModuleRegistry, PermissionAction, PermissionCode, RecordKey,
    value_text,
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    AuthorizationService, CacheInvalidator, InvalidationTarget, QueryDescriptor, RawListQuery,
    RecordStore,
};

mod envelope;

pub use envelope::{
    ActionEnvelope, CrudPayload, DispatchResponse, FailureKind, ListResult, failure_message,
};

/// Operations the dispatcher performs on a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudAction {
    /// Paginated listing.
    List,
    /// Single record lookup.
    Get,
    /// Record creation.
    Create,
    /// Partial record update.
    Update,
    /// Record deletion.
    Delete,
}

impl CrudAction {
    /// Returns the permission action guarding this operation.
    #[must_use]
    pub fn permission_action(self) -> PermissionAction {
        match self {
            Self::List | Self::Get => PermissionAction::View,
            Self::Create => PermissionAction::Add,
            Self::Update => PermissionAction::Edit,
            Self::Delete => PermissionAction::Delete,
        }
    }

    /// Returns the lowercase action name used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// One dispatcher call with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum CrudRequest {
    /// List records from raw query-string parameters.
    List(RawListQuery),
    /// Fetch one record.
    Get {
        /// Primary-key text.
        key: String,
    },
    /// Create a record from a JSON object.
    Create {
        /// Field values.
        data: Value,
    },
    /// Update the supplied fields of a record.
    Update {
        /// Primary-key text.
        key: String,
        /// Fields to overwrite.
        data: Value,
    },
    /// Delete a record.
    Delete {
        /// Primary-key text.
        key: String,
    },
}

impl CrudRequest {
    /// Returns the operation kind.
    #[must_use]
    pub fn action(&self) -> CrudAction {
        match self {
            Self::List(_) => CrudAction::List,
            Self::Get { .. } => CrudAction::Get,
            Self::Create { .. } => CrudAction::Create,
            Self::Update { .. } => CrudAction::Update,
            Self::Delete { .. } => CrudAction::Delete,
        }
    }
}

/// Stateless dispatcher over the module registry and record store.
#[derive(Clone)]
pub struct CrudService {
    registry: Arc<ModuleRegistry>,
    authorization_service: AuthorizationService,
    store: Arc<dyn RecordStore>,
    invalidator: Arc<dyn CacheInvalidator>,
}

impl CrudService {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(
        registry: Arc<ModuleRegistry>,
        authorization_service: AuthorizationService,
        store: Arc<dyn RecordStore>,
        invalidator: Arc<dyn CacheInvalidator>,
    ) -> Self {
        Self {
            registry,
            authorization_service,
            store,
            invalidator,
        }
    }

    /// Returns the module registry.
    #[must_use]
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Returns the permission oracle.
    #[must_use]
    pub fn authorization_service(&self) -> &AuthorizationService {
        &self.authorization_service
    }

    /// Runs one request and wraps the outcome in an envelope.
    pub async fn dispatch(
        &self,
        context: &AuthContext,
        slug: &str,
        request: CrudRequest,
    ) -> DispatchResponse {
        let action = request.action();
        let result = match request {
            CrudRequest::List(raw) => self
                .list_records(context, slug, raw)
                .await
                .map(|list| Some(CrudPayload::List(list))),
            CrudRequest::Get { key } => self
                .get_record(context, slug, &key)
                .await
                .map(|record| Some(CrudPayload::Record(record))),
            CrudRequest::Create { data } => self
                .create_record(context, slug, data)
                .await
                .map(|record| Some(CrudPayload::Record(record))),
            CrudRequest::Update { key, data } => self
                .update_record(context, slug, &key, data)
                .await
                .map(|record| Some(CrudPayload::Record(record))),
            CrudRequest::Delete { key } => self
                .delete_record(context, slug, &key)
                .await
                .map(|()| None),
        };

        match result {
            Ok(data) => DispatchResponse::success(action, data),
            Err(error) => {
                log_failure(context, slug, action, &error);
                DispatchResponse::failure(&error)
            }
        }
    }

    /// Lists one page of a module's records.
    pub async fn list_records(
        &self,
        context: &AuthContext,
        slug: &str,
        raw: RawListQuery,
    ) -> AppResult<ListResult> {
        let module = self.authorize(context, slug, CrudAction::List)?;
        let query = raw.into_descriptor(module.default_page_size());
        self.list_with_query(module, &query).await
    }

    /// Lists one page using an already assembled query.
    pub async fn list_records_with_query(
        &self,
        context: &AuthContext,
        slug: &str,
        query: &QueryDescriptor,
    ) -> AppResult<ListResult> {
        let module = self.authorize(context, slug, CrudAction::List)?;
        self.list_with_query(module, query).await
    }

    /// Fetches one record by primary key.
    pub async fn get_record(
        &self,
        context: &AuthContext,
        slug: &str,
        key: &str,
    ) -> AppResult<GenericRecord> {
        let module = self.authorize(context, slug, CrudAction::Get)?;
        let key = RecordKey::new(key)?;
        self.store
            .find(module, &key)
            .await?
            .ok_or_else(|| not_found(module, &key))
    }

    /// Creates a record and returns it as persisted.
    pub async fn create_record(
        &self,
        context: &AuthContext,
        slug: &str,
        data: Value,
    ) -> AppResult<GenericRecord> {
        let module = self.authorize(context, slug, CrudAction::Create)?;
        let data = GenericRecord::from_value(data)?;
        let created = self.store.create(module, data).await?;

        info!(
            subject = context.subject_label(),
            module = module.slug(),
            key = %created.text(module.primary_key_field()).unwrap_or_default(),
            "record created"
        );
        self.invalidator
            .invalidate(InvalidationTarget::list_view(module));

        Ok(created)
    }

    /// Overwrites the supplied fields of a record and returns the full record.
    pub async fn update_record(
        &self,
        context: &AuthContext,
        slug: &str,
        key: &str,
        data: Value,
    ) -> AppResult<GenericRecord> {
        let module = self.authorize(context, slug, CrudAction::Update)?;
        let key = RecordKey::new(key)?;
        let partial = GenericRecord::from_value(data)?;

        if let Some(value) = partial.get(module.primary_key_field())
            && value_text(value).as_deref() != Some(key.as_str())
        {
            return Err(AppError::Validation(format!(
                "primary key '{}' cannot be changed",
                module.primary_key_field()
            )));
        }

        let updated = if partial.is_empty() {
            self.store
                .find(module, &key)
                .await?
                .ok_or_else(|| not_found(module, &key))?
        } else {
            self.store.update(module, &key, partial).await?
        };

        info!(
            subject = context.subject_label(),
            module = module.slug(),
            key = %key,
            "record updated"
        );
        self.invalidate_record(module, &key);

        Ok(updated)
    }

    /// Deletes a record.
    pub async fn delete_record(
        &self,
        context: &AuthContext,
        slug: &str,
        key: &str,
    ) -> AppResult<()> {
        let module = self.authorize(context, slug, CrudAction::Delete)?;
        let key = RecordKey::new(key)?;
        self.store.delete(module, &key).await?;

        info!(
            subject = context.subject_label(),
            module = module.slug(),
            key = %key,
            "record deleted"
        );
        self.invalidate_record(module, &key);

        Ok(())
    }

    fn authorize(
        &self,
        context: &AuthContext,
        slug: &str,
        action: CrudAction,
    ) -> AppResult<&'static ModuleDescriptor> {
        let module = self.registry.resolve(slug)?;
        let code = PermissionCode::for_module(action.permission_action(), module);
        self.authorization_service
            .require_permission(context, &code)?;
        Ok(module)
    }

    async fn list_with_query(
        &self,
        module: &'static ModuleDescriptor,
        query: &QueryDescriptor,
    ) -> AppResult<ListResult> {
        let page = self.store.list(module, query).await?;
        Ok(ListResult {
            data: page.items,
            total: page.total,
            page: query.page(),
            page_size: query.page_size(),
            model_name: module.record_type_name().to_owned(),
        })
    }

    fn invalidate_record(&self, module: &ModuleDescriptor, key: &RecordKey) {
        self.invalidator
            .invalidate(InvalidationTarget::list_view(module));
        if module.has_detail_view() {
            self.invalidator
                .invalidate(InvalidationTarget::detail_view(module, key.as_str()));
        }
    }
}

fn not_found(module: &ModuleDescriptor, key: &RecordKey) -> AppError {
    AppError::NotFound(format!(
        "{} '{key}' does not exist",
        module.record_type_name()
    ))
}

fn log_failure(context: &AuthContext, slug: &str, action: CrudAction, failure: &AppError) {
    match failure {
        AppError::Transient(_) | AppError::Internal(_) => error!(
            subject = context.subject_label(),
            module = slug,
            action = action.as_str(),
            error = %failure,
            "record operation failed"
        ),
        // Permission denials are already logged by the oracle.
        AppError::Unauthorized { .. } => {}
        _ => warn!(
            subject = context.subject_label(),
            module = slug,
            action = action.as_str(),
            error = %failure,
            "record operation rejected"
        ),
    }
}
