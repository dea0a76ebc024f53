use std::sync::Arc;

use hoso_core::AppResult;
use hoso_domain::{ModuleRegistry, PermissionAction, PermissionCode, PermissionGrant};
use tracing::info;

use crate::PermissionRepository;

/// Counts reported by a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Permission rows inserted or refreshed.
    pub grants_upserted: usize,
    /// Legacy codes rewritten to their canonical form.
    pub legacy_codes_rewritten: usize,
}

/// Seeds the permission catalogue derived from the module registry.
#[derive(Clone)]
pub struct PermissionSeedService {
    repository: Arc<dyn PermissionRepository>,
    registry: Arc<ModuleRegistry>,
    admin_role: String,
}

impl PermissionSeedService {
    /// Creates a seeding service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn PermissionRepository>,
        registry: Arc<ModuleRegistry>,
        admin_role: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            registry,
            admin_role: admin_role.into(),
        }
    }

    /// Rewrites legacy codes, then upserts every module grant and links them to the admin role.
    pub async fn run(&self) -> AppResult<SeedReport> {
        let legacy_codes_rewritten = self.migrate_legacy_codes().await?;
        let grants_upserted = self.seed_module_permissions().await?;

        Ok(SeedReport {
            grants_upserted,
            legacy_codes_rewritten,
        })
    }

    /// Upserts the four action grants of every registered module.
    pub async fn seed_module_permissions(&self) -> AppResult<usize> {
        let grants = self
            .registry
            .descriptors()
            .flat_map(|descriptor| {
                PermissionAction::ALL
                    .into_iter()
                    .map(move |action| PermissionGrant::for_module(action, descriptor))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let written = self.repository.upsert_grants(&grants).await?;
        let codes: Vec<String> = grants
            .iter()
            .map(|grant| grant.code().to_string())
            .collect();
        self.repository
            .grant_to_role(&self.admin_role, &codes)
            .await?;

        info!(grants = written, role = %self.admin_role, "permission grants seeded");
        Ok(written)
    }

    /// Rewrites every stored legacy-prefixed code to its canonical form.
    pub async fn migrate_legacy_codes(&self) -> AppResult<usize> {
        let mut rewritten = 0;
        for code in self.repository.list_codes().await? {
            if !PermissionCode::is_legacy(&code) {
                continue;
            }

            let canonical = PermissionCode::canonicalize(&code);
            self.repository.rename_code(&code, &canonical).await?;
            info!(from = %code, to = %canonical, "legacy permission code rewritten");
            rewritten += 1;
        }

        Ok(rewritten)
    }
}
