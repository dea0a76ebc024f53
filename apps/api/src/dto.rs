mod auth;
mod common;
mod modules;

pub use auth::{AuthLoginRequest, UserIdentityResponse};
pub use common::{HealthDependencyStatus, HealthResponse};
pub use modules::ModuleResponse;

#[cfg(test)]
mod tests {
    use super::{
        AuthLoginRequest, HealthDependencyStatus, HealthResponse, ModuleResponse,
        UserIdentityResponse,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        AuthLoginRequest::export(&config)?;
        UserIdentityResponse::export(&config)?;
        ModuleResponse::export(&config)?;
        HealthDependencyStatus::export(&config)?;
        HealthResponse::export(&config)?;
        ErrorResponse::export(&config)?;

        Ok(())
    }
}
