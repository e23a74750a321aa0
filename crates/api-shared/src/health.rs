use crate::dto::HealthRes;

/// Health check shared by every SIDIA entry point.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Reports the service as alive, naming the configured AI provider.
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health(provider: &str) -> HealthRes {
        HealthRes {
            ok: true,
            message: format!("SIDIA is alive (provider: {provider})"),
        }
    }
}
