use crate::{ADMIN_ROLE, PROVIDER_ROLE};
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::provider::Provider;
use crate::domain::types::{ProviderId, VerificationStatus};
use crate::forms::providers::RegisterProviderFormPayload;
use crate::repository::errors::RepositoryError;
use crate::repository::{BookingReader, BookingStatusCounts, ProviderReader, ProviderWriter};

use super::{ServiceError, ServiceResult};

/// Resolves the provider profile behind the signed-in user, or refuses.
pub(crate) fn provider_for_user<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Provider>
where
    R: ProviderReader,
{
    if !check_role(PROVIDER_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let user_id = match user.user_id() {
        Ok(user_id) => user_id,
        Err(e) => {
            log::error!("Invalid user id in claims: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match repo.get_provider_by_user_id(user_id) {
        Ok(Some(provider)) => Ok(provider),
        Ok(None) => Err(ServiceError::Unauthorized),
        Err(e) => {
            log::error!("Failed to look up provider for user {user_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Creates the provider profile linked to the signed-in user.
pub fn register_provider<R>(
    payload: RegisterProviderFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ProviderWriter,
{
    let user_id = match user.user_id() {
        Ok(user_id) => user_id,
        Err(e) => {
            log::error!("Invalid user id in claims: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let provider = payload.into_new_provider(user_id);
    match repo.create_provider(&provider) {
        Ok(_) => Ok(true),
        Err(RepositoryError::Duplicate(_)) => Err(ServiceError::Form(
            "A provider profile already exists for this account.".to_string(),
        )),
        Err(e) => {
            log::error!("Failed to create provider: {e}");
            Ok(false)
        }
    }
}

/// Lists publicly visible (verified) providers.
pub fn show_providers<R>(repo: &R) -> ServiceResult<Vec<Provider>>
where
    R: ProviderReader,
{
    match repo.list_providers(true) {
        Ok(providers) => Ok(providers),
        Err(e) => {
            log::error!("Failed to list providers: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Admin action: set a provider's verification state.
pub fn set_provider_verification<R>(
    provider_id: ProviderId,
    status: VerificationStatus,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: ProviderWriter,
{
    if !check_role(ADMIN_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.set_verification_status(provider_id, status) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to update verification for provider {provider_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Data backing the provider dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub provider: Provider,
    pub counts: BookingStatusCounts,
}

/// Loads the signed-in provider's profile and booking tallies.
pub fn show_dashboard<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<DashboardData>
where
    R: ProviderReader + BookingReader,
{
    let provider = provider_for_user(user, repo)?;

    let counts = match repo.booking_status_counts(provider.id) {
        Ok(counts) => counts,
        Err(e) => {
            log::error!("Failed to tally bookings for provider {}: {e}", provider.id);
            return Err(ServiceError::Internal);
        }
    };

    Ok(DashboardData { provider, counts })
}
