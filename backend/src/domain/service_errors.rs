//! Translation of driven-port errors into domain errors.
//!
//! Connection failures become `service_unavailable`; anything else the
//! services cannot recover becomes `internal_error`.

use crate::domain::Error;
use crate::domain::ports::{
    CatalogueRepositoryError, DiscoveryRepositoryError, ProgressRepositoryError,
    UserRepositoryError,
};

pub(crate) fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalogue repository unavailable: {message}"))
        }
        CatalogueRepositoryError::Query { message } => {
            Error::internal(format!("catalogue repository error: {message}"))
        }
    }
}

pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateUsername { username } => {
            Error::conflict(format!("username {username} is already registered"))
        }
    }
}

/// Conflicts reaching this mapper were not recovered by the ledger.
pub(crate) fn map_discovery_error(error: DiscoveryRepositoryError) -> Error {
    match error {
        DiscoveryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("discovery repository unavailable: {message}"))
        }
        DiscoveryRepositoryError::Query { message }
        | DiscoveryRepositoryError::Conflict { message } => {
            Error::internal(format!("discovery repository error: {message}"))
        }
    }
}

pub(crate) fn map_progress_error(error: ProgressRepositoryError) -> Error {
    match error {
        ProgressRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("progress repository unavailable: {message}"))
        }
        ProgressRepositoryError::Query { message } => {
            Error::internal(format!("progress repository error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case(map_catalogue_error(CatalogueRepositoryError::connection("down")), ErrorCode::ServiceUnavailable)]
    #[case(map_catalogue_error(CatalogueRepositoryError::query("bad row")), ErrorCode::InternalError)]
    #[case(map_user_error(UserRepositoryError::duplicate_username("ada")), ErrorCode::Conflict)]
    #[case(map_discovery_error(DiscoveryRepositoryError::conflict("dup")), ErrorCode::InternalError)]
    #[case(map_progress_error(ProgressRepositoryError::connection("down")), ErrorCode::ServiceUnavailable)]
    fn maps_port_errors_to_codes(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }
}
