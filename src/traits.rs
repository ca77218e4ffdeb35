use crate::error::DirectoryError;
use crate::types::LookupResponse;

/// The narrow slice of a directory service the evaluator depends on.
///
/// Implementations are called at most once per operation per swipe, and
/// never retried by the evaluator. Timeouts belong to the implementation.
pub trait DirectoryLookup {
    /// Find the records whose identifier attribute equals `identifier`.
    fn find_by_identifier(&self, identifier: &str) -> Result<LookupResponse, DirectoryError>;

    /// Set the stored credential version (LCC) of `account_name`.
    fn update_credential_version(
        &self,
        account_name: &str,
        new_version: &str,
    ) -> Result<(), DirectoryError>;
}

impl<D: DirectoryLookup + ?Sized> DirectoryLookup for &D {
    fn find_by_identifier(&self, identifier: &str) -> Result<LookupResponse, DirectoryError> {
        (**self).find_by_identifier(identifier)
    }

    fn update_credential_version(
        &self,
        account_name: &str,
        new_version: &str,
    ) -> Result<(), DirectoryError> {
        (**self).update_credential_version(account_name, new_version)
    }
}

impl<D: DirectoryLookup + ?Sized> DirectoryLookup for std::sync::Arc<D> {
    fn find_by_identifier(&self, identifier: &str) -> Result<LookupResponse, DirectoryError> {
        (**self).find_by_identifier(identifier)
    }

    fn update_credential_version(
        &self,
        account_name: &str,
        new_version: &str,
    ) -> Result<(), DirectoryError> {
        (**self).update_credential_version(account_name, new_version)
    }
}
