//! Validation utilities

use crate::traits::*;
use crate::types::*;

/// Validate that an account ID is valid
pub fn validate_account_id(account_id: &str) -> LedgerResult<()> {
    if account_id.trim().is_empty() {
        return Err(LedgerError::InvalidInput(
            "Account ID cannot be empty".to_string(),
        ));
    }

    if account_id.len() > 64 {
        return Err(LedgerError::Validation(
            "Account ID cannot exceed 64 characters".to_string(),
        ));
    }

    // UUIDs and ledger codes: alphanumerics, dashes, underscores
    if !account_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(LedgerError::Validation(format!(
            "Account ID '{}' can only contain alphanumeric characters, dashes, and underscores",
            account_id
        )));
    }

    Ok(())
}

/// Validate that an account name is valid
pub fn validate_account_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Account name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(LedgerError::Validation(
            "Account name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Stricter account validator for sources that enforce ledger codes
pub struct EnhancedAccountValidator;

impl AccountValidator for EnhancedAccountValidator {
    fn validate_account(&self, account: &Account) -> LedgerResult<()> {
        validate_account_id(&account.id)?;
        validate_account_name(&account.name)?;
        if let Some(parent_id) = &account.parent_id {
            validate_account_id(parent_id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_rules() {
        assert!(validate_account_id("1000").is_ok());
        assert!(validate_account_id("3f2b8c1e-7a4d-4e55-9b1a-0c9d2e6f7a10").is_ok());
        assert!(matches!(
            validate_account_id(""),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(validate_account_id("cash box").is_err());
        assert!(validate_account_id(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_enhanced_validator_checks_parent() {
        let validator = EnhancedAccountValidator;

        let ok = Account::new("cash", "Cash", AccountType::Asset, Some("current_assets"));
        assert!(validator.validate_account(&ok).is_ok());

        let bad_parent = Account::new("cash", "Cash", AccountType::Asset, Some("current assets"));
        assert!(validator.validate_account(&bad_parent).is_err());

        let unnamed = Account::new("cash", " ", AccountType::Asset, None);
        assert!(validator.validate_account(&unnamed).is_err());
    }
}
