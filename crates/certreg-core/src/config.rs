//! # Registry Configuration
//!
//! Deployment parameters for a registry instance: the certificate capacity,
//! the per-mint fee, the initial admin, and the index maintenance policy.
//! Loaded from JSON or YAML; omitted fields take the standard deployment
//! defaults.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::identity::Principal;

/// Default certificate capacity.
pub const DEFAULT_MAX_CERTIFICATES: u64 = 1_000_000;

/// Default fee charged to an issuer per mint.
pub const DEFAULT_MINT_FEE: u64 = 500;

/// Default admin principal.
pub const DEFAULT_ADMIN: &str = "ST1ADMIN";

/// How the learner and issuer indices react to a burn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexPolicy {
    /// Burned identifiers stay in the indices. Consumers re-check existence
    /// through the certificate store.
    #[default]
    Advisory,
    /// Burned identifiers are removed from both indices in the same commit
    /// that deletes the certificate.
    PruneOnBurn,
}

/// Configuration of a registry instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Identifiers at or above this value are never assigned.
    #[serde(default = "default_max_certificates")]
    pub max_certificates: u64,
    /// Fee transferred from the issuer to the admin on every mint.
    #[serde(default = "default_mint_fee")]
    pub mint_fee: u64,
    /// Initial admin principal.
    #[serde(default = "default_admin")]
    pub admin: Principal,
    /// Index maintenance on burn.
    #[serde(default)]
    pub index_policy: IndexPolicy,
}

fn default_max_certificates() -> u64 {
    DEFAULT_MAX_CERTIFICATES
}

fn default_mint_fee() -> u64 {
    DEFAULT_MINT_FEE
}

fn default_admin() -> Principal {
    Principal::from(DEFAULT_ADMIN)
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_certificates: DEFAULT_MAX_CERTIFICATES,
            mint_fee: DEFAULT_MINT_FEE,
            admin: default_admin(),
            index_policy: IndexPolicy::default(),
        }
    }
}

impl RegistryConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(s: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| CoreError::Config(format!("invalid JSON registry config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML configuration document.
    pub fn from_yaml(s: &str) -> Result<Self, CoreError> {
        let config: Self = serde_yaml::from_str(s)
            .map_err(|e| CoreError::Config(format!("invalid YAML registry config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations under which the registry could not operate.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_certificates == 0 {
            return Err(CoreError::Config(
                "max_certificates must be at least 1".to_string(),
            ));
        }
        if self.admin.is_empty() {
            return Err(CoreError::Config("admin principal must not be empty".to_string()));
        }
        Ok(())
    }

    /// Builder-style override of the admin principal.
    pub fn with_admin(mut self, admin: impl Into<Principal>) -> Self {
        self.admin = admin.into();
        self
    }

    /// Builder-style override of the mint fee.
    pub fn with_mint_fee(mut self, mint_fee: u64) -> Self {
        self.mint_fee = mint_fee;
        self
    }

    /// Builder-style override of the certificate capacity.
    pub fn with_max_certificates(mut self, max_certificates: u64) -> Self {
        self.max_certificates = max_certificates;
        self
    }

    /// Builder-style override of the index policy.
    pub fn with_index_policy(mut self, index_policy: IndexPolicy) -> Self {
        self.index_policy = index_policy;
        self
    }
}
