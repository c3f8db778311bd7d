use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error(transparent)]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// bcrypt with a configurable work factor. Hashing runs on the blocking
/// pool so request workers are not stalled.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn from_config() -> Self {
        Self::new(crate::config::config().security.bcrypt_cost)
    }

    pub async fn hash(&self, plain: String) -> Result<String, PasswordError> {
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost)).await??;
        Ok(hashed)
    }

    pub async fn verify(&self, plain: String, hashed: String) -> Result<bool, PasswordError> {
        let ok = tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hashed)).await??;
        Ok(ok)
    }
}

/// Password assigned on creation and on reset: `<userName>@`
pub fn default_password(user_name: &str) -> String {
    format!("{}@", user_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashes_and_verifies() {
        let hasher = PasswordHasher::new(4);
        let hashed = hasher.hash(default_password("lan0101")).await.unwrap();
        assert_ne!(hashed, "lan0101@");
        assert!(hasher.verify("lan0101@".to_string(), hashed.clone()).await.unwrap());
        assert!(!hasher.verify("lan0101".to_string(), hashed).await.unwrap());
    }
}
