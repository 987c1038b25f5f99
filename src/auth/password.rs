use anyhow::Context;
use tracing::error;

/// bcrypt work factor applied to every stored password.
pub const BCRYPT_COST: u32 = 10;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    bcrypt::hash(plain, BCRYPT_COST)
        .map_err(|e| {
            error!(error = %e, "bcrypt hash_password error");
            e
        })
        .context("hash password")
}

/// Runs the hash on the blocking pool; bcrypt at cost 10 takes tens of milliseconds.
pub async fn hash_password_blocking(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("join password hashing task")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_uses_fixed_cost() {
        let hash = hash_password("Secur3P@ssw0rd!").expect("hashing should succeed");
        assert!(hash.starts_with("$2b$10$"), "unexpected hash prefix: {hash}");
    }

    #[test]
    fn hash_verifies_and_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(bcrypt::verify(password, &hash).expect("verify should succeed"));
        assert!(!bcrypt::verify("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn blocking_variant_matches() {
        let hash = hash_password_blocking("pw-on-pool".into()).await.unwrap();
        assert!(bcrypt::verify("pw-on-pool", &hash).unwrap());
    }
}
