use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use super::AuthError;

/// Action every editor endpoint verifies its nonce against
pub const EDITOR_ACTION: &str = "pages-editor";

const TOKEN_BYTES: usize = 10;

type HmacSha256 = Hmac<Sha256>;

/// Anti-forgery tokens bound to a user, an action and a time tick.
///
/// Time is cut into ticks of half the lifetime; a token verifies during the
/// tick it was issued in and the one after, so it lives between half and
/// the full lifetime.
#[derive(Clone)]
pub struct NonceSigner {
    mac: HmacSha256,
    tick_secs: i64,
}

impl NonceSigner {
    pub fn new(secret: &[u8], lifetime_secs: u64) -> Self {
        let mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
        let tick_secs = i64::try_from(lifetime_secs / 2).unwrap_or(i64::MAX).max(1);
        Self { mac, tick_secs }
    }

    /// Signer keyed with random bytes; tokens die with the process.
    pub fn ephemeral(lifetime_secs: u64) -> Self {
        let mut secret = Vec::with_capacity(32);
        secret.extend_from_slice(Uuid::new_v4().as_bytes());
        secret.extend_from_slice(Uuid::new_v4().as_bytes());
        Self::new(&secret, lifetime_secs)
    }

    /// Seconds a freshly issued token is guaranteed to stay valid
    pub fn guaranteed_validity_secs(&self) -> i64 {
        self.tick_secs
    }

    pub fn issue(&self, user: &str, action: &str) -> String {
        self.issue_at(user, action, Utc::now())
    }

    pub fn issue_at(&self, user: &str, action: &str, now: DateTime<Utc>) -> String {
        self.sign(self.tick(now), user, action)
    }

    pub fn verify(&self, user: &str, action: &str, token: &str) -> Result<(), AuthError> {
        self.verify_at(user, action, token, Utc::now())
    }

    pub fn verify_at(
        &self,
        user: &str,
        action: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let tick = self.tick(now);
        let matches = [tick, tick - 1].into_iter().any(|t| {
            let expected = self.sign(t, user, action);
            bool::from(expected.as_bytes().ct_eq(token.as_bytes()))
        });

        if matches { Ok(()) } else { Err(AuthError::BadNonce) }
    }

    fn tick(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp().div_euclid(self.tick_secs)
    }

    fn sign(&self, tick: i64, user: &str, action: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(format!("{tick}|{action}|{user}").as_bytes());
        let digest = mac.finalize().into_bytes();
        hex::encode(&digest[..TOKEN_BYTES])
    }
}

impl std::fmt::Debug for NonceSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceSigner")
            .field("tick_secs", &self.tick_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_round_trip_same_tick() {
        let signer = NonceSigner::new(b"secret", 3600);
        let token = signer.issue_at("alice", EDITOR_ACTION, at(10_000));

        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(signer.verify_at("alice", EDITOR_ACTION, &token, at(10_000)).is_ok());
    }

    #[test]
    fn test_bound_to_user_and_action() {
        let signer = NonceSigner::new(b"secret", 3600);
        let token = signer.issue_at("alice", EDITOR_ACTION, at(10_000));

        assert_eq!(
            signer.verify_at("bob", EDITOR_ACTION, &token, at(10_000)),
            Err(AuthError::BadNonce)
        );
        assert_eq!(
            signer.verify_at("alice", "other-action", &token, at(10_000)),
            Err(AuthError::BadNonce)
        );
    }

    #[test]
    fn test_expires_after_two_ticks() {
        let signer = NonceSigner::new(b"secret", 3600);
        // tick length is 1800s; 9000 is the first second of tick 5
        let token = signer.issue_at("alice", EDITOR_ACTION, at(9_000));

        assert!(signer.verify_at("alice", EDITOR_ACTION, &token, at(10_799)).is_ok());
        assert!(signer.verify_at("alice", EDITOR_ACTION, &token, at(10_800)).is_ok());
        assert!(signer.verify_at("alice", EDITOR_ACTION, &token, at(12_599)).is_ok());
        assert_eq!(
            signer.verify_at("alice", EDITOR_ACTION, &token, at(12_600)),
            Err(AuthError::BadNonce)
        );
        assert!(signer.verify_at("alice", EDITOR_ACTION, &token, at(8_999)).is_err());
    }

    #[test]
    fn test_different_secrets_disagree() {
        let a = NonceSigner::new(b"secret-a", 3600);
        let b = NonceSigner::new(b"secret-b", 3600);
        let token = a.issue_at("alice", EDITOR_ACTION, at(10_000));

        assert!(b.verify_at("alice", EDITOR_ACTION, &token, at(10_000)).is_err());
        assert!(a.verify_at("alice", EDITOR_ACTION, "", at(10_000)).is_err());
    }

    #[test]
    fn test_ephemeral_signers_are_distinct() {
        let a = NonceSigner::ephemeral(3600);
        let b = NonceSigner::ephemeral(3600);
        let token = a.issue("alice", EDITOR_ACTION);

        assert!(a.verify("alice", EDITOR_ACTION, &token).is_ok());
        assert!(b.verify("alice", EDITOR_ACTION, &token).is_err());
    }
}
