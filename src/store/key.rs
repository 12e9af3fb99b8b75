//! Storage key generation using SHA-256 hashes

use sha2::{Digest, Sha256};

/// Derive the token storage key for a login and scope.
///
/// The key is the hex SHA-256 of `login:<login>|gk:<bool>|ro:<bool>`, so it
/// is stable across processes and safe to use as a file name.
pub fn storage_key(login: &str, global_key: bool, read_only: bool) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("login:{login}|gk:{global_key}|ro:{read_only}").as_bytes());
    format!("{:x}", hasher.finalize())
}
