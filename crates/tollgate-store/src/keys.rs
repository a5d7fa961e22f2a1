//! Key layout shared with existing deployments

/// Key holding a user's balance
pub fn balance_key(user_id: i64) -> String {
    format!("user-{user_id}")
}

/// Key whose existence marks a service credential as valid
pub fn credential_key(credential: &str) -> String {
    format!("key-{credential}")
}
