//! Identifier and timestamp synthesis
//!
//! Non-user records get `<prefix>_<unix-millis>_<suffix>` keys, unique in
//! practice without a central sequence. The suffix is 7 base-36 characters
//! drawn from a v4 UUID.

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

const SUFFIX_LEN: usize = 7;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a fresh identifier with the given prefix
pub fn generate_id(prefix: &str) -> String {
    format!(
        "{}_{}_{}",
        prefix,
        Utc::now().timestamp_millis(),
        random_suffix()
    )
}

/// Current instant as RFC 3339 UTC with millisecond precision
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn random_suffix() -> String {
    let mut n = Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        out.push(char::from(BASE36[(n % 36) as usize]));
        n /= 36;
    }
    out
}
