//! Encryption secret generation.

use brickvault::{DEFAULT_KEY_ENV, EncryptionKey, KEY_LENGTH};

use crate::style::{colors::SemanticStyle, print_hint, print_warn};

pub fn run(quiet: bool) {
    let secret = EncryptionKey::generate_secret();
    tracing::debug!(length = secret.len(), "generated encryption secret");

    if quiet {
        println!("{secret}");
        return;
    }

    println!("{}", secret.code());
    println!();
    print_hint(&format!(
        "export {DEFAULT_KEY_ENV}=<secret> ({KEY_LENGTH} bytes, AES-256-GCM)"
    ));
    print_warn("Store the secret outside the repository. Losing it makes sealed fields unreadable.");
}
