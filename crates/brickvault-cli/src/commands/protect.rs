//! Masking and hashing of individual values.

use brickvault::{Masked, mask_account_number};

pub fn mask(value: &str, account: bool) {
    let masked: Masked = if account {
        mask_account_number(value)
    } else {
        brickvault::mask(value)
    };
    println!("{masked}");
}

pub fn hash(value: &str) {
    println!("{}", brickvault::hash(value));
}
