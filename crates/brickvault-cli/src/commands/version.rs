//! Version command implementation.

use crate::style::print_labeled;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() {
    println!("brickvault {VERSION}");
    println!();
    println!("Access control and regulated-data protection for real-estate crowdfunding.");
    println!();
    println!("Build info:");
    print_labeled("Target", std::env::consts::ARCH);
    print_labeled("OS", std::env::consts::OS);
    print_labeled("Actions", &brickvault::Action::ALL.len().to_string());
}
