//! Decision table rendering.

use brickvault::{Action, Identity, KycStatus, Role, is_allowed};
use comfy_table::Cell;

use crate::style::{grid_table, print_heading, verdict_cell};

/// Prints one table per KYC status, with a column per role.
pub fn run(role: Option<Role>, kyc_status: Option<KycStatus>) {
    let roles: Vec<Role> = Role::ALL
        .into_iter()
        .filter(|r| role.is_none_or(|wanted| wanted == *r))
        .collect();
    let statuses = KycStatus::ALL
        .into_iter()
        .filter(|s| kyc_status.is_none_or(|wanted| wanted == *s));

    for (index, status) in statuses.enumerate() {
        if index > 0 {
            println!();
        }
        print_heading(&format!("KYC status: {status}"));

        let mut columns = vec!["Action".to_string(), "Domain".to_string()];
        columns.extend(roles.iter().map(ToString::to_string));

        let rows = Action::ALL
            .into_iter()
            .map(|action| {
                let mut row = vec![Cell::new(action.name()), Cell::new(action.domain())];
                row.extend(
                    roles
                        .iter()
                        .map(|r| verdict_cell(is_allowed(&Identity::new(*r, status), action))),
                );
                row
            })
            .collect();

        println!("{}", grid_table(&columns, rows));
    }
}
