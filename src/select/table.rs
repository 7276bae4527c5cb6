// file: src/select/table.rs
// version: 1.1.0
// guid: 8f73603a-1c2b-4de0-a3f4-6abd3e145929

//! Selection table rendering

use super::Selectable;
use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
};

/// Render `records` as an index-numbered table under the record type's title
///
/// `styled` colours the title for a terminal.
pub fn render<T: Selectable>(records: &[T], styled: bool) -> String {
    let mut builder = Builder::default();
    builder.push_record(std::iter::once("Index").chain(T::HEADERS.iter().copied()).map(String::from));
    for (i, record) in records.iter().enumerate() {
        builder.push_record(std::iter::once(i.to_string()).chain(record.cells()));
    }

    let mut table = builder.build();
    table
        .with(Style::ascii())
        .with(Modify::new(Columns::first()).with(Alignment::right()));

    let title = if styled {
        T::TITLE.green().bold().to_string()
    } else {
        T::TITLE.to_string()
    };
    format!("{}\n{}\n", title, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::{Subscription, VirtualMachine};

    #[test]
    fn test_render_vms() {
        let vms = vec![VirtualMachine::new("web1", "rg1"), VirtualMachine::new("database", "rg2")];

        let rendered = render(&vms, false);

        assert!(rendered.starts_with("Available VMs\n"));
        assert!(rendered.contains("| Index | VM Name  | Resource Group |"));
        assert!(rendered.contains("|     0 | web1     | rg1            |"));
        assert!(rendered.contains("|     1 | database | rg2            |"));
    }

    #[test]
    fn test_render_marks_active_subscription() {
        let subs = vec![Subscription {
            name: "Prod".to_string(),
            id: "2222".to_string(),
            is_default: true,
        }];

        let rendered = render(&subs, false);

        assert!(rendered.starts_with("Available Subscriptions\n"));
        assert!(rendered.contains("| Index | Subscription | Id   | Active |"));
        assert!(rendered.contains("|     0 | Prod         | 2222 | *      |"));
    }

    #[test]
    fn test_render_empty_listing_keeps_headers() {
        let rendered = render::<VirtualMachine>(&[], false);
        assert!(rendered.contains("Index"));
        assert!(!rendered.contains("|     0 |"));
    }
}
