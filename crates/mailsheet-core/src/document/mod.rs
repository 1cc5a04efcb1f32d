//! Renderer-agnostic content of a handout.
//!
//! [`build`] projects a [`Config`], the accounts and the [`PortCatalog`]
//! into a [`Sections`] tree. Renderers never read the inputs directly; they
//! implement [`SectionVisitor`] and walk the tree with
//! [`Sections::accept`], so row order, grouping and selection are decided
//! in exactly one place.

mod issued;
pub mod text;

pub use issued::IssuedDate;

use crate::catalog::{Direction, PortCatalog};
use crate::model::{Account, Config};

/// Title block and greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Main title.
    pub title: &'static str,
    /// Subtitle under the title.
    pub subtitle: &'static str,
    /// Opening lines.
    pub greeting: [&'static str; 2],
}

/// A labelled value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueRow {
    /// Row label.
    pub label: &'static str,
    /// Value, echoed verbatim from the configuration.
    pub value: String,
}

/// Server host block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    /// Block heading.
    pub heading: &'static str,
    /// Receive server row, then send server row.
    pub rows: [KeyValueRow; 2],
}

/// Group label cell spanning a run of rows with the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupCell {
    /// Direction label.
    pub label: &'static str,
    /// Number of rows the cell spans.
    pub rowspan: usize,
}

/// One catalog row as shown in the port table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRow {
    /// Catalog id.
    pub id: &'static str,
    /// Present only on the first row of a direction run.
    pub group: Option<GroupCell>,
    /// Protocol label.
    pub protocol: &'static str,
    /// Port number.
    pub port: &'static str,
    /// Encryption mark.
    pub encryption: &'static str,
    /// Whether the row is emphasized.
    pub selected: bool,
}

impl PortRow {
    /// Marker glyph placed before the protocol label.
    #[must_use]
    pub const fn marker(&self) -> &'static str {
        if self.selected {
            text::SELECTED_MARKER
        } else {
            text::UNSELECTED_MARKER
        }
    }
}

/// Port table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSection {
    /// Column headers.
    pub columns: [&'static str; 4],
    /// Rows in catalog order.
    pub rows: Vec<PortRow>,
    /// Note printed under the table.
    pub legend: &'static str,
}

/// One account line, with placeholders already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRow {
    /// Email or user name.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Account table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSection {
    /// Block heading.
    pub heading: &'static str,
    /// Column headers.
    pub columns: [&'static str; 2],
    /// One row per account.
    pub rows: Vec<AccountRow>,
}

/// Link to the setup manual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualLink {
    /// Block label.
    pub label: &'static str,
    /// The URL, verbatim.
    pub url: String,
}

/// Closing notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    /// Notice lines.
    pub notes: [&'static str; 3],
}

/// Content of one handout, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections {
    /// Title block.
    pub header: Header,
    /// Server hosts.
    pub server_info: ServerInfo,
    /// Port table.
    pub ports: PortSection,
    /// Account table.
    pub accounts: AccountSection,
    /// Manual link, absent when the configuration has no URL.
    pub manual_link: Option<ManualLink>,
    /// Closing notices.
    pub footer: Footer,
}

/// A renderer walking a [`Sections`] tree.
pub trait SectionVisitor {
    /// Title block.
    fn header(&mut self, header: &Header);
    /// Server hosts.
    fn server_info(&mut self, info: &ServerInfo);
    /// Port table.
    fn ports(&mut self, ports: &PortSection);
    /// Account table.
    fn accounts(&mut self, accounts: &AccountSection);
    /// Manual link; only called when present.
    fn manual_link(&mut self, link: &ManualLink);
    /// Closing notices.
    fn footer(&mut self, footer: &Footer);
}

impl Sections {
    /// Visits every section in document order.
    pub fn accept<V: SectionVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.header(&self.header);
        visitor.server_info(&self.server_info);
        visitor.ports(&self.ports);
        visitor.accounts(&self.accounts);
        if let Some(link) = &self.manual_link {
            visitor.manual_link(link);
        }
        visitor.footer(&self.footer);
    }
}

/// Builds the section tree for one handout.
///
/// Pure: the same inputs always produce the same tree. The issued date is
/// not part of the tree; renderers receive it separately.
#[must_use]
pub fn build(config: &Config, accounts: &[Account], catalog: &PortCatalog) -> Sections {
    Sections {
        header: Header {
            title: text::TITLE,
            subtitle: text::SUBTITLE,
            greeting: text::GREETING,
        },
        server_info: ServerInfo {
            heading: text::SERVER_HEADING,
            rows: [
                KeyValueRow {
                    label: text::RECEIVE_SERVER,
                    value: config.receive_server.clone(),
                },
                KeyValueRow {
                    label: text::SEND_SERVER,
                    value: config.send_server.clone(),
                },
            ],
        },
        ports: PortSection {
            columns: text::PORT_COLUMNS,
            rows: port_rows(config, catalog),
            legend: text::PORT_LEGEND,
        },
        accounts: AccountSection {
            heading: text::ACCOUNT_HEADING,
            columns: text::ACCOUNT_COLUMNS,
            rows: accounts
                .iter()
                .map(|account| AccountRow {
                    email: account.display_email().to_string(),
                    password: account.display_password().to_string(),
                })
                .collect(),
        },
        manual_link: (!config.manual_url.is_empty()).then(|| ManualLink {
            label: text::MANUAL_LABEL,
            url: config.manual_url.clone(),
        }),
        footer: Footer {
            notes: text::FOOTER,
        },
    }
}

fn port_rows(config: &Config, catalog: &PortCatalog) -> Vec<PortRow> {
    let options: Vec<_> = catalog.iter().collect();
    let mut previous: Option<Direction> = None;

    options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let starts_run = previous != Some(option.direction);
            previous = Some(option.direction);

            let group = starts_run.then(|| GroupCell {
                label: option.direction.label(),
                rowspan: options[i..]
                    .iter()
                    .take_while(|next| next.direction == option.direction)
                    .count(),
            });

            PortRow {
                id: option.id,
                group,
                protocol: option.protocol,
                port: option.port,
                encryption: option.encryption_mark(),
                selected: config.is_selected(option.id),
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::PortOption;
    use crate::model::PortId;
    use proptest::prelude::*;

    fn config_with(ports: &[&str]) -> Config {
        Config {
            selected_ports: ports.iter().map(|id| PortId::from(*id)).collect(),
            ..Config::default()
        }
    }

    #[test]
    fn marks_exactly_the_selected_rows() {
        let sections = build(
            &config_with(&["pop_ssl", "imap_ssl", "smtp_ssl"]),
            &[Account::default()],
            &PortCatalog::standard(),
        );
        let flags: Vec<_> = sections.ports.rows.iter().map(|r| (r.id, r.selected)).collect();
        assert_eq!(
            flags,
            vec![
                ("pop3", false),
                ("pop_ssl", true),
                ("imap", false),
                ("imap_ssl", true),
                ("smtp", false),
                ("smtp_ssl", true),
            ]
        );
    }

    #[test]
    fn groups_span_direction_runs() {
        let sections = build(&Config::default(), &[], &PortCatalog::standard());
        let groups: Vec<_> = sections.ports.rows.iter().map(|r| r.group).collect();
        assert_eq!(
            groups[0],
            Some(GroupCell {
                label: "受信用",
                rowspan: 4
            })
        );
        assert!(groups[1..4].iter().all(Option::is_none));
        assert_eq!(
            groups[4],
            Some(GroupCell {
                label: "送信用",
                rowspan: 2
            })
        );
        assert!(groups[5].is_none());
    }

    #[test]
    fn interleaved_directions_start_new_groups() {
        let standard = PortCatalog::standard();
        let rows = ["imap", "smtp", "pop3"]
            .iter()
            .map(|id| *standard.get(id).unwrap())
            .collect::<Vec<PortOption>>();
        let catalog = PortCatalog::new(rows).unwrap();

        let sections = build(&Config::default(), &[], &catalog);
        let spans: Vec<_> = sections
            .ports
            .rows
            .iter()
            .map(|r| r.group.map(|g| g.rowspan))
            .collect();
        assert_eq!(spans, vec![Some(1), Some(1), Some(1)]);
    }

    #[test]
    fn server_values_are_echoed_verbatim() {
        let config = Config {
            receive_server: "  imap.example.jp ".to_string(),
            send_server: String::new(),
            ..Config::default()
        };
        let sections = build(&config, &[], &PortCatalog::standard());
        assert_eq!(sections.server_info.rows[0].value, "  imap.example.jp ");
        assert_eq!(sections.server_info.rows[1].value, "");
    }

    #[test]
    fn empty_account_fields_use_placeholder() {
        let accounts = [Account::new("info@example.jp", ""), Account::default()];
        let sections = build(&Config::default(), &accounts, &PortCatalog::standard());
        let rows = &sections.accounts.rows;
        assert_eq!(rows[0].email, "info@example.jp");
        assert_eq!(rows[0].password, "-");
        assert_eq!(rows[1].email, "-");
        assert_eq!(rows[1].password, "-");
    }

    #[test]
    fn manual_link_only_when_url_present() {
        let mut config = Config::default();
        let sections = build(&config, &[], &PortCatalog::standard());
        assert_eq!(sections.manual_link.unwrap().url, "https://example.jp");

        config.manual_url.clear();
        let sections = build(&config, &[], &PortCatalog::standard());
        assert!(sections.manual_link.is_none());
    }

    #[derive(Default)]
    struct Trace(Vec<&'static str>);

    impl SectionVisitor for Trace {
        fn header(&mut self, _: &Header) {
            self.0.push("header");
        }
        fn server_info(&mut self, _: &ServerInfo) {
            self.0.push("server_info");
        }
        fn ports(&mut self, _: &PortSection) {
            self.0.push("ports");
        }
        fn accounts(&mut self, _: &AccountSection) {
            self.0.push("accounts");
        }
        fn manual_link(&mut self, _: &ManualLink) {
            self.0.push("manual_link");
        }
        fn footer(&mut self, _: &Footer) {
            self.0.push("footer");
        }
    }

    #[test]
    fn visitor_walks_document_order() {
        let mut trace = Trace::default();
        build(&Config::default(), &[], &PortCatalog::standard()).accept(&mut trace);
        assert_eq!(
            trace.0,
            ["header", "server_info", "ports", "accounts", "manual_link", "footer"]
        );

        let mut trace = Trace::default();
        let config = Config {
            manual_url: String::new(),
            ..Config::default()
        };
        build(&config, &[], &PortCatalog::standard()).accept(&mut trace);
        assert!(!trace.0.contains(&"manual_link"));
    }

    proptest! {
        #[test]
        fn selection_flags_match_membership(
            mask in proptest::collection::vec(any::<bool>(), 6),
        ) {
            let catalog = PortCatalog::standard();
            let ids: Vec<_> = catalog
                .iter()
                .zip(&mask)
                .filter(|(_, on)| **on)
                .map(|(row, _)| row.id)
                .collect();
            let config = config_with(&ids);

            let sections = build(&config, &[Account::default()], &catalog);
            for (row, option) in sections.ports.rows.iter().zip(catalog.iter()) {
                prop_assert_eq!(row.id, option.id);
                prop_assert_eq!(row.selected, config.is_selected(option.id));
            }
        }

        #[test]
        fn build_is_deterministic(
            receive in ".{0,20}",
            email in ".{0,20}",
        ) {
            let config = Config { receive_server: receive, ..Config::default() };
            let accounts = [Account::new(email, "")];
            let catalog = PortCatalog::standard();
            prop_assert_eq!(
                build(&config, &accounts, &catalog),
                build(&config, &accounts, &catalog)
            );
        }
    }
}
