//! Sample data the workspace is seeded with at startup.

use crate::directory::Directory;
use casebook_types::{Account, Action, ActionType, Case, CaseType, Origin, Priority, Status, Tier, User};

pub fn directory() -> Directory {
    let users = vec![
        user("u-100", "Jordan Blake"),
        user("u-101", "Priya Natarajan"),
        user("u-102", "Sam Okafor"),
    ];
    let accounts = vec![
        account("a-200", "Brightline Logistics", Tier::Basic),
        account("a-201", "Northwind Outfitters", Tier::Silver),
        account("a-202", "Helios Energy", Tier::Gold),
        account("a-203", "Quantum Freight", Tier::Platinum),
    ];
    Directory::new(users, accounts)
}

/// Seed cases. Owners and accounts are taken from `dir`; fixture ids that do not
/// resolve are skipped rather than producing dangling references.
pub fn cases(dir: &Directory) -> Vec<Case> {
    let rows: Vec<Row> = vec![
        Row {
            id: "00001027",
            owner: "u-100",
            account: "a-202",
            name: "Maya Chen",
            phone: "(415) 555-0132",
            email: "maya.chen@helios.example",
            status: Status::Open,
            priority: Priority::High,
            kind: CaseType::Problem,
            origin: Origin::Phone,
            reason: "Shipment arrived damaged",
            notes: "Two pallets crushed in transit; customer has photos.",
            actions: vec![Action::new(ActionType::Call, "Called customer to confirm damage report")],
        },
        Row {
            id: "00001028",
            owner: "u-101",
            account: "a-200",
            name: "Luis Ortega",
            phone: "(312) 555-0199",
            email: "luis.ortega@brightline.example",
            status: Status::Pending,
            priority: Priority::Medium,
            kind: CaseType::Question,
            origin: Origin::Email,
            reason: "Invoice shows duplicate charge",
            notes: "Waiting on billing export.",
            actions: vec![],
        },
        Row {
            id: "00001029",
            owner: "u-102",
            account: "a-203",
            name: "Hannah Weiss",
            phone: "(646) 555-0147",
            email: "h.weiss@quantumfreight.example",
            status: Status::Escalated,
            priority: Priority::High,
            kind: CaseType::Incident,
            origin: Origin::Portal,
            reason: "Tracking portal down for all users",
            notes: "Escalated to platform on-call.",
            actions: vec![
                Action::new(ActionType::Meeting, "Bridge call with platform team"),
                Action::new(ActionType::Task, "Post status page update"),
            ],
        },
        Row {
            id: "00001030",
            owner: "u-100",
            account: "a-201",
            name: "Owen Fischer",
            phone: "(206) 555-0111",
            email: "owen@northwind.example",
            status: Status::Open,
            priority: Priority::Low,
            kind: CaseType::Request,
            origin: Origin::Chat,
            reason: "Add second delivery address",
            notes: "",
            actions: vec![],
        },
        Row {
            id: "00001031",
            owner: "u-101",
            account: "a-202",
            name: "Grace Liu",
            phone: "(503) 555-0164",
            email: "grace.liu@helios.example",
            status: Status::Closed,
            priority: Priority::Medium,
            kind: CaseType::Question,
            origin: Origin::Email,
            reason: "Change of billing contact",
            notes: "Updated in CRM, confirmed by email.",
            actions: vec![Action::new(ActionType::Email, "Sent confirmation of new billing contact")],
        },
        Row {
            id: "00001032",
            owner: "u-102",
            account: "a-203",
            name: "Ravi Menon",
            phone: "(617) 555-0175",
            email: "ravi.menon@quantumfreight.example",
            status: Status::Open,
            priority: Priority::Medium,
            kind: CaseType::Problem,
            origin: Origin::Phone,
            reason: "Late delivery on priority order",
            notes: "Order PO-88213, promised next-day.",
            actions: vec![],
        },
    ];

    rows.into_iter()
        .filter_map(|r| {
            let owner = dir.user(r.owner)?.clone();
            let account = dir.account(r.account)?.clone();
            Some(Case {
                id: r.id.to_string(),
                owner,
                phone: r.phone.to_string(),
                email: r.email.to_string(),
                name: r.name.to_string(),
                account,
                status: r.status,
                priority: r.priority,
                kind: r.kind,
                origin: r.origin,
                reason: r.reason.to_string(),
                notes: r.notes.to_string(),
                actions: r.actions,
            })
        })
        .collect()
}

struct Row {
    id: &'static str,
    owner: &'static str,
    account: &'static str,
    name: &'static str,
    phone: &'static str,
    email: &'static str,
    status: Status,
    priority: Priority,
    kind: CaseType,
    origin: Origin,
    reason: &'static str,
    notes: &'static str,
    actions: Vec<Action>,
}

fn user(id: &str, name: &str) -> User {
    User { id: id.into(), name: name.into() }
}

fn account(id: &str, name: &str, tier: Tier) -> Account {
    Account { id: id.into(), name: name.into(), tier }
}
