use std::fmt;

use serde::Serialize;

use super::types::CategoryStat;
use crate::ticket::{KnownField, NormalizedTicket};

const TOP_CATEGORIES: usize = 10;

/// Fixed category vocabulary. Variant order is the keyword search order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Email,
    Password,
    RingPhone,
    Security,
    Salesforce,
    Reports,
    Integration,
    Hardware,
    Software,
    Network,
    DataManagement,
    Documentation,
    Procurement,
    Training,
    UserManagement,
    Printer,
    MobileDevice,
    Backup,
    Automation,
    Other,
}

impl Category {
    /// Categories searched by keyword, in priority order.
    const KEYWORD_ORDER: [Category; 19] = [
        Category::Email,
        Category::Password,
        Category::RingPhone,
        Category::Security,
        Category::Salesforce,
        Category::Reports,
        Category::Integration,
        Category::Hardware,
        Category::Software,
        Category::Network,
        Category::DataManagement,
        Category::Documentation,
        Category::Procurement,
        Category::Training,
        Category::UserManagement,
        Category::Printer,
        Category::MobileDevice,
        Category::Backup,
        Category::Automation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Email => "Email",
            Category::Password => "Password",
            Category::RingPhone => "Ring/Phone",
            Category::Security => "Security",
            Category::Salesforce => "Salesforce",
            Category::Reports => "Reports",
            Category::Integration => "Integration",
            Category::Hardware => "Hardware",
            Category::Software => "Software",
            Category::Network => "Network",
            Category::DataManagement => "Data Management",
            Category::Documentation => "Documentation",
            Category::Procurement => "Procurement",
            Category::Training => "Training",
            Category::UserManagement => "User Management",
            Category::Printer => "Printer",
            Category::MobileDevice => "Mobile Device",
            Category::Backup => "Backup",
            Category::Automation => "Automation",
            Category::Other => "Other",
        }
    }

    /// Lowercase substrings matched against a ticket's name and Category.
    fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Email => &[
                "email",
                "outlook",
                "inbox",
                "mail",
                "send",
                "receive",
                "group list",
                "won't send",
                "won't receive",
                "setup",
            ],
            Category::Password => &[
                "password",
                "reset",
                "login",
                "credential",
                "authentication",
            ],
            Category::RingPhone => &[
                "ring",
                "phone",
                "call",
                "voip",
                "dialer",
                "telephony",
                "voicemail",
            ],
            Category::Security => &[
                "security",
                "permission",
                "access",
                "license",
                "licensing",
                "role",
                "vpn",
            ],
            Category::Salesforce => &["sfdc", "salesforce", "crm"],
            Category::Reports => &["report", "dashboard", "analytics", "data", "reporting"],
            Category::Integration => &[
                "integration",
                "api",
                "sync",
                "connection",
                "apps not syncing",
                "platform integration",
            ],
            Category::Hardware => &[
                "hardware",
                "laptop",
                "computer",
                "device",
                "equipment",
                "configuration",
            ],
            Category::Software => &[
                "software",
                "platform",
                "application",
                "tool",
                "system slow",
                "freezing",
            ],
            Category::Network => &["network", "internet", "connectivity", "wifi"],
            Category::DataManagement => &[
                "data upload",
                "data transfer",
                "data management",
                "data cleanup",
                "import",
                "export",
            ],
            Category::Documentation => &[
                "documentation",
                "office docs",
                "templates",
                "manual",
                "guide",
            ],
            Category::Procurement => &[
                "procurement",
                "purchase",
                "billing",
                "licensing",
                "vendor",
            ],
            Category::Training => &[
                "training",
                "onboarding",
                "instruction",
                "learning",
                "education",
            ],
            Category::UserManagement => &[
                "user",
                "account",
                "profile",
                "provisioning",
                "deactivate",
                "activate",
            ],
            Category::Printer => &["printer", "print", "scanner", "fax"],
            Category::MobileDevice => &["mobile", "iphone", "ipad", "android", "tablet"],
            Category::Backup => &["backup", "restore", "recovery", "archive"],
            Category::Automation => &["automation", "workflow", "script", "macro"],
            Category::Other => &[],
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::Email => {
                "Email-related issues including Outlook configuration, sending/receiving \
                 problems, group lists, and mailbox setup. These tickets typically involve \
                 communication platform troubleshooting."
            }
            Category::Password => {
                "Password resets, login credential issues, and authentication problems. This \
                 includes account lockouts and credential management requests."
            }
            Category::RingPhone => {
                "Phone system tickets including Ring Central, VoIP configuration, call quality \
                 issues, and voicemail setup. These involve telephony infrastructure and \
                 communication tools."
            }
            Category::Security => {
                "Security permissions, access controls, VPN configuration, and license \
                 management. These tickets ensure proper access levels and data protection."
            }
            Category::Salesforce => {
                "Salesforce CRM platform issues, configuration changes, and workflow \
                 customization. This includes SFDC-specific enhancements and troubleshooting."
            }
            Category::Reports => {
                "Report generation, dashboard creation, analytics configuration, and data \
                 visualization requests. These tickets involve business intelligence and \
                 reporting tools."
            }
            Category::Integration => {
                "API connections, third-party app synchronization, platform integrations, and \
                 data flow issues. These tickets ensure systems communicate properly with each \
                 other."
            }
            Category::Hardware => {
                "Physical equipment including laptops, computers, peripherals, and device \
                 configuration. This covers hardware procurement, setup, and troubleshooting."
            }
            Category::Software => {
                "Software applications, platform performance, system slowness, and application \
                 freezing issues. These tickets address software functionality and performance \
                 problems."
            }
            Category::Network => {
                "Network connectivity, internet access, WiFi issues, and infrastructure \
                 problems. This includes network configuration and connectivity troubleshooting."
            }
            Category::DataManagement => {
                "Data uploads, transfers, imports, exports, and data cleanup operations. These \
                 tickets involve moving and managing data across systems."
            }
            Category::Documentation => {
                "Documentation creation, office document templates, manuals, and guide \
                 development. This includes knowledge base and process documentation."
            }
            Category::Procurement => {
                "Purchasing requests, billing inquiries, vendor management, and licensing \
                 procurement. These tickets involve acquiring software, hardware, and services."
            }
            Category::Training => {
                "User training sessions, onboarding support, educational materials, and learning \
                 resources. This includes new hire technology orientation and skill development."
            }
            Category::UserManagement => {
                "User account creation, profile updates, provisioning, deactivation, and account \
                 management. These tickets handle employee lifecycle technology needs."
            }
            Category::Printer => {
                "Printer setup, configuration, troubleshooting, scanning, and fax functionality. \
                 This covers all document printing and scanning equipment."
            }
            Category::MobileDevice => {
                "Mobile phone setup, iPad configuration, Android device management, and mobile \
                 app support. This includes mobile device management and troubleshooting."
            }
            Category::Backup => {
                "Data backup configuration, file restoration, disaster recovery, and archival \
                 processes. These tickets ensure data protection and recovery capabilities."
            }
            Category::Automation => {
                "Workflow automation, scripting, macro creation, and process optimization. This \
                 includes automating repetitive tasks and improving efficiency."
            }
            Category::Other => {
                "Miscellaneous requests that don't fit standard categories. These tickets may \
                 involve unique situations or emerging technology needs."
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-sensitive substring rules on the "TIE Request Detail" field.
const REQUEST_DETAIL_RULES: &[(&[&str], Category)] = &[
    (&["Email"], Category::Email),
    (&["Phone", "Voicemail"], Category::RingPhone),
    (&["Office Docs", "Templates"], Category::Documentation),
    (&["Reports", "Dashboards"], Category::Reports),
    (&["Data Upload", "Data Transfer"], Category::DataManagement),
    (&["Apps Not Syncing"], Category::Integration),
    (&["System Slow", "Freezing"], Category::Software),
    (&["Login", "VPN"], Category::Security),
    (&["Purchase", "Billing"], Category::Procurement),
    (&["Hardware", "Configuration"], Category::Hardware),
    (&["Platform Integration"], Category::Integration),
    (&["Training"], Category::Training),
    (&["User", "Account"], Category::UserManagement),
    (&["Printer"], Category::Printer),
    (&["Mobile", "iPad", "iPhone"], Category::MobileDevice),
    (&["Backup", "Restore"], Category::Backup),
];

/// Case-sensitive substring rules on the "Work Type" field.
const WORK_TYPE_RULES: &[(&[&str], Category)] = &[
    (&["Data Management"], Category::DataManagement),
    (&["Documentation"], Category::Documentation),
    (&["Reporting"], Category::Reports),
    (&["Communication"], Category::Email),
    (&["System"], Category::Software),
    (&["Training"], Category::Training),
    (&["Automation"], Category::Automation),
];

fn match_rules(value: &str, rules: &[(&[&str], Category)]) -> Option<Category> {
    rules
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| value.contains(n)))
        .map(|(_, category)| *category)
}

/// Classify one ticket. Request detail wins over work type, which wins
/// over keywords in the name and Category field.
pub fn categorize(ticket: &NormalizedTicket) -> Category {
    let fields = &ticket.custom_fields;

    if let Some(detail) = fields.text(KnownField::RequestDetail) {
        if let Some(category) = match_rules(&detail, REQUEST_DETAIL_RULES) {
            return category;
        }
    }
    if let Some(work_type) = fields.text(KnownField::WorkType) {
        if let Some(category) = match_rules(&work_type, WORK_TYPE_RULES) {
            return category;
        }
    }

    let search = format!(
        "{} {}",
        ticket.name,
        fields.text(KnownField::Category).unwrap_or_default()
    )
    .to_lowercase();
    Category::KEYWORD_ORDER
        .into_iter()
        .find(|c| c.keywords().iter().any(|k| search.contains(k)))
        .unwrap_or(Category::Other)
}

/// Open/closed/total counts per category, the ten largest by total.
/// Ties keep the order in which categories were first seen.
pub fn category_breakdown(tickets: &[NormalizedTicket]) -> Vec<CategoryStat> {
    let mut stats: Vec<(Category, CategoryStat)> = Vec::new();
    for ticket in tickets {
        let category = categorize(ticket);
        let idx = match stats.iter().position(|(c, _)| *c == category) {
            Some(idx) => idx,
            None => {
                stats.push((
                    category,
                    CategoryStat {
                        category: category.name().to_string(),
                        open_count: 0,
                        closed_count: 0,
                        total_count: 0,
                        description: category.description().to_string(),
                    },
                ));
                stats.len() - 1
            }
        };
        let stat = &mut stats[idx].1;
        stat.total_count += 1;
        if ticket.is_open {
            stat.open_count += 1;
        } else {
            stat.closed_count += 1;
        }
    }

    let mut stats: Vec<CategoryStat> = stats.into_iter().map(|(_, s)| s).collect();
    stats.sort_by(|a, b| b.total_count.cmp(&a.total_count));
    stats.truncate(TOP_CATEGORIES);
    stats
}
