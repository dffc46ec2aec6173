//! Page Navigation
//!
//! Pages of the admin client and the capability each one needs. Roles map
//! to capability sets in one place; the sidebar and every command check
//! against the same table.

use donation_core::Role;
use std::fmt;

// ============================================================================
// Capabilities
// ============================================================================

/// Something a role is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ViewDashboard,
    ManageUsers,
    ViewDonations,
    ManageDonations,
    ViewReports,
}

impl Capability {
    pub fn all() -> &'static [Capability] {
        &[
            Capability::ViewDashboard,
            Capability::ManageUsers,
            Capability::ViewDonations,
            Capability::ManageDonations,
            Capability::ViewReports,
        ]
    }

    /// Phrase used in permission errors ("You are not allowed to ...")
    pub fn action(&self) -> &'static str {
        match self {
            Capability::ViewDashboard => "view the dashboard",
            Capability::ManageUsers => "manage users",
            Capability::ViewDonations => "view donations",
            Capability::ManageDonations => "manage donations",
            Capability::ViewReports => "view reports",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Capability::ViewDashboard => 1,
            Capability::ManageUsers => 1 << 1,
            Capability::ViewDonations => 1 << 2,
            Capability::ManageDonations => 1 << 3,
            Capability::ViewReports => 1 << 4,
        }
    }
}

/// Set of capabilities granted to a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn of(capabilities: &[Capability]) -> Self {
        Self(capabilities.iter().fold(0, |bits, c| bits | c.bit()))
    }

    /// Role to capability mapping
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Self::of(Capability::all()),
            Role::User => Self::of(&[
                Capability::ViewDashboard,
                Capability::ViewDonations,
                Capability::ManageDonations,
            ]),
        }
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::all()
            .iter()
            .copied()
            .filter(|c| self.contains(*c))
    }
}

// ============================================================================
// Pages
// ============================================================================

/// Application pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Dashboard,
    Users,
    CreateUser,
    EditUser,
    Donations,
    CreateDonation,
    EditDonation,
    Summary,
    DateRangeReport,
    MonthlySummary,
}

impl Page {
    /// Get the display name for this page
    pub fn display_name(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Users => "Users",
            Page::CreateUser => "Create User",
            Page::EditUser => "Edit User",
            Page::Donations => "Donations",
            Page::CreateDonation => "Create Donation",
            Page::EditDonation => "Edit Donation",
            Page::Summary => "Donation Summary",
            Page::DateRangeReport => "Date-wise Report",
            Page::MonthlySummary => "Monthly Summary",
        }
    }

    /// Command that opens this page
    pub fn command(&self) -> &'static str {
        match self {
            Page::Dashboard => "whoami",
            Page::Users => "users list",
            Page::CreateUser => "users create",
            Page::EditUser => "users edit <ID>",
            Page::Donations => "donations list",
            Page::CreateDonation => "donations create",
            Page::EditDonation => "donations edit <ID>",
            Page::Summary => "reports summary",
            Page::DateRangeReport => "reports range",
            Page::MonthlySummary => "reports monthly",
        }
    }

    pub fn required_capability(&self) -> Capability {
        match self {
            Page::Dashboard => Capability::ViewDashboard,
            Page::Users | Page::CreateUser | Page::EditUser => Capability::ManageUsers,
            Page::Donations => Capability::ViewDonations,
            Page::CreateDonation | Page::EditDonation => Capability::ManageDonations,
            Page::Summary | Page::DateRangeReport | Page::MonthlySummary => {
                Capability::ViewReports
            }
        }
    }

    /// The list page a form returns to after a successful submit
    pub fn list_page(&self) -> Page {
        match self {
            Page::CreateUser | Page::EditUser => Page::Users,
            Page::CreateDonation | Page::EditDonation => Page::Donations,
            other => *other,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Sidebar
// ============================================================================

/// A group of pages in the sidebar
#[derive(Debug, Clone, PartialEq)]
pub struct NavGroup {
    pub label: &'static str,
    pub pages: Vec<Page>,
}

fn sidebar() -> Vec<NavGroup> {
    vec![
        NavGroup {
            label: "Dashboard",
            pages: vec![Page::Dashboard],
        },
        NavGroup {
            label: "Users",
            pages: vec![Page::Users, Page::CreateUser],
        },
        NavGroup {
            label: "Donations",
            pages: vec![Page::Donations, Page::CreateDonation],
        },
        NavGroup {
            label: "Reports",
            pages: vec![Page::Summary, Page::DateRangeReport, Page::MonthlySummary],
        },
    ]
}

/// Sidebar entries visible with `capabilities`; empty groups are dropped
pub fn nav_groups(capabilities: CapabilitySet) -> Vec<NavGroup> {
    sidebar()
        .into_iter()
        .filter_map(|mut group| {
            group
                .pages
                .retain(|page| capabilities.contains(page.required_capability()));
            (!group.pages.is_empty()).then_some(group)
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
