use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tenant {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub primary_contact: Option<String>,
}

impl Tenant {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            description: None,
            primary_contact: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_primary_contact(mut self, contact: impl Into<String>) -> Self {
        self.primary_contact = Some(contact.into());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineCategory {
    PersonalLaptop,
    Server,
}

impl MachineCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            MachineCategory::PersonalLaptop => "personal_laptop",
            MachineCategory::Server => "server",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Machine {
    pub id: String,
    pub display_name: String,
    pub tenant_slug: String,
    pub category: MachineCategory,
    pub hostname: Option<String>,
    pub role: Option<String>,
    pub last_scan_at: Option<DateTime<Utc>>,
}

impl Machine {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        tenant_slug: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            tenant_slug: tenant_slug.into(),
            category: MachineCategory::Server,
            hostname: None,
            role: None,
            last_scan_at: None,
        }
    }

    pub fn with_category(mut self, category: MachineCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_last_scan_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_scan_at = Some(at);
        self
    }
}

/// Board column a review record currently sits in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Review,
    ActionNeeded,
    Resolved,
    Archived,
}

impl ReviewStatus {
    /// Board column order, left to right.
    pub const ALL: [ReviewStatus; 4] = [
        ReviewStatus::Review,
        ReviewStatus::ActionNeeded,
        ReviewStatus::Resolved,
        ReviewStatus::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::Review => "review",
            ReviewStatus::ActionNeeded => "action_needed",
            ReviewStatus::Resolved => "resolved",
            ReviewStatus::Archived => "archived",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReviewStatus::Review => "Review",
            ReviewStatus::ActionNeeded => "Action needed",
            ReviewStatus::Resolved => "Resolved",
            ReviewStatus::Archived => "Archived",
        }
    }
}

/// A content-addressed duplicate surfaced for human review. The hash is an
/// opaque token produced upstream and is never parsed here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRecord {
    pub hash: String,
    pub machine_id: String,
    pub status: ReviewStatus,
    pub file_count: u32,
    pub total_size_bytes: u64,
    pub detected_at: DateTime<Utc>,
}

impl ReviewRecord {
    pub fn new(
        hash: impl Into<String>,
        machine_id: impl Into<String>,
        detected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            hash: hash.into(),
            machine_id: machine_id.into(),
            status: ReviewStatus::Review,
            file_count: 2,
            total_size_bytes: 0,
            detected_at,
        }
    }

    pub fn with_status(mut self, status: ReviewStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_copies(mut self, file_count: u32, total_size_bytes: u64) -> Self {
        self.file_count = file_count;
        self.total_size_bytes = total_size_bytes;
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TenantResponse {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub machine_count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MachineResponse {
    pub id: String,
    pub display_name: String,
    pub category: MachineCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_scan_at: Option<DateTime<Utc>>,
}

impl From<&Machine> for MachineResponse {
    fn from(machine: &Machine) -> Self {
        Self {
            id: machine.id.clone(),
            display_name: machine.display_name.clone(),
            category: machine.category,
            hostname: machine.hostname.clone(),
            role: machine.role.clone(),
            last_scan_at: machine.last_scan_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecordResponse {
    pub hash: String,
    pub machine_id: String,
    pub status: ReviewStatus,
    pub file_count: u32,
    pub total_size_bytes: u64,
    pub detected_at: DateTime<Utc>,
}

impl From<&ReviewRecord> for ReviewRecordResponse {
    fn from(record: &ReviewRecord) -> Self {
        Self {
            hash: record.hash.clone(),
            machine_id: record.machine_id.clone(),
            status: record.status,
            file_count: record.file_count,
            total_size_bytes: record.total_size_bytes,
            detected_at: record.detected_at,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ListMachinesQuery {
    pub selected_machine: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
