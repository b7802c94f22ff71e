use crate::models::{Machine, ReviewRecord, ReviewStatus, Tenant};
use crate::query::TenantOverview;
use minijinja::{context, Environment};
use serde::Serialize;

const APP_TITLE: &str = "DupLynx";
const BOARD_TITLE: &str = "DupLynx Board";

#[derive(Serialize)]
struct LaunchMachine<'a> {
    id: &'a str,
    display_name: &'a str,
    category: &'static str,
}

#[derive(Serialize)]
struct LaunchTenant<'a> {
    slug: &'a str,
    name: &'a str,
    description: Option<&'a str>,
    machines: Vec<LaunchMachine<'a>>,
}

#[derive(Serialize)]
struct BoardRecord<'a> {
    hash: &'a str,
    file_count: u32,
    total_size_bytes: u64,
}

#[derive(Serialize)]
struct BoardColumn<'a> {
    status: &'static str,
    label: &'static str,
    count: usize,
    records: Vec<BoardRecord<'a>>,
}

/// One column per status in board order; hashes sorted within a column.
fn board_columns(records: &[ReviewRecord]) -> Vec<BoardColumn<'_>> {
    ReviewStatus::ALL
        .iter()
        .map(|&status| {
            let mut column: Vec<BoardRecord<'_>> = records
                .iter()
                .filter(|record| record.status == status)
                .map(|record| BoardRecord {
                    hash: &record.hash,
                    file_count: record.file_count,
                    total_size_bytes: record.total_size_bytes,
                })
                .collect();
            column.sort_by(|a, b| a.hash.cmp(b.hash));

            BoardColumn {
                status: status.as_str(),
                label: status.label(),
                count: column.len(),
                records: column,
            }
        })
        .collect()
}

/// Why a tenant-scoped page could not be shown.
#[derive(Debug, Clone, Default)]
pub struct ScopeViolation {
    pub current_tenant: Option<String>,
    pub requested: Option<String>,
    pub reason: String,
}

impl ScopeViolation {
    fn message(&self) -> String {
        match (&self.current_tenant, &self.requested) {
            (Some(current), Some(requested)) if current != requested => format!(
                "You are currently scoped to {} but attempted to access {}.",
                current, requested
            ),
            (_, Some(requested)) => format!(
                "The requested tenant {} is unavailable in this session.",
                requested
            ),
            _ => "A tenant scope is required to complete this request.".to_string(),
        }
    }
}

/// Non-blank labels, outermost first. The layout joins them with " / ".
pub fn breadcrumb<'a>(tenant_label: &'a str, machine_label: &'a str) -> Vec<&'a str> {
    [tenant_label.trim(), machine_label.trim()]
        .into_iter()
        .filter(|label| !label.is_empty())
        .collect()
}

/// Server-rendered dashboard pages. Templates are compiled into the binary
/// and `.html` templates auto-escape every interpolated value.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("layout.html", include_str!("../templates/layout.html"))?;
        env.add_template("launch.html", include_str!("../templates/launch.html"))?;
        env.add_template("board.html", include_str!("../templates/board.html"))?;
        env.add_template(
            "scope_violation.html",
            include_str!("../templates/scope_violation.html"),
        )?;
        Ok(Self { env })
    }

    pub fn render_launch(&self, overview: &[TenantOverview]) -> Result<String, minijinja::Error> {
        let tenants: Vec<LaunchTenant<'_>> = overview
            .iter()
            .map(|entry| LaunchTenant {
                slug: &entry.tenant.slug,
                name: &entry.tenant.name,
                description: entry.tenant.description.as_deref(),
                machines: entry
                    .machines
                    .iter()
                    .map(|machine| LaunchMachine {
                        id: &machine.id,
                        display_name: &machine.display_name,
                        category: machine.category.as_str(),
                    })
                    .collect(),
            })
            .collect();

        self.env.get_template("launch.html")?.render(context! {
            title => APP_TITLE,
            breadcrumb => Vec::<&str>::new(),
            tenants => tenants,
        })
    }

    pub fn render_board(
        &self,
        tenant: &Tenant,
        machine: &Machine,
        records: &[ReviewRecord],
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("board.html")?.render(context! {
            title => BOARD_TITLE,
            breadcrumb => breadcrumb(&tenant.name, &machine.display_name),
            total => records.len(),
            columns => board_columns(records),
        })
    }

    pub fn render_scope_violation(
        &self,
        violation: &ScopeViolation,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("scope_violation.html")?.render(context! {
            title => "Tenant Scope Violation",
            breadcrumb => breadcrumb(violation.current_tenant.as_deref().unwrap_or(""), ""),
            message => violation.message(),
            reason => violation.reason.as_str(),
        })
    }
}
