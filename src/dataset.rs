use crate::models::{Machine, MachineCategory, ReviewRecord, ReviewStatus, Tenant};
use chrono::{DateTime, TimeZone, Utc};

pub const CANONICAL_TENANT_SLUG: &str = "orion-analytics";

/// Fixtures loaded into the registry at startup. Order matters: it becomes
/// the listing order served to clients.
#[derive(Clone, Debug, Default)]
pub struct SeedDataset {
    pub tenants: Vec<Tenant>,
    pub machines: Vec<Machine>,
    pub review_records: Vec<ReviewRecord>,
}

fn at(month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, hour, minute, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

impl SeedDataset {
    pub fn canonical() -> Self {
        let tenants = vec![
            Tenant::new(CANONICAL_TENANT_SLUG, "Orion Analytics")
                .with_description("Northwind subsidiary focused on data deduplication rollouts")
                .with_primary_contact("demo@orion.test"),
            Tenant::new("selene-research", "Selene Research")
                .with_description("Applied sciences lab maintaining mixed media archives")
                .with_primary_contact("ops@selene.test"),
        ];

        let machines = vec![
            Machine::new("orion-core-01", "Orion Core 01", CANONICAL_TENANT_SLUG)
                .with_category(MachineCategory::Server)
                .with_hostname("orion-core-01.orion.test")
                .with_role("ingest")
                .with_last_scan_at(at(10, 28, 9, 30)),
            Machine::new("orion-laptop-01", "Orion Laptop 01", CANONICAL_TENANT_SLUG)
                .with_category(MachineCategory::PersonalLaptop)
                .with_hostname("laptop-01.orion.test")
                .with_role("analysis")
                .with_last_scan_at(at(10, 27, 17, 5)),
            Machine::new("orion-archive-01", "Orion Archive 01", CANONICAL_TENANT_SLUG)
                .with_category(MachineCategory::Server)
                .with_hostname("archive-01.orion.test")
                .with_role("archive")
                .with_last_scan_at(at(10, 28, 7, 55)),
            Machine::new("selene-core-01", "Selene Core 01", "selene-research")
                .with_category(MachineCategory::Server)
                .with_hostname("core-01.selene.test")
                .with_role("render")
                .with_last_scan_at(at(10, 27, 10, 40)),
            Machine::new("selene-lab-01", "Selene Lab 01", "selene-research")
                .with_category(MachineCategory::PersonalLaptop)
                .with_hostname("lab-01.selene.test")
                .with_role("fieldwork")
                .with_last_scan_at(at(10, 26, 20, 5)),
        ];

        let review_records = vec![
            ReviewRecord::new("hash-001", "orion-core-01", at(10, 28, 8, 22))
                .with_status(ReviewStatus::Review)
                .with_copies(3, 3_145_728),
            ReviewRecord::new("hash-002", "orion-archive-01", at(10, 28, 8, 22))
                .with_status(ReviewStatus::ActionNeeded)
                .with_copies(2, 8_388_608),
            ReviewRecord::new("hash-003", "orion-laptop-01", at(10, 26, 22, 47))
                .with_status(ReviewStatus::Resolved)
                .with_copies(2, 2_621_440),
            ReviewRecord::new("hash-004", "selene-core-01", at(10, 27, 10, 38))
                .with_status(ReviewStatus::Review)
                .with_copies(2, 1_572_864),
        ];

        Self {
            tenants,
            machines,
            review_records,
        }
    }
}
