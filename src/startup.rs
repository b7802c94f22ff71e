use crate::dataset::{SeedDataset, CANONICAL_TENANT_SLUG};
use crate::registry::{RegistryError, RegistryStore};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub tenants_created: usize,
    pub machines_created: usize,
    pub review_records_created: usize,
    pub skipped: usize,
}

/// Loads `dataset` into `store`, skipping entities that already exist under
/// the same owner. Running it twice against the same store is a no-op the
/// second time. An existing key owned by a different parent is a conflict.
pub fn seed_registry(
    store: &RegistryStore,
    dataset: &SeedDataset,
) -> Result<SeedReport, RegistryError> {
    let mut report = SeedReport::default();

    for tenant in &dataset.tenants {
        match store.tenant(&tenant.slug) {
            Ok(_) => report.skipped += 1,
            Err(RegistryError::NotFound { .. }) => {
                store.create_tenant(tenant.clone())?;
                report.tenants_created += 1;
                tracing::info!("Created tenant: {}", tenant.slug);
            }
            Err(e) => return Err(e),
        }
    }

    for machine in &dataset.machines {
        match store.machine(&machine.id) {
            Ok(existing) if existing.tenant_slug == machine.tenant_slug => report.skipped += 1,
            Ok(_) => return Err(RegistryError::conflict("machine", &machine.id)),
            Err(RegistryError::NotFound { .. }) => {
                store.create_machine(machine.clone())?;
                report.machines_created += 1;
                tracing::info!("Created machine: {} ({})", machine.id, machine.tenant_slug);
            }
            Err(e) => return Err(e),
        }
    }

    for record in &dataset.review_records {
        match store.review_record(&record.hash) {
            Ok(existing) if existing.machine_id == record.machine_id => report.skipped += 1,
            Ok(_) => return Err(RegistryError::conflict("review record", &record.hash)),
            Err(RegistryError::NotFound { .. }) => {
                store.create_review_record(record.clone())?;
                report.review_records_created += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}

/// The dashboard and its external tests assume the canonical tenant is
/// present with at least one machine.
pub fn ensure_canonical_tenant(store: &RegistryStore) -> Result<(), RegistryError> {
    store.tenant(CANONICAL_TENANT_SLUG)?;
    if store.machine_count(CANONICAL_TENANT_SLUG)? == 0 {
        return Err(RegistryError::not_found(
            "machine for tenant",
            CANONICAL_TENANT_SLUG,
        ));
    }
    Ok(())
}
