use crate::models::{Machine, ReviewRecord, Tenant};
use crate::registry::{
    validate_machine_id, validate_review_hash, validate_tenant_slug, RegistryError, RegistryStore,
};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct TenantSummary {
    pub tenant: Tenant,
    pub machine_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TenantOverview {
    pub tenant: Tenant,
    pub machines: Vec<Machine>,
}

/// Read-only view over a seeded registry.
///
/// Takes ownership of the store, so once the gateway holds a `QueryService`
/// nothing can create further entities.
#[derive(Clone)]
pub struct QueryService {
    store: Arc<RegistryStore>,
}

impl QueryService {
    pub fn new(store: RegistryStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn list_tenants(&self) -> Result<Vec<TenantSummary>, RegistryError> {
        self.store
            .list_tenants()?
            .into_iter()
            .map(|tenant| -> Result<TenantSummary, RegistryError> {
                let machine_count = self.store.machine_count(&tenant.slug)?;
                Ok(TenantSummary {
                    tenant,
                    machine_count,
                })
            })
            .collect()
    }

    pub fn tenant(&self, tenant_slug: &str) -> Result<Tenant, RegistryError> {
        validate_tenant_slug(tenant_slug)?;
        self.store.tenant(tenant_slug)
    }

    pub fn list_machines(&self, tenant_slug: &str) -> Result<Vec<Machine>, RegistryError> {
        validate_tenant_slug(tenant_slug)?;
        self.store.list_machines(tenant_slug)
    }

    /// A machine registered under a different tenant is reported as missing.
    pub fn machine(&self, tenant_slug: &str, machine_id: &str) -> Result<Machine, RegistryError> {
        validate_tenant_slug(tenant_slug)?;
        validate_machine_id(machine_id)?;
        self.store.tenant(tenant_slug)?;

        let machine = self.store.machine(machine_id)?;
        if machine.tenant_slug != tenant_slug {
            tracing::warn!(
                tenant = %tenant_slug,
                machine = %machine_id,
                "machine requested outside its tenant scope"
            );
            return Err(RegistryError::not_found("machine", machine_id));
        }
        Ok(machine)
    }

    pub fn list_review_records(
        &self,
        tenant_slug: &str,
        machine_id: &str,
    ) -> Result<Vec<ReviewRecord>, RegistryError> {
        let machine = self.machine(tenant_slug, machine_id)?;
        self.store.list_review_records(&machine.id)
    }

    pub fn review_record(
        &self,
        tenant_slug: &str,
        machine_id: &str,
        hash: &str,
    ) -> Result<ReviewRecord, RegistryError> {
        validate_review_hash(hash)?;
        let machine = self.machine(tenant_slug, machine_id)?;

        let record = self.store.review_record(hash)?;
        if record.machine_id != machine.id {
            return Err(RegistryError::not_found("review record", hash));
        }
        Ok(record)
    }

    pub fn launch_overview(&self) -> Result<Vec<TenantOverview>, RegistryError> {
        self.store
            .list_tenants()?
            .into_iter()
            .map(|tenant| -> Result<TenantOverview, RegistryError> {
                let machines = self.store.list_machines(&tenant.slug)?;
                Ok(TenantOverview { tenant, machines })
            })
            .collect()
    }
}
