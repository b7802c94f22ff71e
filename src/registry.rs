use crate::models::{Machine, ReviewRecord, Tenant};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

const MAX_SLUG_LEN: usize = 63;
const MAX_MACHINE_ID_LEN: usize = 128;
const MAX_HASH_LEN: usize = 256;
const MIN_DUPLICATE_COPIES: u32 = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{kind} already exists: {key}")]
    Conflict { kind: &'static str, key: String },
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("registry failure: {0}")]
    Internal(String),
}

impl RegistryError {
    pub(crate) fn conflict(kind: &'static str, key: &str) -> Self {
        RegistryError::Conflict {
            kind,
            key: key.to_string(),
        }
    }

    pub(crate) fn not_found(kind: &'static str, key: &str) -> Self {
        RegistryError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        RegistryError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

pub fn validate_tenant_slug(slug: &str) -> Result<(), RegistryError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return Err(RegistryError::invalid(
            "tenant slug",
            format!("must be 1-{} characters", MAX_SLUG_LEN),
        ));
    }
    if !slug
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(RegistryError::invalid(
            "tenant slug",
            "only lowercase letters, digits and '-' are allowed",
        ));
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(RegistryError::invalid(
            "tenant slug",
            "'-' must separate non-empty segments",
        ));
    }
    Ok(())
}

pub fn validate_machine_id(id: &str) -> Result<(), RegistryError> {
    if id.is_empty() || id.len() > MAX_MACHINE_ID_LEN {
        return Err(RegistryError::invalid(
            "machine id",
            format!("must be 1-{} characters", MAX_MACHINE_ID_LEN),
        ));
    }
    if !id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
    {
        return Err(RegistryError::invalid(
            "machine id",
            "only letters, digits, '.', '_' and '-' are allowed",
        ));
    }
    Ok(())
}

pub fn validate_review_hash(hash: &str) -> Result<(), RegistryError> {
    if hash.is_empty() || hash.len() > MAX_HASH_LEN {
        return Err(RegistryError::invalid(
            "review hash",
            format!("must be 1-{} bytes", MAX_HASH_LEN),
        ));
    }
    if hash
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || c == '/')
    {
        return Err(RegistryError::invalid(
            "review hash",
            "whitespace, control characters and '/' are not allowed",
        ));
    }
    Ok(())
}

#[derive(Default)]
struct RegistryState {
    tenants: Vec<Tenant>,
    tenant_index: HashMap<String, usize>,
    machines: Vec<Machine>,
    machine_index: HashMap<String, usize>,
    machines_by_tenant: HashMap<String, Vec<usize>>,
    review_records: Vec<ReviewRecord>,
    review_index: HashMap<String, usize>,
    reviews_by_machine: HashMap<String, Vec<usize>>,
}

/// Authoritative in-memory holder of tenants, machines and review records.
///
/// All indices live behind one lock. Every create validates its invariants
/// while holding the write lock and only then appends, so a failed create
/// leaves the store exactly as it was and readers never see a partial write.
/// Listings return entities in insertion order.
#[derive(Default)]
pub struct RegistryStore {
    state: RwLock<RegistryState>,
}

impl RegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RegistryState>, RegistryError> {
        self.state
            .read()
            .map_err(|_| RegistryError::Internal("registry lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryState>, RegistryError> {
        self.state
            .write()
            .map_err(|_| RegistryError::Internal("registry lock poisoned".to_string()))
    }

    pub fn create_tenant(&self, tenant: Tenant) -> Result<Tenant, RegistryError> {
        validate_tenant_slug(&tenant.slug)?;
        if tenant.name.trim().is_empty() {
            return Err(RegistryError::invalid("tenant name", "must not be blank"));
        }

        let mut state = self.write()?;
        if state.tenant_index.contains_key(&tenant.slug) {
            return Err(RegistryError::conflict("tenant", &tenant.slug));
        }

        let position = state.tenants.len();
        state.tenant_index.insert(tenant.slug.clone(), position);
        state
            .machines_by_tenant
            .insert(tenant.slug.clone(), Vec::new());
        state.tenants.push(tenant.clone());

        tracing::debug!(tenant = %tenant.slug, "tenant created");
        Ok(tenant)
    }

    pub fn create_machine(&self, machine: Machine) -> Result<Machine, RegistryError> {
        validate_machine_id(&machine.id)?;
        validate_tenant_slug(&machine.tenant_slug)?;
        if machine.display_name.trim().is_empty() {
            return Err(RegistryError::invalid(
                "machine display name",
                "must not be blank",
            ));
        }

        let mut state = self.write()?;
        if !state.tenant_index.contains_key(&machine.tenant_slug) {
            return Err(RegistryError::not_found("tenant", &machine.tenant_slug));
        }
        if state.machine_index.contains_key(&machine.id) {
            return Err(RegistryError::conflict("machine", &machine.id));
        }

        let position = state.machines.len();
        state.machine_index.insert(machine.id.clone(), position);
        state
            .machines_by_tenant
            .entry(machine.tenant_slug.clone())
            .or_default()
            .push(position);
        state.reviews_by_machine.insert(machine.id.clone(), Vec::new());
        state.machines.push(machine.clone());

        tracing::debug!(machine = %machine.id, tenant = %machine.tenant_slug, "machine created");
        Ok(machine)
    }

    pub fn create_review_record(
        &self,
        record: ReviewRecord,
    ) -> Result<ReviewRecord, RegistryError> {
        validate_review_hash(&record.hash)?;
        validate_machine_id(&record.machine_id)?;
        if record.file_count < MIN_DUPLICATE_COPIES {
            return Err(RegistryError::invalid(
                "review file count",
                format!("a duplicate needs at least {} copies", MIN_DUPLICATE_COPIES),
            ));
        }

        let mut state = self.write()?;
        if !state.machine_index.contains_key(&record.machine_id) {
            return Err(RegistryError::not_found("machine", &record.machine_id));
        }
        if state.review_index.contains_key(&record.hash) {
            return Err(RegistryError::conflict("review record", &record.hash));
        }

        let position = state.review_records.len();
        state.review_index.insert(record.hash.clone(), position);
        state
            .reviews_by_machine
            .entry(record.machine_id.clone())
            .or_default()
            .push(position);
        state.review_records.push(record.clone());

        tracing::debug!(hash = %record.hash, machine = %record.machine_id, "review record created");
        Ok(record)
    }

    pub fn list_tenants(&self) -> Result<Vec<Tenant>, RegistryError> {
        Ok(self.read()?.tenants.clone())
    }

    pub fn list_machines(&self, tenant_slug: &str) -> Result<Vec<Machine>, RegistryError> {
        let state = self.read()?;
        let positions = state
            .machines_by_tenant
            .get(tenant_slug)
            .ok_or_else(|| RegistryError::not_found("tenant", tenant_slug))?;
        Ok(positions
            .iter()
            .map(|&position| state.machines[position].clone())
            .collect())
    }

    pub fn list_review_records(
        &self,
        machine_id: &str,
    ) -> Result<Vec<ReviewRecord>, RegistryError> {
        let state = self.read()?;
        let positions = state
            .reviews_by_machine
            .get(machine_id)
            .ok_or_else(|| RegistryError::not_found("machine", machine_id))?;
        Ok(positions
            .iter()
            .map(|&position| state.review_records[position].clone())
            .collect())
    }

    pub fn tenant(&self, slug: &str) -> Result<Tenant, RegistryError> {
        let state = self.read()?;
        state
            .tenant_index
            .get(slug)
            .map(|&position| state.tenants[position].clone())
            .ok_or_else(|| RegistryError::not_found("tenant", slug))
    }

    pub fn machine(&self, id: &str) -> Result<Machine, RegistryError> {
        let state = self.read()?;
        state
            .machine_index
            .get(id)
            .map(|&position| state.machines[position].clone())
            .ok_or_else(|| RegistryError::not_found("machine", id))
    }

    pub fn review_record(&self, hash: &str) -> Result<ReviewRecord, RegistryError> {
        let state = self.read()?;
        state
            .review_index
            .get(hash)
            .map(|&position| state.review_records[position].clone())
            .ok_or_else(|| RegistryError::not_found("review record", hash))
    }

    pub fn machine_count(&self, tenant_slug: &str) -> Result<usize, RegistryError> {
        let state = self.read()?;
        state
            .machines_by_tenant
            .get(tenant_slug)
            .map(Vec::len)
            .ok_or_else(|| RegistryError::not_found("tenant", tenant_slug))
    }

    /// (tenants, machines, review records)
    pub fn counts(&self) -> Result<(usize, usize, usize), RegistryError> {
        let state = self.read()?;
        Ok((
            state.tenants.len(),
            state.machines.len(),
            state.review_records.len(),
        ))
    }
}

#[cfg(test)]
impl RegistryStore {
    /// Leaves the lock poisoned by panicking while a writer holds it.
    pub(crate) fn poison(&self) {
        std::thread::scope(|scope| {
            let writer = scope.spawn(|| {
                let _guard = self.state.write();
                panic!("writer panicked while holding the registry lock");
            });
            assert!(writer.join().is_err());
        });
    }
}
