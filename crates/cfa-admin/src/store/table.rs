use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::DomainError;
use crate::tenancy::TenantId;

/// A stored row that belongs to exactly one tenant.
pub trait Record: Clone + fmt::Debug {
    type Id: Copy + Ord + fmt::Debug + From<u64> + Into<u64>;

    /// Entity name used in `NotFound` errors and logs.
    const ENTITY: &'static str;

    fn id(&self) -> Self::Id;
    fn tenant_id(&self) -> TenantId;
}

/// Tenant-scoped table. Every accessor requires the acting tenant and treats rows owned by
/// another tenant exactly like missing rows.
///
/// Rows are partitioned per tenant behind shared pointers. Cloning a table only bumps the
/// partition counts, and a partition is copied the first time it is written through a
/// clone, so a unit of work stages the partitions it touches and nothing else.
#[derive(Debug, Clone)]
pub struct Table<R: Record> {
    partitions: BTreeMap<TenantId, Arc<BTreeMap<R::Id, R>>>,
    next_id: u64,
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self {
            partitions: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<R: Record> Table<R> {
    pub fn find(&self, tenant: TenantId, id: R::Id) -> Option<&R> {
        self.partitions.get(&tenant)?.get(&id)
    }

    pub fn get(&self, tenant: TenantId, id: R::Id) -> Result<&R, DomainError> {
        self.find(tenant, id)
            .ok_or_else(|| DomainError::not_found(R::ENTITY, id))
    }

    pub fn get_mut(&mut self, tenant: TenantId, id: R::Id) -> Result<&mut R, DomainError> {
        if !self.exists(tenant, id) {
            return Err(DomainError::not_found(R::ENTITY, id));
        }
        self.partition_mut(tenant)
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(R::ENTITY, id))
    }

    pub fn exists(&self, tenant: TenantId, id: R::Id) -> bool {
        self.find(tenant, id).is_some()
    }

    /// Rows owned by `tenant`, in id order.
    pub fn scan(&self, tenant: TenantId) -> impl Iterator<Item = &R> + '_ {
        self.partitions
            .get(&tenant)
            .into_iter()
            .flat_map(|rows| rows.values())
    }

    pub fn scan_mut(&mut self, tenant: TenantId) -> impl Iterator<Item = &mut R> + '_ {
        self.partitions
            .get_mut(&tenant)
            .into_iter()
            .flat_map(|rows| Arc::make_mut(rows).values_mut())
    }

    /// Allocate the next id and store the row built from it.
    pub fn insert_with(&mut self, build: impl FnOnce(R::Id) -> R) -> R {
        let id = R::Id::from(self.next_id);
        self.next_id += 1;
        let row = build(id);
        self.partition_mut(row.tenant_id()).insert(id, row.clone());
        row
    }

    /// Delete the tenant's rows matching `predicate`, returning how many were removed.
    pub fn delete_where(&mut self, tenant: TenantId, predicate: impl Fn(&R) -> bool) -> usize {
        if !self.scan(tenant).any(&predicate) {
            return 0;
        }
        let rows = self.partition_mut(tenant);
        let before = rows.len();
        rows.retain(|_, row| !predicate(row));
        before - rows.len()
    }

    /// Every row regardless of owner. Only the tenant registry itself may look across
    /// the isolation boundary (slug uniqueness).
    pub(crate) fn all(&self) -> impl Iterator<Item = &R> + '_ {
        self.partitions.values().flat_map(|rows| rows.values())
    }

    pub fn len(&self, tenant: TenantId) -> usize {
        self.partitions.get(&tenant).map_or(0, |rows| rows.len())
    }

    pub fn is_empty(&self, tenant: TenantId) -> bool {
        self.len(tenant) == 0
    }

    fn partition_mut(&mut self, tenant: TenantId) -> &mut BTreeMap<R::Id, R> {
        Arc::make_mut(self.partitions.entry(tenant).or_default())
    }

    /// Whether both tables still point at the same partition for `tenant`.
    #[cfg(test)]
    pub(crate) fn shares_partition(&self, other: &Self, tenant: TenantId) -> bool {
        match (self.partitions.get(&tenant), other.partitions.get(&tenant)) {
            (Some(mine), Some(theirs)) => Arc::ptr_eq(mine, theirs),
            _ => false,
        }
    }
}
