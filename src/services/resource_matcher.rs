use crate::database::Database;
use crate::errors::DomainResult;
use crate::models::ResourceWithLoad;

/// Capacity-aware resource lookup with a locality preference.
#[derive(Clone)]
pub struct ResourceMatcher {
    db: Database,
}

impl ResourceMatcher {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Find a resource with spare capacity, preferring the request's city.
    ///
    /// Tier 1 searches the given city; tier 2 repeats the search across all
    /// cities. Candidates are ordered by id, so the lowest-id resource with
    /// spare capacity always wins. Returns None when every resource is at
    /// capacity; the returned load count was taken at lookup time and is
    /// re-checked by the assign transaction.
    pub async fn find_available(&self, city: &str) -> DomainResult<Option<ResourceWithLoad>> {
        let local = self.db.list_resources_with_load(Some(city)).await?;
        if let Some(candidate) = local.into_iter().find(|r| r.has_spare_capacity()) {
            return Ok(Some(candidate));
        }

        let all = self.db.list_resources_with_load(None).await?;
        Ok(all.into_iter().find(|r| r.has_spare_capacity()))
    }
}
