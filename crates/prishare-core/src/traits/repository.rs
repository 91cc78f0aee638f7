//! Generic repository trait for record collections.

use async_trait::async_trait;

use crate::result::AppResult;

/// Generic CRUD repository trait.
///
/// This trait is defined with generic type parameters so that each
/// entity can have a strongly typed repository. Entity-specific
/// operations (cascading deletes, versioned updates) are defined on the
/// concrete repository structs.
#[async_trait]
pub trait Repository<Entity, Id>: Send + Sync + 'static
where
    Entity: Send + Sync + 'static + serde::Serialize,
    Id: Send + Sync + 'static,
{
    /// Find an entity by its identifier.
    async fn find_by_id(&self, id: &Id) -> AppResult<Option<Entity>>;

    /// Return every entity in the collection.
    async fn find_all(&self) -> AppResult<Vec<Entity>>;

    /// Insert the entity, or replace the record with the same identifier.
    ///
    /// At most one record per identifier exists after this call.
    async fn save(&self, entity: &Entity) -> AppResult<Entity>;

    /// Delete an entity by its identifier. Returns `true` if a record was removed.
    async fn delete(&self, id: &Id) -> AppResult<bool>;

    /// Count the entities in the collection.
    async fn count(&self) -> AppResult<u64> {
        Ok(self.find_all().await?.len() as u64)
    }
}
