//! Catalog management service

use crate::{
    error::AppResult,
    models::{
        title::{CreateTitle, Title, TitleAvailability},
        unit::{CreateUnit, Unit},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get title by ID
    pub async fn get_title(&self, id: i64) -> AppResult<Title> {
        self.repository.titles.get_by_id(id).await
    }

    /// Create a new title
    pub async fn create_title(&self, title: &CreateTitle) -> AppResult<Title> {
        self.repository.titles.create(title).await
    }

    /// List units of a title
    pub async fn list_units(&self, title_id: i64) -> AppResult<Vec<Unit>> {
        self.repository.units.list_by_title(title_id).await
    }

    /// Add a unit to a title's inventory
    pub async fn create_unit(&self, title_id: i64, unit: &CreateUnit) -> AppResult<Unit> {
        self.repository.units.create(title_id, unit).await
    }

    /// Take a unit out of circulation
    pub async fn deactivate_unit(&self, unit_id: i64) -> AppResult<()> {
        self.repository.units.deactivate(unit_id).await
    }

    /// Inventory summary for a title
    pub async fn availability(&self, title_id: i64) -> AppResult<TitleAvailability> {
        self.repository.units.availability(title_id).await
    }
}
