//! Business logic services

pub mod catalog;
pub mod circulation;
pub mod members;
pub mod renewals;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub circulation: circulation::CirculationService,
    pub renewals: renewals::RenewalsService,
    pub members: members::MembersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            circulation: circulation::CirculationService::new(repository.clone()),
            renewals: renewals::RenewalsService::new(repository.clone()),
            members: members::MembersService::new(repository),
        }
    }
}
