//! Repository layer for database operations

pub mod borrowings;
pub mod members;
pub mod renewals;
pub mod titles;
pub mod units;

use std::sync::Arc;

use sqlx::{Pool, Sqlite};

use crate::{clock::Clock, config::CirculationConfig};

/// Main repository struct holding the database pool and sub-repositories.
///
/// The clock is injected so every "today" the engine reads is controllable
/// in tests; the circulation config carries the lending policy knobs.
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Sqlite>,
    pub titles: titles::TitlesRepository,
    pub units: units::UnitsRepository,
    pub members: members::MembersRepository,
    pub borrowings: borrowings::BorrowingsRepository,
    pub renewals: renewals::RenewalsRepository,
}

impl Repository {
    pub fn new(pool: Pool<Sqlite>, clock: Arc<dyn Clock>, circulation: CirculationConfig) -> Self {
        let units = units::UnitsRepository::new(pool.clone(), clock.clone());
        Self {
            titles: titles::TitlesRepository::new(pool.clone(), clock.clone()),
            members: members::MembersRepository::new(pool.clone(), clock.clone()),
            borrowings: borrowings::BorrowingsRepository::new(
                pool.clone(),
                clock.clone(),
                circulation.clone(),
                units.clone(),
            ),
            renewals: renewals::RenewalsRepository::new(pool.clone(), clock, circulation),
            units,
            pool,
        }
    }
}
