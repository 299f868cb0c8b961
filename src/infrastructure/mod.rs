//! Infrastructure layer - external concerns

pub mod database;
pub mod storage;

pub use database::{
    init_database, DatabaseConfig, SeaOrmClientRepository, SeaOrmReservationRepository,
    SeaOrmRoomRepository,
};
pub use storage::InMemoryStorage;
