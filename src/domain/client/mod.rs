pub mod model;
pub mod repository;

pub use model::{Client, NewClient};
pub use repository::ClientRepository;
