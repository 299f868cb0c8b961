pub mod model;
pub mod repository;

pub use model::{NewRoom, Room, RoomFilters, RoomSort, RoomType, RoomView};
pub use repository::RoomRepository;
