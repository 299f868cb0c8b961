pub mod outbound;

pub use outbound::{NoopNotifier, NotificationPort};
