pub mod api_error;
pub mod api_client;
pub mod sync_service;
pub mod layout_service;
pub mod poller;

pub use api_error::ApiError;
pub use api_client::ApiClient;
pub use sync_service::SyncService;
pub use layout_service::{embedded_slots, LayoutService};
pub use poller::Poller;
