pub mod collection_client;
pub mod domain;
pub mod ports;
pub mod request_state;
pub mod subscription;

pub use collection_client::CollectionClient;
pub use request_state::{OperationKind, RequestGuard, RequestId, RequestState, RequestStatus, RequestTracker};
pub use subscription::Subscription;
