// Adapters layer: concrete collaborators (HTTP API, storage, notifications).

pub mod http;
pub mod notify;
pub mod simulated;
pub mod storage;

pub use http::ApiClient;
pub use notify::{InMemoryNavigator, InMemoryNotifier, TracingNotifier};
pub use simulated::SimulatedAccountGateway;
pub use storage::LocalStorage;
