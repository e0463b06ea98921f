//! Configuration for the textbook assistant: a JSON file under the home
//! directory plus an environment override for the backend location.

mod schema;

pub use schema::{API_URL_ENV, BackendConfig, Config, WidgetConfig};
