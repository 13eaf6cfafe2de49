pub mod health_controller;
pub mod matches_controller;
pub mod proxy_stream_controller;

use crate::server::error::Error;

/// anything but GET on the api routes. OPTIONS never gets here, the cors layer answers it
/// before routing
pub async fn method_not_allowed() -> Error {
    Error::MethodNotAllowed
}
