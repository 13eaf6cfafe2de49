pub mod directory_services;
pub mod extraction_services;
pub mod matches_services;
pub mod portal_services;
pub mod relay_services;

pub use directory_services::DynDirectoryService;
pub use extraction_services::DynExtractionService;
pub use matches_services::DynMatchesService;
pub use portal_services::PortalServices;
pub use relay_services::DynRelayService;
