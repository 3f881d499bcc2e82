pub mod catalog_loader;
pub mod poster_enricher;
pub mod providers;
pub mod recommendations;
pub mod title_search;

pub use catalog_loader::{CatalogLoader, SharedCatalog};
pub use poster_enricher::PosterEnricher;
