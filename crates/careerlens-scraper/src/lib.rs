//! Profile acquisition: credential rotation, scraping-provider calls and
//! normalization of the heterogeneous payloads the provider returns.

pub mod credentials;
pub mod error;
pub mod fetcher;
pub mod normalize;
pub mod types;
pub mod validate;

pub use credentials::{CredentialSource, CredentialStoreConfig, FirestoreClient};
pub use error::ScraperError;
pub use fetcher::{PayloadShape, ProfileFetcher, ScraperConfig};
pub use normalize::{extract_headline, extract_location, extract_name, summarize, ProfileSummary};
pub use types::{Cookie, CredentialSet, ScrapedProfile};
pub use validate::is_plausible_profile;
