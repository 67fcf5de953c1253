//! Card catalog: wire types, domain types, the listing client and the
//! derived indices.

mod api_types;
mod client;
mod index;
mod types;

pub use client::CatalogClient;
pub use index::{is_searchable, search};
pub use types::{Catalog, Groups, Item};
