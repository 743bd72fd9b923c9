//! IP translation seam
//!
//! Turning a `(client_provider, site)` pair into addresses is done by an
//! external resolver. This module only defines the boundary and a static
//! resolver backed by a JSON document.

use serde::Deserialize;

use crate::selector::Selector;

use super::conditions::IpBlock;
use super::errors::{QueryError, QueryResult};
use super::generator::QueryGenerator;

/// Concrete addresses for one selector
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResolvedAddresses {
    #[serde(default)]
    pub server_ips: Vec<String>,
    #[serde(default)]
    pub client_ip_blocks: Vec<IpBlock>,
}

/// Resolves a selector's client provider and site into addresses
pub trait AddressResolver {
    fn resolve(&self, selector: &Selector) -> QueryResult<ResolvedAddresses>;
}

/// Resolver that hands every selector the same addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAddresses {
    addresses: ResolvedAddresses,
}

impl StaticAddresses {
    pub fn new(addresses: ResolvedAddresses) -> Self {
        Self { addresses }
    }

    /// Reads `{"server_ips": [...], "client_ip_blocks": [[start, end], ...]}`
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self::new)
    }
}

impl AddressResolver for StaticAddresses {
    fn resolve(&self, _selector: &Selector) -> QueryResult<ResolvedAddresses> {
        Ok(self.addresses.clone())
    }
}

/// Resolves addresses for `selector` and builds its query.
///
/// Returns the query text and the number of shard tables it reads.
///
/// # Errors
///
/// `NoClientNetworkBlocksFound` if the resolver returns no client blocks,
/// plus anything the resolver or generator reports.
pub fn generate_query<R: AddressResolver + ?Sized>(
    selector: &Selector,
    resolver: &R,
) -> QueryResult<(String, usize)> {
    let addresses = resolver.resolve(selector)?;
    if addresses.client_ip_blocks.is_empty() {
        return Err(QueryError::no_client_network_blocks(&selector.client_provider));
    }

    let generator = QueryGenerator::for_selector(selector, &addresses)?;
    Ok((generator.query().to_string(), generator.table_span()))
}
