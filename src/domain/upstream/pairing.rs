//! Couples each upstream request with the result returned for it

use tracing::warn;

use crate::domain::mapping::{LookupRequest, MappingResult};

/// One request sent upstream and what came back for it
#[derive(Debug, Clone, PartialEq)]
pub struct MappingPair<'a> {
    pub request: &'a LookupRequest,
    /// `None` when the response array was shorter than the request array
    pub result: Option<MappingResult>,
}

/// Pairs requests with the positional results of a batched call
///
/// Always yields exactly one pair per request. Surplus results are dropped.
pub fn pair_results(requests: &[LookupRequest], results: Vec<MappingResult>) -> Vec<MappingPair<'_>> {
    if results.len() != requests.len() {
        warn!(
            requested = requests.len(),
            returned = results.len(),
            "Mapping API result count does not match request count"
        );
    }

    let mut results = results.into_iter();

    requests
        .iter()
        .map(|request| MappingPair {
            request,
            result: results.next(),
        })
        .collect()
}
