//! Pathway source clients.

pub mod ramp;
pub mod mock;

pub use mock::MockPathwaySource;
pub use ramp::RampClient;

use async_trait::async_trait;
use rampway_common::{AnalyteIdentifier, PathwayRecord};

/// Common interface for pathway databases.
#[async_trait]
pub trait PathwaySource: Send + Sync {
    /// Pathways associated with `identifier`, one record per raw response entry.
    ///
    /// Fails with `QueryUnavailable` when the service cannot be reached.
    /// A reachable service with no pathways returns an empty list.
    async fn query(&self, identifier: &AnalyteIdentifier) -> rampway_common::Result<Vec<PathwayRecord>>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
