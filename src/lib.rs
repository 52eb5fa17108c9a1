pub mod config;
pub mod connector;
pub mod error;
pub mod fetch;
pub mod process;

pub use config::{ColumnMapping, ConnectorSettings, Pipe, PipeParameters, SeriesConfig};
pub use connector::{Connector, ExtraOptions, FredConnector};
pub use error::{ConnectorError, FetchError};
