mod connector;

pub use connector::{Connection, Connector};
