mod tokio_postgres;

pub use self::in_memory_test::{
    InMemoryTestConnection, InMemoryTestConnector, InMemoryTestResponseBuilder, RecordedQuery,
};
pub use self::tokio_postgres::{TokioPostgresConnection, TokioPostgresConnector};
