mod postgres_file_store;

pub use postgres_file_store::PostgresFileStore;
