pub mod collection_io;
