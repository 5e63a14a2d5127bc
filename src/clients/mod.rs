pub mod open_library_client;

pub use open_library_client::{Credentials, LibraryApi, OpenLibraryClient};
