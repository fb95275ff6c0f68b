pub mod mock_search_client;

pub use mock_search_client::MockSearchClient;
