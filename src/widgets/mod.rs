pub mod countdown;
pub mod search_results;
pub mod text_input;

pub use countdown::Countdown;
pub use search_results::{SearchResults, SearchResultsState};
pub use text_input::{TextInput, TextInputState};
