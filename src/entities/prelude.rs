pub use super::movie_searches::Entity as MovieSearches;
