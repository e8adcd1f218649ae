pub mod prelude;

pub mod movie_searches;
