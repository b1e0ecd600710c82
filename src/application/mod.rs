pub mod mutation;
pub mod query;
pub mod request;
pub mod todo_app;

#[cfg(test)]
mod fakes;
#[cfg(test)]
mod todo_app_tests;
