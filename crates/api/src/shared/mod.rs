pub mod auth;
#[cfg(test)]
pub mod testing;
pub mod usecase;
pub mod users;
