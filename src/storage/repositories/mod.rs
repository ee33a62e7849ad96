//! Repository implementations backing the credential store.

mod user;

pub use user::{NewUser, SqlxUserRepository, User, UserRepository};
