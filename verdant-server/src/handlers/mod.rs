pub mod duplicates;
pub mod farms;
pub mod health;
pub mod users;
pub mod varieties;
