mod farms;
mod users;
mod varieties;

pub use farms::PostgresFarmsRepository;
pub use users::PostgresUsersRepository;
pub use varieties::PostgresVarietiesRepository;
