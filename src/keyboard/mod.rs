pub mod finger;
pub mod layout;
