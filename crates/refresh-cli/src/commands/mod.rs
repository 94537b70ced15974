pub mod inspect;
pub mod version;
