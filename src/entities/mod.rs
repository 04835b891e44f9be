pub mod prelude;

pub mod images;
pub mod properties;
pub mod users;
