pub use super::images::Entity as Images;
pub use super::properties::Entity as Properties;
pub use super::users::Entity as Users;
