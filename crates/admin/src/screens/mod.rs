//! One module per admin page.

pub mod categories;
pub mod customers;
pub mod dashboard;
pub mod products;
pub mod settings;
pub mod showrooms;

pub use categories::CategoriesScreen;
pub use customers::CustomersScreen;
pub use products::ProductsScreen;
pub use settings::SettingsScreen;
pub use showrooms::ShowroomsScreen;
