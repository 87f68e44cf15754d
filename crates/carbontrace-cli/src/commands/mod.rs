//! Command implementations.

pub mod filter;
pub mod import;
pub mod materials;
pub mod products;
pub mod profile;
pub mod show;

pub use self::filter::execute_filter;
pub use self::import::execute_import;
pub use self::materials::execute_materials;
pub use self::products::execute_products;
pub use self::profile::execute_profile;
pub use self::show::execute_show;
