mod category;
mod home;

pub use category::CategoryView;
pub use home::HomeView;
