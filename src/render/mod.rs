pub mod format;
pub mod html;
pub mod page;
pub mod view;

pub use page::HtmlPageView;
pub use view::{DashboardView, TableContent};
