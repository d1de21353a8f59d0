pub mod month_year;
pub mod subscription;

pub use month_year::*;
pub use subscription::*;
