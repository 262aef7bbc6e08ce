pub mod banner;
pub mod booking;
pub mod recommendation;
pub mod record;
pub mod user;

pub use banner::*;
pub use booking::*;
pub use lab_test::*;
pub use recommendation::*;
pub use record::*;
pub use user::*;
