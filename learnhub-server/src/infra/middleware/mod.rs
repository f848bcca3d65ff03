pub mod demo_user;

pub use demo_user::demo_user_middleware;
