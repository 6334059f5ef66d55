//! Route handlers, grouped by area.

pub mod comments;
pub mod fetch;
pub mod github;
pub mod images;
pub mod system;
pub mod tools;
