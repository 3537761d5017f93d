pub mod notice;
pub mod session;
pub mod synchronizer;
pub mod view;
