pub mod boundary;
pub mod controller;
pub mod customer;
pub mod error;
pub mod mutation;
pub mod process;
pub mod response;
pub mod router;
pub mod shipping;
