pub mod catalog;
pub mod checkout;
pub mod cli;
pub mod form;
pub mod report;
pub mod request;
pub mod trace;
