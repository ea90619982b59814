mod account;
mod config;
mod error;
mod flow;
mod request;
mod support;
