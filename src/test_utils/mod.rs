#![allow(missing_docs)]

pub(crate) mod backend;

pub(crate) use backend::{closed_port_url, logged_in_gateway, serve};
