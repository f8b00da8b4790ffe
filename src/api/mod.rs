pub mod rest;
pub mod view;
