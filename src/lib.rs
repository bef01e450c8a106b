pub mod api;
pub mod auth;
pub mod config;
pub mod editor;
pub mod humanize;
pub mod observability;
pub mod pages;
pub mod render;
