//! A local keyed-map JSON document store that speaks the same REST dialect as
//! the hosted database the postgrid front end talks to: collections live at
//! `/{resource}.json`, single records at `/{resource}/{key}.json`.

pub mod api;
pub mod config;
pub mod document;
pub mod keys;
pub mod seed;
pub mod telemetry;
