//! vloc - string-literal and resource-reference scanner for .NET sources
//!
//! vloc finds the string literals in C#, Visual Basic and ASP.NET code that
//! still need localizing, and the places where code already refers to
//! resource entries (`Resources.Title`, `My.Resources.Greeting`).
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (file walking, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Scanning engine (tries, language rules, scanners)
//! - `error`: Errors returned by the engine

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
