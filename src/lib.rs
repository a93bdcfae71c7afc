//! go-gen scaffolds Go model sources from template directories.
//!
//! A template source (a local directory or a git repository) holds `.tpl`
//! files. Each one is rendered with the requested type name and written to
//! `<type>_<template>.go`, with the file name converted to the chosen
//! naming style.
#![deny(unsafe_code)]

pub mod core;
pub mod generator;
pub mod infrastructure;
