//! SearXNG-backed web search and page fetch tool plugin.
//!
//! This library exports the tool system for host agent runtimes and testing.

pub mod cli;
pub mod config;
pub mod html;
pub mod logging;
pub mod tool;
pub mod web;
