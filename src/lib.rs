/*!
 * # reqtrans - Requirements Translation with AI
 *
 * A Rust library for batch translation of software requirement files
 * using an LLM provider with a strict shape contract.
 *
 * ## Features
 *
 * - Read requirement files line by line, preserving blank lines and order
 * - Translate in fixed-size batches with exactly-one-line-per-input enforcement
 * - Bounded exponential-backoff retry around every remote call
 * - Checkpoint the output file after every batch; resume from prior output
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `batching`: Partitioning of input lines into batches
 * - `retry`: Generic bounded retry with exponential backoff
 * - `translation_service`: Batch translation with shape validation
 * - `file_utils`: Line-oriented file operations
 * - `app_controller`: Main application controller
 * - `providers`: Client implementation for the LLM provider:
 *   - `providers::openai`: OpenAI Responses API client
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod batching;
pub mod errors;
pub mod file_utils;
pub mod providers;
pub mod retry;
pub mod translation_service;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use batching::chunk_lines;
pub use retry::with_retry;
pub use translation_service::{BatchTranslator, TranslationService};
pub use errors::{AppError, ProviderError, TranslationError};
