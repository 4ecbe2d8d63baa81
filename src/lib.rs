/*!
 * # DualDoc - bilingual document augmentation
 *
 * A Rust library that turns a source-language document into a bilingual one
 * by inserting a translation below each paragraph, table cell, header,
 * footer and diagram label.
 *
 * ## Features
 *
 * - Structural marker detection (step numbers, colon labels)
 * - Grouping of indented continuation paragraphs into one translation unit
 * - Translation through various providers:
 *   - Google web translate (default)
 *   - Ollama (local LLM)
 *   - Anthropic API
 * - Fixed translation table for approved terms
 * - Font and size normalization of the result
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: Document tree model and JSON persistence
 * - `augment`: The bilingual augmentation engine:
 *   - `augment::classifier`: Structural markers of a paragraph
 *   - `augment::grouper`: Indentation grouping
 *   - `augment::orchestrator`: Document traversal and insertion
 *   - `augment::normalizer`: Post-pass formatting cleanup
 * - `translation`: Translation services:
 *   - `translation::core`: The `Translator` seam and provider service
 *   - `translation::dispatcher`: Fixed table, caching and chunking
 *   - `translation::cache`: Per-run memo of translations
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code and script utilities
 * - `providers`: Client implementations for translation providers
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod augment;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;
