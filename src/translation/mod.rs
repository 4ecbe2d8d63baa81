/*!
 * Translation layer.
 *
 * - `core`: the `Translator` seam and the provider-backed `TranslationService`
 * - `dispatcher`: fixed table, memo cache, chunking and failure absorption
 * - `fixed_table`: exact-match approved translations
 * - `cache`: per-run memo of translated strings
 */

pub use self::core::{TranslationService, Translator};
pub use self::dispatcher::{DispatchStats, Dispatcher, DispatcherSettings};
pub use self::fixed_table::FixedTranslationTable;

pub mod cache;
pub mod core;
pub mod dispatcher;
pub mod fixed_table;
