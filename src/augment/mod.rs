/*!
 * Bilingual augmentation.
 *
 * - `classifier`: structural markers of a paragraph
 * - `grouper`: indented continuation paragraphs merged into logical units
 * - `orchestrator`: the passes that insert translations into a document
 * - `reassembly`: building and placing translation paragraphs
 * - `normalizer`: post-pass font and size cleanup
 */

pub use self::classifier::{classify, ClassificationResult, MarkerTag};
pub use self::grouper::{build_groups, GroupMember, LogicalUnit};
pub use self::normalizer::{normalize, NormalizeReport, NormalizeSettings};
pub use self::orchestrator::{AugmentPhase, AugmentReport, AugmentStyle, Augmenter, RunContext};

pub mod classifier;
pub mod grouper;
pub mod normalizer;
pub mod orchestrator;
pub mod reassembly;
