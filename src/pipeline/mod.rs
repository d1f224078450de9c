pub mod assembler;
pub mod draft;
pub mod fallback;
pub mod genres;
pub mod history;
pub mod orchestrator;
pub mod report;
pub mod selector;

pub use assembler::{ADD_BATCH_SIZE, AssembledPlaylist, PlaylistAssembler};
pub use draft::PlaylistDraft;
pub use fallback::{FallbackOutcome, FallbackSearch};
pub use genres::{DEFAULT_GENRES, GenreAggregator, GenreRanking};
pub use history::{HistoryAggregator, dedupe_history};
pub use orchestrator::{BuildRequest, BuildStage, PlaylistBuilder};
pub use report::{BuildReport, BuildStats};
pub use selector::TrackSelector;
