pub mod index;
pub mod track;

pub use index::{FileEntry, TitleGroup, TitleIndex, Winner};
pub use track::{AudioTrack, MediaRecord, VideoTrack};
