pub mod lab;

pub use lab::{ExtractedProfile, LabRecord, RankedResult, ScoreRecord};
