mod merge;

pub use merge::{merge_same_owner, MergeOutcome, MergedParcel};
